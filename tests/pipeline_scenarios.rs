//! Lookup pipeline scenarios over in-memory sources
//!
//! Run with: cargo test --test pipeline_scenarios

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Barrier;

use helpers::{
    builtin_catalog, fixed_lookup, height_bulk, parcel, zoning, FailingSource, FixedGeocoder,
    FixedSource, RendezvousSource,
};
use parcel_zoning::resolution::Resolver;
use parcel_zoning::rules::{RuleMatch, NO_ZONING_DISTRICT};
use parcel_zoning::{
    Coordinate, HeightBulkRecord, ParcelRecord, ZoningDistrictRecord, ZoningError, ZoningLookup,
};

const CITY_HALL: Coordinate = Coordinate {
    lat: 37.7793,
    lng: -122.4193,
};

// =============================================================================
// Zoning merge
// =============================================================================

#[tokio::test]
async fn test_dedicated_zoning_wins_over_parcel() {
    let service = fixed_lookup(
        FixedGeocoder::nowhere(),
        Some(parcel("0787001", Some("NC-2"), Some("Small-Scale Neighborhood Commercial"))),
        Some(zoning(
            "NC-2 (Neighborhood Commercial)",
            "NEIGHBORHOOD COMMERCIAL, SMALL SCALE",
        )),
        Some(height_bulk("40-X", "X")),
    );

    let result = service.lookup(CITY_HALL).await.unwrap();

    let district = result.zoning().unwrap();
    assert_eq!(district.zone_code, "NC-2 (Neighborhood Commercial)");
    assert_eq!(district.zone_name, "NEIGHBORHOOD COMMERCIAL, SMALL SCALE");
    assert_eq!(result.zoning_rule().unwrap().zone_code, "NC-2");
    assert_eq!(result.zoning_rule_diagnostic(), None);

    // The parcel's own spelling reaches the same rule
    let from_parcel = service.match_rule(Some("NC-2"));
    assert_eq!(from_parcel.rule(), result.zoning_rule());
}

#[tokio::test]
async fn test_parcel_fallback_when_zoning_misses() {
    let service = fixed_lookup(
        FixedGeocoder::nowhere(),
        Some(parcel("3512008", Some("RM-1"), Some("Residential, Mixed, Low Density"))),
        None,
        Some(height_bulk("40-X", "X")),
    );

    let result = service.lookup(CITY_HALL).await.unwrap();

    let district = result.zoning().unwrap();
    assert_eq!(district.zone_code, "RM-1");
    assert_eq!(district.zone_name, "Residential, Mixed, Low Density");
    assert_eq!(result.zoning_rule().unwrap().zone_code, "RM-1");
    assert_eq!(result.parcel().unwrap().parcel_id, "3512008");
}

#[tokio::test]
async fn test_fallback_label_defaults_to_empty() {
    let service = fixed_lookup(
        FixedGeocoder::nowhere(),
        Some(parcel("3512008", Some("RH-2"), None)),
        None,
        None,
    );

    let result = service.lookup(CITY_HALL).await.unwrap();
    let district = result.zoning().unwrap();
    assert_eq!(district.zone_code, "RH-2");
    assert_eq!(district.zone_name, "");
}

#[tokio::test]
async fn test_no_zoning_anywhere() {
    for embedded in [None, Some("")] {
        let service = fixed_lookup(
            FixedGeocoder::nowhere(),
            Some(parcel("3512008", embedded, Some("ignored"))),
            None,
            None,
        );

        let result = service.lookup(CITY_HALL).await.unwrap();
        assert!(result.parcel().is_some());
        assert!(result.zoning().is_none());
        assert!(result.zoning_rule().is_none());
        assert_eq!(result.zoning_rule_diagnostic(), Some(NO_ZONING_DISTRICT));
    }
}

#[tokio::test]
async fn test_mid_ocean() {
    let service = fixed_lookup(FixedGeocoder::nowhere(), None, None, None);

    let result = service.lookup(Coordinate::new(0.0, -150.0)).await.unwrap();

    assert!(result.parcel().is_none());
    assert!(result.zoning().is_none());
    assert!(result.height_bulk().is_none());
    assert!(result.zoning_rule().is_none());
    assert_eq!(result.zoning_rule_diagnostic(), Some("No zoning district found."));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "parcel": null,
            "zoning": null,
            "height_bulk": null,
            "zoning_rules": null,
            "zoning_rules_message": "No zoning district found."
        })
    );
}

#[tokio::test]
async fn test_unknown_zone_code() {
    let service = fixed_lookup(
        FixedGeocoder::nowhere(),
        None,
        Some(zoning("ZZZ-NOPE", "Imaginary")),
        None,
    );

    let result = service.lookup(CITY_HALL).await.unwrap();
    assert_eq!(result.zoning().unwrap().zone_code, "ZZZ-NOPE");
    assert!(result.zoning_rule().is_none());
    assert_eq!(
        result.zoning_rule_diagnostic(),
        Some(r#"No rules found for zone "ZZZ-NOPE"."#)
    );
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn test_each_dataset_queried_once() {
    let parcels = FixedSource::new(Some(parcel("0787001", None, None)));
    let zoning_source = FixedSource::new(Some(zoning("C-3-O", "Downtown Office")));
    let heights = FixedSource::new(Some(height_bulk("", "")));
    let resolver = Resolver::new(parcels.clone(), zoning_source.clone(), heights.clone());

    let features = resolver.resolve(CITY_HALL).await.unwrap();

    assert_eq!(parcels.calls(), 1);
    assert_eq!(zoning_source.calls(), 1);
    assert_eq!(heights.calls(), 1);
    // A matched height/bulk row with empty labels is still a record
    assert_eq!(features.height_bulk, Some(height_bulk("", "")));
}

#[tokio::test]
async fn test_queries_run_concurrently() {
    // Each source waits until all three have started; sequential issue would deadlock.
    let barrier = Arc::new(Barrier::new(3));
    let resolver = Resolver::new(
        RendezvousSource::new(barrier.clone(), Some(parcel("0787001", Some("P"), None))),
        RendezvousSource::new(barrier.clone(), None::<ZoningDistrictRecord>),
        RendezvousSource::new(barrier, Some(height_bulk("OS", ""))),
    );

    let features = tokio::time::timeout(Duration::from_secs(5), resolver.resolve(CITY_HALL))
        .await
        .expect("containment queries were not issued concurrently")
        .unwrap();

    assert_eq!(features.zoning.unwrap().zone_code, "P");
    assert_eq!(features.height_bulk.unwrap().height_limit_label, "OS");
}

#[tokio::test]
async fn test_unsettled_source_fails_lookup() {
    let resolver = Resolver::new(
        FixedSource::new(Some(parcel("0787001", Some("RH-1"), None))),
        Arc::new(FailingSource),
        FixedSource::new(None::<HeightBulkRecord>),
    );
    let service = ZoningLookup::new(
        FixedGeocoder::nowhere(),
        resolver,
        Arc::new(builtin_catalog()),
    );

    let err = service.lookup(CITY_HALL).await.unwrap_err();
    assert!(matches!(err, ZoningError::Source { .. }));
}

// =============================================================================
// Address lookup
// =============================================================================

#[tokio::test]
async fn test_address_lookup() {
    let service = fixed_lookup(
        FixedGeocoder::at(37.7793, -122.4193, "San Francisco City Hall"),
        Some(parcel("0787001", Some("P"), Some("Public"))),
        None,
        Some(height_bulk("OS", "")),
    );

    let found = service
        .lookup_address("1 Dr Carlton B Goodlett Pl")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.geocode.display_label, "San Francisco City Hall");
    assert_eq!(found.geocode.coordinate, CITY_HALL);
    assert_eq!(found.result.zoning_rule().unwrap().zone_code, "P");
}

#[tokio::test]
async fn test_address_not_found() {
    let service = fixed_lookup(
        FixedGeocoder::nowhere(),
        Some(parcel("0787001", Some("P"), None)),
        None,
        None,
    );
    assert!(service.lookup_address("nowhere at all").await.unwrap().is_none());

    let service = fixed_lookup(
        FixedGeocoder::at(37.7793, -122.4193, "City Hall"),
        None,
        None,
        None,
    );
    assert!(service.lookup_address("   ").await.unwrap().is_none());
}

// =============================================================================
// Rule matching through the service
// =============================================================================

#[test]
fn test_match_rule_variants() {
    let service = ZoningLookup::new(
        FixedGeocoder::nowhere(),
        Resolver::new(
            FixedSource::new(None::<ParcelRecord>),
            FixedSource::new(None::<ZoningDistrictRecord>),
            FixedSource::new(None::<HeightBulkRecord>),
        ),
        Arc::new(builtin_catalog()),
    );

    let canonical = service.match_rule(Some("RH-2")).rule().cloned().unwrap();
    for variant in ["rh-2", "  RH-2  ", "RH-2 (Residential House, Two-Family)"] {
        assert_eq!(service.match_rule(Some(variant)).rule(), Some(&canonical));
    }

    assert!(matches!(service.match_rule(None), RuleMatch::NoZoningDistrict));
    assert!(matches!(service.match_rule(Some("  ")), RuleMatch::NoZoningDistrict));
    assert!(matches!(
        service.match_rule(Some("ZZZ-NOPE")),
        RuleMatch::NoRulesForZone(code) if code == "ZZZ-NOPE"
    ));
}
