//! Zoning lookup service
//!
//! ```text
//! address ─► Geocoder ─► Coordinate ─► Resolver ─► ResolvedFeatures
//!                                                    │
//!                                                    └─► RulesCatalog::match_rule(zoning code)
//!                                                              └─► ResolutionResult
//! ```
//!
//! The only process-lifetime state is the rules catalog; everything else is
//! built fresh per request.

use std::sync::Arc;

use crate::config::LookupConfig;
use crate::error::Result;
use crate::geocode::{Geocoder, NominatimGeocoder};
use crate::resolution::Resolver;
use crate::rules::{RuleMatch, RulesCatalog};
use crate::types::{AddressLookup, Coordinate, GeocodeAnswer, ResolutionResult, RuleOutcome};

#[derive(Clone)]
pub struct ZoningLookup {
    geocoder: Arc<dyn Geocoder>,
    resolver: Resolver,
    catalog: Arc<RulesCatalog>,
}

impl ZoningLookup {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        resolver: Resolver,
        catalog: Arc<RulesCatalog>,
    ) -> Self {
        Self {
            geocoder,
            resolver,
            catalog,
        }
    }

    /// Wire up the live geocoder, DataSF datasets and rules catalog
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let http = config.http_client()?;
        let catalog = config.load_catalog()?;
        tracing::info!(
            "Zoning lookup ready: {} rules (catalog version {})",
            catalog.len(),
            catalog.version().unwrap_or("unversioned")
        );

        let geocoder = NominatimGeocoder::new(
            http.clone(),
            config.geocoder.endpoint.clone(),
            config.geocoder.user_agent.clone(),
        );
        let resolver = Resolver::from_config(&config.datasets, http);
        Ok(Self::new(Arc::new(geocoder), resolver, Arc::new(catalog)))
    }

    pub fn catalog(&self) -> &RulesCatalog {
        &self.catalog
    }

    pub async fn geocode(&self, address: &str) -> Option<GeocodeAnswer> {
        self.geocoder.geocode(address).await
    }

    pub fn match_rule(&self, zone_code: Option<&str>) -> RuleMatch<'_> {
        self.catalog.match_rule(zone_code)
    }

    /// Parcel, zoning, height/bulk and zoning rules at a point
    pub async fn lookup(&self, at: Coordinate) -> Result<ResolutionResult> {
        let features = self.resolver.resolve(at).await?;
        let code = features.zoning.as_ref().map(|z| z.zone_code.as_str());
        let rule = RuleOutcome::from(self.catalog.match_rule(code));
        Ok(ResolutionResult::new(features, rule))
    }

    /// Geocode an address and look up what is there.
    ///
    /// `Ok(None)` when the address does not geocode.
    pub async fn lookup_address(&self, address: &str) -> Result<Option<AddressLookup>> {
        let Some(geocode) = self.geocode(address).await else {
            return Ok(None);
        };
        let result = self.lookup(geocode.coordinate).await?;
        Ok(Some(AddressLookup { geocode, result }))
    }
}
