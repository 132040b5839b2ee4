//! Shared fixtures for integration tests
//!
//! - In-memory containment sources and geocoders for pipeline scenarios
//! - A throwaway HTTP upstream standing in for DataSF and Nominatim

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    Router,
};
use tokio::sync::Barrier;

use parcel_zoning::geocode::Geocoder;
use parcel_zoning::resolution::{ContainmentSource, Resolver};
use parcel_zoning::rules::RulesCatalog;
use parcel_zoning::{
    Coordinate, GeocodeAnswer, HeightBulkRecord, ParcelRecord, ZoningDistrictRecord,
    ZoningError, ZoningLookup,
};

// ============================================================================
// Record builders
// ============================================================================

pub fn parcel(id: &str, embedded_code: Option<&str>, embedded_label: Option<&str>) -> ParcelRecord {
    ParcelRecord {
        parcel_id: id.to_string(),
        block_number: id.chars().take(4).collect(),
        lot_number: id.chars().skip(4).collect(),
        embedded_zone_code: embedded_code.map(String::from),
        embedded_zone_label: embedded_label.map(String::from),
    }
}

pub fn zoning(code: &str, name: &str) -> ZoningDistrictRecord {
    ZoningDistrictRecord {
        zone_code: code.to_string(),
        zone_name: name.to_string(),
    }
}

pub fn height_bulk(height: &str, bulk: &str) -> HeightBulkRecord {
    HeightBulkRecord {
        height_limit_label: height.to_string(),
        bulk_district_label: bulk.to_string(),
    }
}

// ============================================================================
// In-memory sources
// ============================================================================

/// Always answers the same thing, counting calls
pub struct FixedSource<R> {
    answer: Option<R>,
    calls: AtomicUsize,
}

impl<R> FixedSource<R> {
    pub fn new(answer: Option<R>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> ContainmentSource<R> for FixedSource<R> {
    fn dataset(&self) -> &str {
        "fixed"
    }

    async fn find_containing(&self, _at: Coordinate) -> parcel_zoning::Result<Option<R>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// Fails to settle
pub struct FailingSource;

#[async_trait]
impl<R: Send + 'static> ContainmentSource<R> for FailingSource {
    fn dataset(&self) -> &str {
        "failing"
    }

    async fn find_containing(&self, _at: Coordinate) -> parcel_zoning::Result<Option<R>> {
        Err(ZoningError::Source {
            dataset: "failing".to_string(),
            message: "worker panicked".to_string(),
        })
    }
}

/// Answers only once every source sharing the barrier has been called
pub struct RendezvousSource<R> {
    barrier: Arc<Barrier>,
    answer: Option<R>,
}

impl<R> RendezvousSource<R> {
    pub fn new(barrier: Arc<Barrier>, answer: Option<R>) -> Arc<Self> {
        Arc::new(Self { barrier, answer })
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> ContainmentSource<R> for RendezvousSource<R> {
    fn dataset(&self) -> &str {
        "rendezvous"
    }

    async fn find_containing(&self, _at: Coordinate) -> parcel_zoning::Result<Option<R>> {
        self.barrier.wait().await;
        Ok(self.answer.clone())
    }
}

pub struct FixedGeocoder {
    answer: Option<GeocodeAnswer>,
}

impl FixedGeocoder {
    pub fn at(lat: f64, lng: f64, label: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(GeocodeAnswer {
                coordinate: Coordinate::new(lat, lng),
                display_label: label.to_string(),
            }),
        })
    }

    pub fn nowhere() -> Arc<Self> {
        Arc::new(Self { answer: None })
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, address: &str) -> Option<GeocodeAnswer> {
        if address.trim().is_empty() {
            return None;
        }
        self.answer.clone()
    }
}

/// Lookup service over fixed answers and the built-in catalog
pub fn fixed_lookup(
    geocoder: Arc<dyn Geocoder>,
    parcel: Option<ParcelRecord>,
    zoning: Option<ZoningDistrictRecord>,
    height_bulk: Option<HeightBulkRecord>,
) -> ZoningLookup {
    let resolver = Resolver::new(
        FixedSource::new(parcel),
        FixedSource::new(zoning),
        FixedSource::new(height_bulk),
    );
    ZoningLookup::new(geocoder, resolver, Arc::new(builtin_catalog()))
}

pub fn builtin_catalog() -> RulesCatalog {
    RulesCatalog::builtin().expect("built-in catalog loads")
}

// ============================================================================
// Stub HTTP upstream
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub user_agent: Option<String>,
}

struct StubState {
    routes: HashMap<String, (StatusCode, String)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct StubUpstream {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubUpstream {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn respond(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let query = url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
        .into_owned()
        .collect();
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let (status, body) = state
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, r#"{"message": "no such dataset"}"#.to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Serve canned `(status, body)` responses by path on an ephemeral port
pub async fn spawn_upstream(routes: &[(&str, StatusCode, &str)]) -> StubUpstream {
    let state = Arc::new(StubState {
        routes: routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect(),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new().fallback(respond).with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub upstream");
    });

    StubUpstream {
        base_url: format!("http://{}", addr),
        state,
    }
}
