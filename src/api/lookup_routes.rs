//! Lookup API Routes
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/lookup` | POST | `{lat, lng}` → parcel, zoning, height/bulk and rules |
//! | `/api/geocode` | POST | `{address}` → best coordinate and display label |
//! | `/health` | GET | Liveness |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::ZoningLookup;
use crate::types::{degrees_from_json, Coordinate, GeocodeAnswer, ResolutionResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

/// Coordinates from a request body; numbers or numeric strings
fn parse_coordinate(body: &[u8]) -> Option<Coordinate> {
    let value: Value = serde_json::from_slice(body).ok()?;
    Some(Coordinate::new(
        degrees_from_json(value.get("lat"))?,
        degrees_from_json(value.get("lng"))?,
    ))
}

/// POST /api/lookup
pub async fn lookup(
    State(service): State<Arc<ZoningLookup>>,
    body: Bytes,
) -> Result<Json<ResolutionResult>, ApiError> {
    let at = parse_coordinate(&body)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Invalid lat or lng"))?;

    let result = service.lookup(at).await.map_err(|e| {
        tracing::error!("Lookup at {} failed: {}", at, e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Lookup failed")
    })?;
    Ok(Json(result))
}

fn parse_geocode_request(body: &[u8]) -> Option<GeocodeRequest> {
    serde_json::from_slice(body).ok()
}

/// POST /api/geocode
pub async fn geocode(
    State(service): State<Arc<ZoningLookup>>,
    body: Bytes,
) -> Result<Json<GeocodeAnswer>, ApiError> {
    let request = parse_geocode_request(&body)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Invalid address"))?;

    service
        .geocode(&request.address)
        .await
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Address not found"))
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_lookup_router(service: Arc<ZoningLookup>) -> Router {
    Router::new()
        .route("/api/lookup", post(lookup))
        .route("/api/geocode", post(geocode))
        .route("/health", get(health))
        .with_state(service)
}
