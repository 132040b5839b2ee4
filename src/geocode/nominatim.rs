//! Nominatim (OpenStreetMap) geocoder
//!
//! No API key required. The public instance asks every client to send an
//! identifying User-Agent and to stay around 1 req/sec; this client sends
//! exactly one request per call and never retries.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::Geocoder;
use crate::error::FetchError;
use crate::types::{degrees_from_json, Coordinate, GeocodeAnswer};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

pub struct NominatimGeocoder {
    http: Client,
    endpoint: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Search URL for an already-trimmed query
    pub fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ],
        )
    }

    async fn search(&self, query: &str) -> Result<Option<GeocodeAnswer>, FetchError> {
        let url = self.search_url(query)?;
        tracing::debug!("[nominatim] GET {}", url);

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        decode_response(status.as_u16(), &body)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Option<GeocodeAnswer> {
        let query = address.trim();
        if query.is_empty() {
            return None;
        }

        match self.search(query).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("[nominatim] geocode failed for {:?}: {}", query, e);
                None
            }
        }
    }
}

/// Interpret a search response: the top-ranked row, if it has a usable point
pub fn decode_response(status: u16, body: &str) -> Result<Option<GeocodeAnswer>, FetchError> {
    if !(200..300).contains(&status) {
        tracing::debug!(
            "[nominatim] error body: {}",
            body.chars().take(500).collect::<String>()
        );
        return Err(FetchError::Status(status));
    }

    let rows = match serde_json::from_str::<Value>(body)? {
        Value::Array(rows) => rows,
        _ => return Err(FetchError::NotArray),
    };
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    let (Some(lat), Some(lng)) = (
        degrees_from_json(first.get("lat")),
        degrees_from_json(first.get("lon")),
    ) else {
        return Ok(None);
    };
    let coordinate = Coordinate::new(lat, lng);

    let display_label = match first.get("display_name") {
        Some(Value::String(name)) => name.clone(),
        _ => coordinate.to_string(),
    };

    Ok(Some(GeocodeAnswer {
        coordinate,
        display_label,
    }))
}
