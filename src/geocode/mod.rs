//! Free-text address geocoding

pub mod nominatim;

use async_trait::async_trait;

use crate::types::GeocodeAnswer;

pub use nominatim::NominatimGeocoder;

/// Address → best coordinate.
///
/// Implementations return `None` for blank input and for every upstream
/// failure; nothing escapes as an error.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<GeocodeAnswer>;
}
