//! Parcel and zoning lookup for San Francisco addresses
//!
//! Resolves a free-text address to a point, finds the land parcel, zoning
//! district and height/bulk district containing it, and attaches the
//! human-readable rules for the zoning district.
//!
//! - `geocode`: address → coordinate (Nominatim)
//! - `datasf`: point-in-polygon queries against the DataSF datasets
//! - `resolution`: concurrent fan-out and zoning fallback merge
//! - `rules`: static rules catalog and zone code matching
//! - `pipeline`: the `ZoningLookup` service tying it together
//! - `api`: HTTP endpoints (feature `server`)

pub mod config;
pub mod datasf;
pub mod error;
pub mod geocode;
pub mod pipeline;
pub mod resolution;
pub mod rules;
pub mod types;

#[cfg(feature = "server")]
pub mod api;

pub use config::LookupConfig;
pub use error::{Result, ZoningError};
pub use pipeline::ZoningLookup;
pub use types::{
    AddressLookup, Coordinate, GeocodeAnswer, HeightBulkRecord, ParcelRecord, ResolutionResult,
    ResolvedFeatures, ZoningDistrictRecord,
};
