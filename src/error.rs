//! Error types for the parcel/zoning lookup pipeline
//!
//! Lookups themselves never fail: upstream problems are absorbed into
//! absence at the client boundary. The types here cover what is left:
//! startup (config, catalog) and the one fault the resolver is allowed
//! to propagate.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZoningError>;

/// Main error type for the lookup pipeline
#[derive(Error, Debug)]
pub enum ZoningError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Rules catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Dataset '{dataset}' failed to settle: {message}")]
    Source { dataset: String, message: String },
}

/// Rules catalog load/validation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse rules catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rule at index {index} has an empty zone code")]
    EmptyZoneCode { index: usize },

    #[error("Zone codes '{first}' and '{second}' both normalize to '{normalized}'")]
    DuplicateZoneCode {
        normalized: String,
        first: String,
        second: String,
    },
}

/// Why an outbound call produced no usable answer.
///
/// Internal to the geocoder and containment clients; callers only ever
/// see the absence it collapses into.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not a JSON array")]
    NotArray,

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
