//! Lookup configuration
//!
//! Defaults point at the public San Francisco services. A YAML file named by
//! `ZONING_CONFIG` replaces any section it mentions; individual env vars
//! override on top of that.
//!
//! ```yaml
//! request_timeout_secs: 10
//! geocoder:
//!   user_agent: my-app/2.0
//! datasets:
//!   zoning:
//!     name: zoning
//!     endpoint: https://data.sfgov.org/resource/8br2-hhp3.json
//!     fields:
//!       zone_code: [zoning]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::datasf::dataset::{HEIGHT_BULK_URL, PARCELS_URL, ZONING_URL};
use crate::datasf::{DatasetConfig, HeightBulkFields, ParcelFields, ZoningFields};
use crate::error::{Result, ZoningError};
use crate::geocode::nominatim::NOMINATIM_URL;
use crate::rules::RulesCatalog;

pub const CONFIG_PATH_ENV: &str = "ZONING_CONFIG";
pub const DEFAULT_USER_AGENT: &str = concat!("parcel-zoning/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Identifies this client to the shared public geocoder
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetsConfig {
    pub parcels: DatasetConfig<ParcelFields>,
    pub zoning: DatasetConfig<ZoningFields>,
    pub height_bulk: DatasetConfig<HeightBulkFields>,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            parcels: DatasetConfig::new("parcels", PARCELS_URL),
            zoning: DatasetConfig::new("zoning", ZONING_URL),
            height_bulk: DatasetConfig::new("height_bulk", HEIGHT_BULK_URL),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub geocoder: GeocoderConfig,
    pub datasets: DatasetsConfig,
    /// Per outbound call
    pub request_timeout_secs: u64,
    /// Rules catalog to load instead of the built-in one
    pub rules_path: Option<PathBuf>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            geocoder: GeocoderConfig::default(),
            datasets: DatasetsConfig::default(),
            request_timeout_secs: 30,
            rules_path: None,
        }
    }
}

impl LookupConfig {
    /// Defaults, or the file named by `ZONING_CONFIG`, plus env overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ZoningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loading lookup config from {}", path.display());
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `ZONING_*` overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(endpoint) = lookup("ZONING_GEOCODER_URL") {
            self.geocoder.endpoint = endpoint;
        }
        if let Some(user_agent) = lookup("ZONING_USER_AGENT") {
            self.geocoder.user_agent = user_agent;
        }
        if let Some(path) = lookup("ZONING_RULES_PATH") {
            self.rules_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("ZONING_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                ZoningError::Config(format!("ZONING_TIMEOUT_SECS is not a number: {:?}", secs))
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shared HTTP client for every outbound call
    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.request_timeout())
            .build()
            .map_err(ZoningError::HttpClient)
    }

    /// The configured rules catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<RulesCatalog> {
        match &self.rules_path {
            Some(path) => RulesCatalog::from_path(path),
            None => RulesCatalog::builtin(),
        }
    }
}
