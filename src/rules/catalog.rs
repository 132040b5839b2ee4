//! Static zoning rules catalog
//!
//! Loaded once at startup from a versioned JSON file and read-only
//! afterwards. The built-in catalog is compiled into the binary.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::normalize::normalize_zone_code;
use crate::error::{CatalogError, Result, ZoningError};

const BUILTIN_CATALOG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/zoning-rules.json"
));

/// Human-readable rules for one zoning district
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoningRule {
    pub zone_code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permitted_uses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_uses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prohibited_uses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    version: Option<String>,
    rules: Vec<ZoningRule>,
}

/// In-memory rules table.
///
/// Each entry keeps its normalized code alongside it so lookups do not
/// re-normalize the catalog on every request.
#[derive(Debug, Clone)]
pub struct RulesCatalog {
    version: Option<String>,
    entries: Vec<(String, ZoningRule)>,
}

impl RulesCatalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Ok(Self::from_json_str(BUILTIN_CATALOG)?)
    }

    /// Load a catalog file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ZoningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&text)?;
        tracing::info!(
            "Loaded {} zoning rules from {} (version {})",
            catalog.len(),
            path.display(),
            catalog.version().unwrap_or("unversioned")
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    ///
    /// Rejects empty zone codes and codes that collide after normalization.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_rules(file.version, file.rules)
    }

    pub fn from_rules(
        version: Option<String>,
        rules: Vec<ZoningRule>,
    ) -> std::result::Result<Self, CatalogError> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut entries = Vec::with_capacity(rules.len());

        for (index, rule) in rules.into_iter().enumerate() {
            let normalized = normalize_zone_code(&rule.zone_code);
            if normalized.is_empty() {
                return Err(CatalogError::EmptyZoneCode { index });
            }
            if let Some(&first) = seen.get(&normalized) {
                let (_, earlier): &(String, ZoningRule) = &entries[first];
                return Err(CatalogError::DuplicateZoneCode {
                    normalized,
                    first: earlier.zone_code.clone(),
                    second: rule.zone_code,
                });
            }
            seen.insert(normalized.clone(), entries.len());
            entries.push((normalized, rule));
        }

        Ok(Self { version, entries })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &ZoningRule> {
        self.entries.iter().map(|(_, rule)| rule)
    }

    /// First rule whose normalized code equals `normalized`
    pub(crate) fn find_normalized(&self, normalized: &str) -> Option<&ZoningRule> {
        self.entries
            .iter()
            .find(|(code, _)| code == normalized)
            .map(|(_, rule)| rule)
    }
}
