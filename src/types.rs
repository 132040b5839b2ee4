//! Request-scoped records produced by the lookup pipeline
//!
//! Serialized names follow the lookup endpoint's JSON contract
//! (`blklot`, `zoning_code`, `height_bulk`, ...).

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::rules::{RuleMatch, ZoningRule};

/// WGS-84 point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Degrees from a JSON number or numeric string; `None` unless finite
pub fn degrees_from_json(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Top-ranked geocoder match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeAnswer {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(rename = "display_name")]
    pub display_label: String,
}

/// Land parcel containing the point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelRecord {
    #[serde(rename = "blklot")]
    pub parcel_id: String,
    #[serde(rename = "block_num")]
    pub block_number: String,
    #[serde(rename = "lot_num")]
    pub lot_number: String,
    /// Zoning carried on the parcel row itself, when the dataset has it
    #[serde(rename = "zoning_code")]
    pub embedded_zone_code: Option<String>,
    #[serde(rename = "zoning_district")]
    pub embedded_zone_label: Option<String>,
}

impl ParcelRecord {
    /// Zoning answer synthesized from the parcel's embedded fields.
    ///
    /// `None` unless the embedded code is non-empty.
    pub fn embedded_zoning(&self) -> Option<ZoningDistrictRecord> {
        let code = self.embedded_zone_code.as_deref()?;
        if code.is_empty() {
            return None;
        }
        Some(ZoningDistrictRecord {
            zone_code: code.to_string(),
            zone_name: self.embedded_zone_label.clone().unwrap_or_default(),
        })
    }
}

/// Zoning district containing the point; `zone_code` is never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoningDistrictRecord {
    #[serde(rename = "zoning_code")]
    pub zone_code: String,
    #[serde(rename = "zoning_name")]
    pub zone_name: String,
}

/// Height and bulk district; either label may be empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightBulkRecord {
    #[serde(rename = "height_limit")]
    pub height_limit_label: String,
    #[serde(rename = "bulk_district")]
    pub bulk_district_label: String,
}

/// Merged output of the three containment queries
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResolvedFeatures {
    pub parcel: Option<ParcelRecord>,
    pub zoning: Option<ZoningDistrictRecord>,
    #[serde(rename = "height_bulk")]
    pub height_bulk: Option<HeightBulkRecord>,
}

/// Rule lookup result owned by a [`ResolutionResult`].
///
/// Either the matched rule or the diagnostic explaining why there is none;
/// the two never travel separately.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Matched(ZoningRule),
    Unmatched { diagnostic: String },
}

impl RuleOutcome {
    pub fn rule(&self) -> Option<&ZoningRule> {
        match self {
            Self::Matched(rule) => Some(rule),
            Self::Unmatched { .. } => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Matched(_) => None,
            Self::Unmatched { diagnostic } => Some(diagnostic.as_str()),
        }
    }
}

impl From<RuleMatch<'_>> for RuleOutcome {
    fn from(m: RuleMatch<'_>) -> Self {
        match m {
            RuleMatch::Matched(rule) => Self::Matched(rule.clone()),
            other => Self::Unmatched {
                diagnostic: other.diagnostic().unwrap_or_default(),
            },
        }
    }
}

// Serialized as two sibling fields of the result: the rule (or null) and
// the message, which is present only when non-empty.
impl Serialize for RuleOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let diagnostic = self.diagnostic().filter(|d| !d.is_empty());
        let mut map = serializer.serialize_map(Some(1 + diagnostic.is_some() as usize))?;
        map.serialize_entry("zoning_rules", &self.rule())?;
        if let Some(diagnostic) = diagnostic {
            map.serialize_entry("zoning_rules_message", diagnostic)?;
        }
        map.end()
    }
}

/// Terminal answer for one lookup request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    #[serde(flatten)]
    features: ResolvedFeatures,
    #[serde(flatten)]
    rule: RuleOutcome,
}

impl ResolutionResult {
    pub fn new(features: ResolvedFeatures, rule: RuleOutcome) -> Self {
        Self { features, rule }
    }

    pub fn parcel(&self) -> Option<&ParcelRecord> {
        self.features.parcel.as_ref()
    }

    pub fn zoning(&self) -> Option<&ZoningDistrictRecord> {
        self.features.zoning.as_ref()
    }

    pub fn height_bulk(&self) -> Option<&HeightBulkRecord> {
        self.features.height_bulk.as_ref()
    }

    pub fn zoning_rule(&self) -> Option<&ZoningRule> {
        self.rule.rule()
    }

    pub fn zoning_rule_diagnostic(&self) -> Option<&str> {
        self.rule.diagnostic()
    }

    pub fn features(&self) -> &ResolvedFeatures {
        &self.features
    }
}

/// Address lookup: where the geocoder put it, and what is there
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressLookup {
    pub geocode: GeocodeAnswer,
    pub result: ResolutionResult,
}
