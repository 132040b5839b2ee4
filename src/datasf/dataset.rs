//! Per-dataset configuration and row decoding
//!
//! The three containment datasets differ only in endpoint, geometry column
//! and which upstream columns carry which field. Column names are bound
//! here, at configuration time, never at the call site.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{HeightBulkRecord, ParcelRecord, ZoningDistrictRecord};

/// One upstream result row
pub type Row = Map<String, Value>;

pub const PARCELS_URL: &str = "https://data.sfgov.org/resource/acdm-wktn.json";
pub const ZONING_URL: &str = "https://data.sfgov.org/resource/8br2-hhp3.json";
pub const HEIGHT_BULK_URL: &str = "https://data.sfgov.org/resource/gc9v-7i5s.json";

fn default_geometry_column() -> String {
    "shape".to_string()
}

/// Where a dataset lives and how to read its rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig<F> {
    /// Short name used in logs and errors (e.g. "parcels")
    pub name: String,
    pub endpoint: String,
    #[serde(default = "default_geometry_column")]
    pub geometry_column: String,
    #[serde(default)]
    pub fields: F,
}

impl<F: Default> DatasetConfig<F> {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            geometry_column: default_geometry_column(),
            fields: F::default(),
        }
    }
}

/// A record type that can be decoded from a dataset row.
///
/// `decode` returns `None` when the row matched but lacks the record's
/// identifying field.
pub trait DatasetRow: Sized + Send + Sync + 'static {
    type Fields: Clone + Send + Sync + 'static;

    fn decode(row: &Row, fields: &Self::Fields) -> Option<Self>;
}

/// Text value of a column; numbers and booleans are stringified.
/// `None` when the column is missing or null.
pub fn field_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ============================================================================
// Parcels
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParcelFields {
    pub parcel_id: String,
    pub block_number: String,
    pub lot_number: String,
    pub zone_code: String,
    pub zone_label: String,
}

impl Default for ParcelFields {
    fn default() -> Self {
        Self {
            parcel_id: "blklot".into(),
            block_number: "block_num".into(),
            lot_number: "lot_num".into(),
            zone_code: "zoning_code".into(),
            zone_label: "zoning_district".into(),
        }
    }
}

impl DatasetRow for ParcelRecord {
    type Fields = ParcelFields;

    fn decode(row: &Row, fields: &ParcelFields) -> Option<Self> {
        let parcel_id = field_text(row, &fields.parcel_id).filter(|id| !id.is_empty())?;
        Some(Self {
            parcel_id,
            block_number: field_text(row, &fields.block_number).unwrap_or_default(),
            lot_number: field_text(row, &fields.lot_number).unwrap_or_default(),
            embedded_zone_code: field_text(row, &fields.zone_code),
            embedded_zone_label: field_text(row, &fields.zone_label),
        })
    }
}

// ============================================================================
// Zoning districts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoningFields {
    /// Candidate code columns, in priority order. The first present, non-null
    /// column is the code; an empty value there makes the row unusable.
    pub zone_code: Vec<String>,
    pub zone_name: String,
}

impl Default for ZoningFields {
    fn default() -> Self {
        Self {
            zone_code: vec!["zoning".into(), "zoning_sim".into()],
            zone_name: "districtname".into(),
        }
    }
}

impl DatasetRow for ZoningDistrictRecord {
    type Fields = ZoningFields;

    fn decode(row: &Row, fields: &ZoningFields) -> Option<Self> {
        let zone_code = fields
            .zone_code
            .iter()
            .find_map(|column| field_text(row, column))
            .filter(|code| !code.is_empty())?;
        Some(Self {
            zone_code,
            zone_name: field_text(row, &fields.zone_name).unwrap_or_default(),
        })
    }
}

// ============================================================================
// Height and bulk districts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightBulkFields {
    pub height_limit: String,
    pub bulk_district: String,
}

impl Default for HeightBulkFields {
    fn default() -> Self {
        Self {
            height_limit: "heightlimit".into(),
            bulk_district: "bulkdistrict".into(),
        }
    }
}

impl DatasetRow for HeightBulkRecord {
    type Fields = HeightBulkFields;

    // No key column: a matched row is always a record, even with both labels empty.
    fn decode(row: &Row, fields: &HeightBulkFields) -> Option<Self> {
        Some(Self {
            height_limit_label: field_text(row, &fields.height_limit).unwrap_or_default(),
            bulk_district_label: field_text(row, &fields.bulk_district).unwrap_or_default(),
        })
    }
}
