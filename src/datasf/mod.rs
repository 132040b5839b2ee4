//! DataSF (Socrata) integration
//!
//! Point-in-polygon lookups against the city's open datasets:
//! parcels, zoning districts and height/bulk districts. No API key required.

pub mod client;
pub mod dataset;
pub mod soql;

pub use client::{Containment, ContainmentClient};
pub use dataset::{
    DatasetConfig, DatasetRow, HeightBulkFields, ParcelFields, Row, ZoningFields,
};
