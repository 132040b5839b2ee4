//! Concurrent fan-out over the three containment datasets

use std::sync::Arc;

use reqwest::Client;

use super::merge::merge_zoning;
use super::ContainmentSource;
use crate::config::DatasetsConfig;
use crate::datasf::ContainmentClient;
use crate::error::Result;
use crate::types::{
    Coordinate, HeightBulkRecord, ParcelRecord, ResolvedFeatures, ZoningDistrictRecord,
};

#[derive(Clone)]
pub struct Resolver {
    parcels: Arc<dyn ContainmentSource<ParcelRecord>>,
    zoning: Arc<dyn ContainmentSource<ZoningDistrictRecord>>,
    height_bulk: Arc<dyn ContainmentSource<HeightBulkRecord>>,
}

impl Resolver {
    pub fn new(
        parcels: Arc<dyn ContainmentSource<ParcelRecord>>,
        zoning: Arc<dyn ContainmentSource<ZoningDistrictRecord>>,
        height_bulk: Arc<dyn ContainmentSource<HeightBulkRecord>>,
    ) -> Self {
        Self {
            parcels,
            zoning,
            height_bulk,
        }
    }

    /// Resolver backed by the configured DataSF datasets
    pub fn from_config(datasets: &DatasetsConfig, http: Client) -> Self {
        Self::new(
            Arc::new(ContainmentClient::new(http.clone(), datasets.parcels.clone())),
            Arc::new(ContainmentClient::new(http.clone(), datasets.zoning.clone())),
            Arc::new(ContainmentClient::new(http, datasets.height_bulk.clone())),
        )
    }

    /// Query all three datasets at once and merge the answers.
    ///
    /// All three queries run to completion before their results are
    /// combined; a source that fails to settle fails the whole resolution.
    pub async fn resolve(&self, at: Coordinate) -> Result<ResolvedFeatures> {
        let (parcel, zoning, height_bulk) = tokio::join!(
            self.parcels.find_containing(at),
            self.zoning.find_containing(at),
            self.height_bulk.find_containing(at),
        );
        let parcel = settled(self.parcels.as_ref(), parcel)?;
        let zoning = settled(self.zoning.as_ref(), zoning)?;
        let height_bulk = settled(self.height_bulk.as_ref(), height_bulk)?;

        tracing::debug!(
            "Resolved {}: parcel={} zoning={} height_bulk={}",
            at,
            parcel.is_some(),
            zoning.is_some(),
            height_bulk.is_some()
        );

        let zoning = merge_zoning(zoning, parcel.as_ref());
        Ok(ResolvedFeatures {
            parcel,
            zoning,
            height_bulk,
        })
    }
}

fn settled<R>(
    source: &dyn ContainmentSource<R>,
    outcome: Result<Option<R>>,
) -> Result<Option<R>> {
    outcome.inspect_err(|e| {
        tracing::error!("[{}] containment query failed: {}", source.dataset(), e)
    })
}
