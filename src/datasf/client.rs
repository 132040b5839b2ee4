//! Point-in-polygon client for DataSF (Socrata) datasets
//!
//! One generic client serves every dataset; the dataset config supplies the
//! endpoint, geometry column and column bindings. Every failure is absorbed
//! into absence here and never reaches the caller.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::dataset::{DatasetConfig, DatasetRow};
use super::soql::containment_url;
use crate::error::{FetchError, Result};
use crate::resolution::ContainmentSource;
use crate::types::Coordinate;

/// What a successful query turned up
#[derive(Debug, Clone, PartialEq)]
pub enum Containment<R> {
    Found(R),
    /// Upstream answered with no containing feature
    NotFound,
    /// A feature contains the point but its row lacks the key field
    Unusable,
}

impl<R> Containment<R> {
    pub fn into_option(self) -> Option<R> {
        match self {
            Self::Found(row) => Some(row),
            Self::NotFound | Self::Unusable => None,
        }
    }
}

pub struct ContainmentClient<R: DatasetRow> {
    http: Client,
    config: DatasetConfig<R::Fields>,
    _row: PhantomData<fn() -> R>,
}

impl<R: DatasetRow> ContainmentClient<R> {
    pub fn new(http: Client, config: DatasetConfig<R::Fields>) -> Self {
        Self {
            http,
            config,
            _row: PhantomData,
        }
    }

    pub fn config(&self) -> &DatasetConfig<R::Fields> {
        &self.config
    }

    /// First feature containing `at`, or `None` for any kind of miss
    pub async fn find(&self, at: Coordinate) -> Option<R> {
        match self.query(at).await {
            Ok(Containment::Found(row)) => Some(row),
            Ok(Containment::NotFound) => {
                tracing::debug!("[{}] no feature contains {}", self.config.name, at);
                None
            }
            Ok(Containment::Unusable) => {
                tracing::debug!("[{}] feature at {} has no key field", self.config.name, at);
                None
            }
            Err(e) => {
                tracing::warn!("[{}] lookup at {} failed: {}", self.config.name, at, e);
                None
            }
        }
    }

    /// Issue the containment query, keeping the reason for any miss
    pub async fn query(&self, at: Coordinate) -> std::result::Result<Containment<R>, FetchError> {
        let url = containment_url(&self.config.endpoint, &self.config.geometry_column, at)?;
        tracing::debug!("[{}] GET {}", self.config.name, url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        tracing::debug!("[{}] status {}", self.config.name, status);

        let body = response.text().await?;
        self.decode_response(status.as_u16(), &body)
    }

    /// Interpret an upstream response
    pub fn decode_response(
        &self,
        status: u16,
        body: &str,
    ) -> std::result::Result<Containment<R>, FetchError> {
        if !(200..300).contains(&status) {
            tracing::debug!(
                "[{}] error body: {}",
                self.config.name,
                body.chars().take(500).collect::<String>()
            );
            return Err(FetchError::Status(status));
        }

        let rows = match serde_json::from_str::<Value>(body)? {
            Value::Array(rows) => rows,
            _ => return Err(FetchError::NotArray),
        };

        let Some(first) = rows.first() else {
            return Ok(Containment::NotFound);
        };

        Ok(first
            .as_object()
            .and_then(|row| R::decode(row, &self.config.fields))
            .map_or(Containment::Unusable, Containment::Found))
    }
}

#[async_trait]
impl<R: DatasetRow> ContainmentSource<R> for ContainmentClient<R> {
    fn dataset(&self) -> &str {
        &self.config.name
    }

    async fn find_containing(&self, at: Coordinate) -> Result<Option<R>> {
        Ok(self.find(at).await)
    }
}
