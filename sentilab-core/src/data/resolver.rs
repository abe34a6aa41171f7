//! Price series resolution with a fixed two-step fallback.
//!
//! 1. Live API (`/api/data`) → tagged `api`
//! 2. On any API failure, the static CSV (`/data/<TICKER>_merged.csv`) → tagged `csv`
//! 3. If both fail, the CSV error is returned
//!
//! Manual refresh goes to the API with `refresh=true` and never falls back.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::Backend;
use super::payload::{parse_csv, parse_data_envelope};
use super::provider::{DataError, SourceTag};
use super::record::{normalize_batch, FieldSchema};
use crate::domain::Series;

/// A resolved price series and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub observations: Series,
    pub source: SourceTag,
}

/// Resolves the canonical price series for a (ticker, period) pair.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    backend: Backend,
    schema: FieldSchema,
}

impl SourceResolver {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            schema: FieldSchema::backend(),
        }
    }

    /// API first, static CSV second.
    pub async fn resolve(&self, ticker: &str, period: &str) -> Result<PriceSeries, DataError> {
        match self.fetch_api(ticker, period, false).await {
            Ok(observations) => Ok(PriceSeries {
                observations,
                source: SourceTag::Api,
            }),
            Err(api_err) => {
                warn!(ticker, period, error = %api_err, "price API failed, falling back to CSV");
                let observations = self.fetch_csv(ticker).await?;
                Ok(PriceSeries {
                    observations,
                    source: SourceTag::Csv,
                })
            }
        }
    }

    /// Ask the API to rebuild its cache. Failures are returned as-is.
    pub async fn refresh(&self, ticker: &str, period: &str) -> Result<PriceSeries, DataError> {
        let observations = self.fetch_api(ticker, period, true).await?;
        Ok(PriceSeries {
            observations,
            source: SourceTag::Api,
        })
    }

    pub async fn fetch_api(
        &self,
        ticker: &str,
        period: &str,
        refresh: bool,
    ) -> Result<Series, DataError> {
        let url = self.backend.endpoints().price(ticker, period, refresh);
        debug!(%url, refresh, "fetching price series from API");
        let body = self.backend.get_body(&url).await?;
        let records = parse_data_envelope(&body)?;
        Ok(normalize_batch(&records, &self.schema))
    }

    pub async fn fetch_csv(&self, ticker: &str) -> Result<Series, DataError> {
        let url = self.backend.endpoints().price_csv(ticker);
        debug!(%url, "fetching static CSV");
        let body = self.backend.get_body(&url).await?;
        let records = parse_csv(&body)?;
        Ok(normalize_batch(&records, &self.schema))
    }
}
