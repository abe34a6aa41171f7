//! Single-step feeds: entity sentiment, holdings, insider filings, ticker catalog, health.
//!
//! No fallback chain here — each fetch is API-or-fail.

use tracing::debug;

use super::backend::Backend;
use super::payload::{
    parse_data_envelope, parse_health, parse_holdings, parse_insiders, parse_tickers, Health,
};
use super::provider::DataError;
use super::record::{normalize_batch, FieldSchema};
use crate::domain::{HoldingsReport, InsiderReport, Series};

#[derive(Debug, Clone)]
pub struct FeedFetcher {
    backend: Backend,
    entity_schema: FieldSchema,
}

impl FeedFetcher {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            entity_schema: FieldSchema::entity(),
        }
    }

    /// Daily news sentiment for a person or organization.
    pub async fn entity_sentiment(&self, name: &str) -> Result<Series, DataError> {
        let url = self.backend.endpoints().entity(name);
        debug!(%url, "fetching entity sentiment");
        let body = self.backend.get_body(&url).await?;
        let records = parse_data_envelope(&body)?;
        Ok(normalize_batch(&records, &self.entity_schema))
    }

    /// Latest 13F holdings for the best CIK match of `name`.
    pub async fn holdings(&self, name: &str) -> Result<HoldingsReport, DataError> {
        let url = self.backend.endpoints().holdings(name);
        debug!(%url, "fetching holdings");
        let body = self.backend.get_body(&url).await?;
        parse_holdings(&body)
    }

    /// Recent Form 4 filings for a ticker.
    pub async fn insiders(&self, ticker: &str) -> Result<InsiderReport, DataError> {
        let url = self.backend.endpoints().insiders(ticker);
        debug!(%url, "fetching insider filings");
        let body = self.backend.get_body(&url).await?;
        parse_insiders(&body)
    }

    /// Tickers that have a static CSV on the backend.
    pub async fn tickers(&self) -> Result<Vec<String>, DataError> {
        let body = self.backend.get_body(&self.backend.endpoints().tickers()).await?;
        parse_tickers(&body)
    }

    pub async fn health(&self) -> Result<Health, DataError> {
        let body = self.backend.get_body(&self.backend.endpoints().health()).await?;
        parse_health(&body)
    }
}
