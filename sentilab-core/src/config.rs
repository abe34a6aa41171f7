//! Serializable dashboard configuration (TOML).
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SentilabConfig {
    pub api: ApiConfig,
    pub query: QueryConfig,
    pub display: DisplayConfig,
}

/// Backend endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the `/api/*` endpoints.
    pub base_url: String,
    /// Origin of the static `/data/<TICKER>_merged.csv` files. Defaults to `base_url`.
    pub static_base_url: Option<String>,
    /// Fixed `sentiment_model` query parameter.
    pub sentiment_model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            static_base_url: None,
            sentiment_model: "vader".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn static_base(&self) -> &str {
        self.static_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

/// Query parameters sent with each family's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_period: String,
    /// News lookback for entity sentiment, in days.
    pub entity_days: u32,
    pub holdings_max_rows: u32,
    pub insiders_max_filings: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_period: "6mo".to_string(),
            entity_days: 14,
            holdings_max_rows: 25,
            insiders_max_filings: 5,
        }
    }
}

/// How summary statistics pick their first and last rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryOrder {
    /// First and last by position in the series as delivered.
    #[default]
    Positional,
    /// First and last after a stable sort by resolved time.
    Chronological,
}

/// Derived-view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub recent_rows: usize,
    pub summary_order: SummaryOrder,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_rows: 12,
            summary_order: SummaryOrder::Positional,
        }
    }
}

impl SentilabConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SentilabConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the query limits against the ranges the backend accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("query.entity_days", self.query.entity_days, 1, 90)?;
        check_range("query.holdings_max_rows", self.query.holdings_max_rows, 5, 100)?;
        check_range("query.insiders_max_filings", self.query.insiders_max_filings, 1, 20)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
