//! Transport trait and structured error types.
//!
//! The Transport trait abstracts over the HTTP client so the resolver and the
//! feed fetchers can be driven by a scripted transport in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures of a single fetch.
///
/// All three surface to the user as their display message; nothing downstream
/// branches on the variant except the logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Non-success HTTP status or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed CSV or JSON body.
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed body without the expected top-level field.
    #[error("missing data: response has no '{field}' field")]
    MissingData { field: String },
}

impl DataError {
    pub fn missing(field: &str) -> Self {
        DataError::MissingData {
            field: field.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DataError::Network(_) => "network",
            DataError::Parse(_) => "parse",
            DataError::MissingData { .. } => "missing_data",
        }
    }
}

/// Where a resolved price series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Api,
    Csv,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::Api => "api",
            SourceTag::Csv => "csv",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success status into `DataError::Network`.
    pub fn require_success(self, url: &str) -> Result<Self, DataError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DataError::Network(format!("HTTP {} for {url}", self.status)))
        }
    }
}

/// Minimal GET-only HTTP transport.
///
/// Implementations map connect, timeout and body-read failures to
/// `DataError::Network` and return every received status as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable name of this transport.
    fn name(&self) -> &str;

    async fn get(&self, url: &str) -> Result<HttpResponse, DataError>;
}
