//! reqwest-backed transport.

use async_trait::async_trait;
use tracing::debug;

use super::provider::{DataError, HttpResponse, Transport};

/// Production transport over a shared `reqwest::Client`.
///
/// No timeout is set; the client default applies.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sentilab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, DataError> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::Network(format!("request to {url} failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::Network(format!("failed to read body from {url}: {e}")))?;

        debug!(url, status, bytes = body.len(), "response");
        Ok(HttpResponse { status, body })
    }
}
