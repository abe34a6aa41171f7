//! Shared handle on the transport plus the URL builder.

use std::sync::Arc;

use super::endpoints::Endpoints;
use super::provider::{DataError, Transport};

/// Cheap-to-clone pairing of a transport and the endpoints it talks to.
#[derive(Clone)]
pub struct Backend {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl Backend {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` and return the body of a success response.
    pub async fn get_body(&self, url: &str) -> Result<String, DataError> {
        let resp = self.transport.get(url).await?.require_success(url)?;
        Ok(resp.body)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("transport", &self.transport.name())
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
