//! In-memory transport that answers from a fixed script.
//!
//! Used by tests and offline demos. Routes are matched in insertion order by
//! URL substring; unmatched URLs fail with a network error.

use async_trait::async_trait;
use std::sync::Mutex;

use super::provider::{DataError, HttpResponse, Transport};

#[derive(Debug, Clone)]
struct Route {
    fragment: String,
    reply: Result<HttpResponse, DataError>,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `fragment` with `reply`.
    pub fn route(mut self, fragment: &str, reply: Result<HttpResponse, DataError>) -> Self {
        self.routes.push(Route {
            fragment: fragment.to_string(),
            reply,
        });
        self
    }

    pub fn ok(self, fragment: &str, body: &str) -> Self {
        self.route(fragment, Ok(HttpResponse::ok(body)))
    }

    pub fn status(self, fragment: &str, status: u16, body: &str) -> Self {
        self.route(fragment, Ok(HttpResponse::new(status, body)))
    }

    pub fn unreachable(self, fragment: &str) -> Self {
        self.route(
            fragment,
            Err(DataError::Network(format!("connection refused ({fragment})"))),
        )
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn reply_for(&self, url: &str) -> Result<HttpResponse, DataError> {
        self.routes
            .iter()
            .find(|r| url.contains(&r.fragment))
            .map(|r| r.reply.clone())
            .unwrap_or_else(|| Err(DataError::Network(format!("no route for {url}"))))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, DataError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());
        self.reply_for(url)
    }
}
