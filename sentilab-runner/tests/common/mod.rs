//! Shared test transport: scripted replies with per-route latency.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sentilab_core::data::{DataError, HttpResponse, ScriptedTransport, Transport};
use sentilab_core::SentilabConfig;
use sentilab_runner::Dashboard;

/// Wraps a [`ScriptedTransport`] and sleeps before answering URLs that match
/// a delay fragment. Meant for `start_paused` tests, where the sleeps resolve
/// in virtual time.
pub struct DelayedTransport {
    inner: ScriptedTransport,
    delays: Vec<(String, Duration)>,
}

impl DelayedTransport {
    pub fn new(inner: ScriptedTransport) -> Self {
        Self {
            inner,
            delays: Vec::new(),
        }
    }

    pub fn delay(mut self, fragment: &str, millis: u64) -> Self {
        self.delays
            .push((fragment.to_string(), Duration::from_millis(millis)));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests()
    }
}

#[async_trait]
impl Transport for DelayedTransport {
    fn name(&self) -> &str {
        "delayed"
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, DataError> {
        if let Some((_, d)) = self.delays.iter().find(|(f, _)| url.contains(f.as_str())) {
            tokio::time::sleep(*d).await;
        }
        self.inner.get(url).await
    }
}

pub fn dashboard(transport: Arc<dyn Transport>) -> Dashboard {
    Dashboard::with_transport(transport, &SentilabConfig::default()).unwrap()
}

/// A one-row price envelope whose close identifies the response.
pub fn price_body(close: f64) -> String {
    format!(r#"{{"data":[{{"Date":"2024-03-01","Close":{close},"signal":"Hold"}}]}}"#)
}

pub const CSV_BODY: &str = "Date,Open,High,Low,Close,Volume,sentiment,signal,equity\n\
2024-03-01,179.5,181.0,178.9,180.0,51000000,0.08,Buy,1.0\n\
2024-03-04,180.2,182.3,179.8,181.9,47000000,,Sell,1.01\n";
