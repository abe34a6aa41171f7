//! Dashboard orchestrator — four query families on one cooperative scheduler.
//!
//! Selections issue fetches as Tokio tasks. Each task sends its completion,
//! tagged with the ticket it was issued under, over an unbounded channel.
//! Only the owner applies completions (`apply_next`, `drain_ready`,
//! `settle`), so all state mutation happens in one place and every mutation
//! is preceded by the family's ticket check.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use sentilab_core::config::DisplayConfig;
use sentilab_core::data::{
    normalize_name, normalize_ticker, Backend, Endpoints, FeedFetcher, HttpTransport,
    SourceResolver, Transport,
};
use sentilab_core::domain::{HoldingsReport, InsiderReport};
use sentilab_core::{
    Analytics, ChartProjection, DataError, PriceSeries, SentilabConfig, Series,
    SeriesFingerprint, SourceTag,
};

use crate::error::DashboardError;
use crate::family::{FamilyKind, FamilyStatus, Outcome, QueryFamily, SourceState, Ticket};

/// Key of the price family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceKey {
    pub ticker: String,
    pub period: String,
}

/// A finished fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub enum Completion {
    Price(Ticket<PriceKey>, Result<PriceSeries, DataError>),
    Entity(Ticket<String>, Result<Series, DataError>),
    Holdings(Ticket<String>, Result<HoldingsReport, DataError>),
    Insiders(Ticket<String>, Result<InsiderReport, DataError>),
}

impl Completion {
    pub fn family(&self) -> FamilyKind {
        match self {
            Completion::Price(..) => FamilyKind::Price,
            Completion::Entity(..) => FamilyKind::Entity,
            Completion::Holdings(..) => FamilyKind::Holdings,
            Completion::Insiders(..) => FamilyKind::Insiders,
        }
    }
}

/// Result of applying one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub family: FamilyKind,
    pub outcome: Outcome,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub ticker: Option<String>,
    pub period: String,
    pub entity: Option<String>,

    pub price: FamilyStatus,
    pub source: Option<SourceTag>,
    pub fingerprint: Option<SeriesFingerprint>,
    pub analytics: Analytics,

    pub entity_sentiment: FamilyStatus,
    pub entity_projection: ChartProjection,

    pub holdings: FamilyStatus,
    pub holdings_report: Option<HoldingsReport>,

    pub insiders: FamilyStatus,
    pub insider_report: Option<InsiderReport>,
}

impl DashboardView {
    pub fn status(&self, family: FamilyKind) -> &FamilyStatus {
        match family {
            FamilyKind::Price => &self.price,
            FamilyKind::Entity => &self.entity_sentiment,
            FamilyKind::Holdings => &self.holdings,
            FamilyKind::Insiders => &self.insiders,
        }
    }
}

/// Owns the four families and the completion channel.
pub struct Dashboard {
    resolver: SourceResolver,
    feeds: FeedFetcher,
    display: DisplayConfig,
    default_period: String,

    ticker: Option<String>,
    period: String,
    entity_name: Option<String>,

    price: QueryFamily<PriceKey, PriceSeries>,
    entity: QueryFamily<String, Series>,
    holdings: QueryFamily<String, HoldingsReport>,
    insiders: QueryFamily<String, InsiderReport>,
    price_fingerprint: Option<SeriesFingerprint>,

    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Dashboard {
    /// Dashboard over an arbitrary backend.
    pub fn new(backend: Backend, config: &SentilabConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            resolver: SourceResolver::new(backend.clone()),
            feeds: FeedFetcher::new(backend),
            display: config.display.clone(),
            default_period: config.query.default_period.clone(),
            ticker: None,
            period: config.query.default_period.clone(),
            entity_name: None,
            price: QueryFamily::new(FamilyKind::Price),
            entity: QueryFamily::new(FamilyKind::Entity),
            holdings: QueryFamily::new(FamilyKind::Holdings),
            insiders: QueryFamily::new(FamilyKind::Insiders),
            price_fingerprint: None,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Dashboard over `transport`, with endpoints built from `config`.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: &SentilabConfig,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        let endpoints = Endpoints::new(&config.api, &config.query)?;
        Ok(Self::new(Backend::new(transport, endpoints), config))
    }

    /// Dashboard talking HTTP to the configured backend.
    pub fn connect(config: &SentilabConfig) -> Result<Self, DashboardError> {
        let transport = HttpTransport::new()?;
        Self::with_transport(Arc::new(transport), config)
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    /// Completions issued but not yet applied or discarded.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn price_state(&self) -> &SourceState<PriceKey, PriceSeries> {
        self.price.state()
    }

    /// Select a ticker; drives the price and insider families.
    ///
    /// Blank input makes both families idle.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; fetches are spawned onto it.
    pub fn select_ticker(&mut self, raw: &str) {
        match normalize_ticker(raw) {
            Some(ticker) => {
                self.ticker = Some(ticker);
                self.issue_price();
                self.issue_insiders();
            }
            None => {
                self.ticker = None;
                self.price.clear();
                self.price_fingerprint = None;
                self.insiders.clear();
            }
        }
    }

    /// Select a price period. Blank input restores the configured default.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; fetches are spawned onto it.
    pub fn select_period(&mut self, raw: &str) {
        let period = raw.trim();
        self.period = if period.is_empty() {
            self.default_period.clone()
        } else {
            period.to_string()
        };
        self.issue_price();
    }

    /// Select an entity; drives the entity-sentiment and holdings families.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; fetches are spawned onto it.
    pub fn select_entity(&mut self, raw: &str) {
        match normalize_name(raw) {
            Some(name) => {
                self.entity_name = Some(name.clone());
                if let Some(ticket) = self.entity.select(name.clone()) {
                    let feeds = self.feeds.clone();
                    self.spawn(async move {
                        let result = feeds.entity_sentiment(&ticket.key).await;
                        Completion::Entity(ticket, result)
                    });
                }
                if let Some(ticket) = self.holdings.select(name) {
                    let feeds = self.feeds.clone();
                    self.spawn(async move {
                        let result = feeds.holdings(&ticket.key).await;
                        Completion::Holdings(ticket, result)
                    });
                }
            }
            None => {
                self.entity_name = None;
                self.entity.clear();
                self.holdings.clear();
            }
        }
    }

    /// Manual refresh of the price series. Returns `false` when no ticker is selected.
    ///
    /// A refresh issued while the initial load is still in flight supersedes
    /// that load.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; fetches are spawned onto it.
    pub fn refresh(&mut self) -> bool {
        let Some(ticket) = self.price.begin_refresh() else {
            return false;
        };
        let resolver = self.resolver.clone();
        self.spawn(async move {
            let result = resolver
                .refresh(&ticket.key.ticker, &ticket.key.period)
                .await;
            Completion::Price(ticket, result)
        });
        true
    }

    fn issue_price(&mut self) {
        let Some(ticker) = self.ticker.clone() else {
            return;
        };
        let key = PriceKey {
            ticker,
            period: self.period.clone(),
        };
        if let Some(ticket) = self.price.select(key) {
            self.price_fingerprint = None;
            let resolver = self.resolver.clone();
            self.spawn(async move {
                let result = resolver
                    .resolve(&ticket.key.ticker, &ticket.key.period)
                    .await;
                Completion::Price(ticket, result)
            });
        }
    }

    fn issue_insiders(&mut self) {
        let Some(ticker) = self.ticker.clone() else {
            return;
        };
        if let Some(ticket) = self.insiders.select(ticker) {
            let feeds = self.feeds.clone();
            self.spawn(async move {
                let result = feeds.insiders(&ticket.key).await;
                Completion::Insiders(ticket, result)
            });
        }
    }

    fn spawn<F>(&mut self, fetch: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            // The receiver lives as long as the dashboard; a send error only
            // means the dashboard is gone.
            let _ = tx.send(fetch.await);
        });
    }

    /// Apply one completion through its family's ticket check.
    pub fn apply(&mut self, completion: Completion) -> Update {
        let family = completion.family();
        let outcome = match completion {
            Completion::Price(ticket, result) => self.apply_price(ticket, result),
            Completion::Entity(ticket, result) => self.entity.complete(ticket, result),
            Completion::Holdings(ticket, result) => self.holdings.complete(ticket, result),
            Completion::Insiders(ticket, result) => self.insiders.complete(ticket, result),
        };
        Update { family, outcome }
    }

    fn apply_price(
        &mut self,
        ticket: Ticket<PriceKey>,
        result: Result<PriceSeries, DataError>,
    ) -> Outcome {
        let fingerprint = match &result {
            Ok(series) if self.price.is_current(&ticket) => {
                Some(SeriesFingerprint::of(&series.observations))
            }
            _ => None,
        };
        let refresh = ticket.is_refresh();
        let outcome = self.price.complete(ticket, result);

        if outcome == Outcome::Applied {
            if let Some(fp) = fingerprint {
                if refresh && self.price_fingerprint.as_ref() == Some(&fp) {
                    info!(fingerprint = fp.short(), "refresh returned an unchanged series");
                } else {
                    debug!(fingerprint = fp.short(), "price series updated");
                }
                self.price_fingerprint = Some(fp);
            }
        }
        outcome
    }

    /// Wait for the next completion and apply it. `None` when nothing is in flight.
    pub async fn apply_next(&mut self) -> Option<Update> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(self.apply(completion))
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn drain_ready(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            updates.push(self.apply(completion));
        }
        updates
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Some(update) = self.apply_next().await {
            updates.push(update);
        }
        updates
    }

    /// Derived views over the current state.
    pub fn view(&self) -> DashboardView {
        let price = self.price.state();
        let observations: &[_] = price
            .result
            .as_ref()
            .map(|p| p.observations.as_slice())
            .unwrap_or(&[]);
        let entity_series: &[_] = self
            .entity
            .result()
            .map(|s| s.as_slice())
            .unwrap_or(&[]);

        DashboardView {
            ticker: self.ticker.clone(),
            period: self.period.clone(),
            entity: self.entity_name.clone(),

            price: price.status(),
            source: price.result.as_ref().map(|p| p.source),
            fingerprint: self.price_fingerprint.clone(),
            analytics: Analytics::project(observations, &self.display),

            entity_sentiment: self.entity.state().status(),
            entity_projection: ChartProjection::sentiment(entity_series),

            holdings: self.holdings.state().status(),
            holdings_report: self.holdings.result().cloned(),

            insiders: self.insiders.state().status(),
            insider_report: self.insiders.result().cloned(),
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("ticker", &self.ticker)
            .field("period", &self.period)
            .field("entity", &self.entity_name)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
