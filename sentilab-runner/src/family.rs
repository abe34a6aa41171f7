//! Query lifecycle — one independently-lifecycled feed per family.
//!
//! Each key change starts a new generation. A fetch carries the generation it
//! was issued under in its [`Ticket`]; at completion the ticket is checked
//! against the family's current generation and stale results are dropped
//! without touching state. Nothing is cancelled on the wire.
//!
//! Every ticket also carries a per-family request number. Only the most
//! recently issued request can land, so a manual refresh supersedes a load
//! still in flight for the same key. Refresh keeps the current generation and
//! raises an independent `refreshing` flag on top of `loading`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use sentilab_core::DataError;

/// The four query families composed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    Price,
    Entity,
    Holdings,
    Insiders,
}

impl FamilyKind {
    pub const ALL: [FamilyKind; 4] = [
        FamilyKind::Price,
        FamilyKind::Entity,
        FamilyKind::Holdings,
        FamilyKind::Insiders,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FamilyKind::Price => "price",
            FamilyKind::Entity => "entity",
            FamilyKind::Holdings => "holdings",
            FamilyKind::Insiders => "insiders",
        }
    }

    /// Only the price family drops its previous result when the key changes.
    pub fn clears_on_change(self) -> bool {
        matches!(self, FamilyKind::Price)
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validity token captured when a fetch is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    pub generation: u64,
    /// Per-family request number, increasing across loads and refreshes.
    pub request: u64,
    pub refresh: bool,
    pub key: K,
}

impl<K> Ticket<K> {
    pub fn is_refresh(&self) -> bool {
        self.refresh
    }
}

/// What happened to a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Success stored as the family's result.
    Applied,
    /// Failure stored as the family's error.
    Failed,
    /// Superseded; state untouched.
    Discarded,
}

/// Observable state of one family.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceState<K, T> {
    /// Active key; `None` while idle.
    pub key: Option<K>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub result: Option<T>,
}

impl<K, T> Default for SourceState<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            loading: false,
            refreshing: false,
            error: None,
            result: None,
        }
    }
}

impl<K, T> SourceState<K, T> {
    pub fn status(&self) -> FamilyStatus {
        FamilyStatus {
            active: self.key.is_some(),
            loading: self.loading,
            refreshing: self.refreshing,
            error: self.error.clone(),
        }
    }
}

/// Key-free, result-free summary of a family's state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilyStatus {
    pub active: bool,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl FamilyStatus {
    pub fn is_idle(&self) -> bool {
        !self.active
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing
    }
}

/// State machine for one query family.
#[derive(Debug)]
pub struct QueryFamily<K, T> {
    kind: FamilyKind,
    clear_on_change: bool,
    generation: u64,
    request_seq: u64,
    state: SourceState<K, T>,
}

impl<K, T> QueryFamily<K, T>
where
    K: Clone + PartialEq + fmt::Debug,
{
    pub fn new(kind: FamilyKind) -> Self {
        Self {
            kind,
            clear_on_change: kind.clears_on_change(),
            generation: 0,
            request_seq: 0,
            state: SourceState::default(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &SourceState<K, T> {
        &self.state
    }

    pub fn result(&self) -> Option<&T> {
        self.state.result.as_ref()
    }

    /// Make `key` active. Returns a ticket to fetch under, or `None` when the
    /// key is already active.
    pub fn select(&mut self, key: K) -> Option<Ticket<K>> {
        if self.state.key.as_ref() == Some(&key) {
            return None;
        }
        self.generation += 1;
        self.request_seq += 1;
        self.state.key = Some(key.clone());
        self.state.loading = true;
        self.state.refreshing = false;
        self.state.error = None;
        if self.clear_on_change {
            self.state.result = None;
        }
        debug!(family = %self.kind, generation = self.generation, ?key, "issuing fetch");
        Some(Ticket {
            generation: self.generation,
            request: self.request_seq,
            refresh: false,
            key,
        })
    }

    /// Deactivate the family. In-flight fetches become stale.
    pub fn clear(&mut self) {
        if self.state.key.is_none() && !self.state.loading {
            return;
        }
        self.generation += 1;
        self.request_seq += 1;
        self.state = SourceState::default();
        debug!(family = %self.kind, generation = self.generation, "family cleared");
    }

    /// Start a manual refresh of the active key. `None` while idle.
    ///
    /// Any load or refresh still in flight for the key is superseded.
    pub fn begin_refresh(&mut self) -> Option<Ticket<K>> {
        let key = self.state.key.clone()?;
        self.request_seq += 1;
        self.state.refreshing = true;
        self.state.error = None;
        debug!(family = %self.kind, generation = self.generation, request = self.request_seq, ?key, "issuing refresh");
        Some(Ticket {
            generation: self.generation,
            request: self.request_seq,
            refresh: true,
            key,
        })
    }

    /// Whether a completion under `ticket` would still be applied.
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation
            && ticket.request == self.request_seq
            && self.state.key.as_ref() == Some(&ticket.key)
            && (self.state.loading || self.state.refreshing)
    }

    /// Apply a completion if its ticket is still current.
    ///
    /// A refresh failure only records the error; the previous result stays.
    pub fn complete(&mut self, ticket: Ticket<K>, result: Result<T, DataError>) -> Outcome {
        if !self.is_current(&ticket) {
            debug!(
                family = %self.kind,
                generation = ticket.generation,
                current = self.generation,
                request = ticket.request,
                key = ?ticket.key,
                "discarding stale completion"
            );
            return Outcome::Discarded;
        }

        // the latest request settles the family
        self.state.loading = false;
        self.state.refreshing = false;

        match result {
            Ok(value) => {
                info!(family = %self.kind, generation = ticket.generation, refresh = ticket.is_refresh(), "result applied");
                self.state.result = Some(value);
                self.state.error = None;
                Outcome::Applied
            }
            Err(e) => {
                warn!(family = %self.kind, key = ?ticket.key, error = %e, "fetch failed");
                self.state.error = Some(e.to_string());
                Outcome::Failed
            }
        }
    }
}
