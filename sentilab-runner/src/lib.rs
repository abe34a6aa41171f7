//! Sentilab Runner — query lifecycle and dashboard orchestration.
//!
//! This crate builds on `sentilab-core` to provide:
//! - Per-family query state with generation tokens that discard stale results
//! - Manual refresh layered on the price family
//! - A dashboard owning the price, entity-sentiment, holdings and insider
//!   families, applying completions on a single cooperative scheduler

pub mod dashboard;
pub mod error;
pub mod family;

pub use dashboard::{Completion, Dashboard, DashboardView, PriceKey, Update};
pub use error::DashboardError;
pub use family::{FamilyKind, FamilyStatus, Outcome, QueryFamily, SourceState, Ticket};
