//! Domain types shared by the pipeline and the orchestrator.

pub mod filings;
pub mod observation;

pub use filings::{Holding, HoldingsReport, InsiderFiling, InsiderReport};
pub use observation::{Observation, Signal};

/// A canonical series in source order.
pub type Series = Vec<Observation>;
