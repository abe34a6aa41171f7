//! Errors raised while wiring a dashboard together.
//!
//! Fetch failures never surface here; they land in the owning family's state.

use thiserror::Error;

use sentilab_core::{ConfigError, DataError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] DataError),
}
