//! Sentilab Core — the data aggregation pipeline behind the dashboard.
//!
//! - Field coercion and display formatting
//! - Temporal resolution of heterogeneous date strings
//! - Row normalization into canonical observations
//! - Price source resolution (live API, then static CSV) and single-step feeds
//! - Analytics projection: summary statistics and ordinal-indexed chart views

pub mod analytics;
pub mod coerce;
pub mod config;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod temporal;

pub use analytics::{Analytics, ChartPoint, ChartProjection, SummaryStats};
pub use config::{ConfigError, SentilabConfig, SummaryOrder};
pub use data::{DataError, PriceSeries, SourceTag};
pub use domain::{Observation, Series, Signal};
pub use fingerprint::SeriesFingerprint;
