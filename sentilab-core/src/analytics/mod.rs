//! Analytics projector — summary statistics and chart-ready views.
//!
//! Everything here is derived: recomputed from the canonical series on demand,
//! never stored alongside it.

pub mod projection;
pub mod summary;

pub use projection::{ChartPoint, ChartProjection};
pub use summary::{chronological, ratio_return, recent_rows, SummaryDisplay, SummaryStats};

use crate::config::DisplayConfig;
use crate::domain::Observation;

/// All views derived from one price series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analytics {
    pub summary: SummaryStats,
    pub price: ChartProjection,
    pub sentiment: ChartProjection,
    pub buys: Vec<ChartPoint>,
    pub sells: Vec<ChartPoint>,
    /// Most recent rows first, by position.
    pub recent: Vec<Observation>,
}

impl Analytics {
    pub fn project(series: &[Observation], display: &DisplayConfig) -> Self {
        let price = ChartProjection::price(series);
        Self {
            summary: SummaryStats::with_order(series, display.summary_order),
            sentiment: ChartProjection::sentiment(series),
            buys: price.buys(),
            sells: price.sells(),
            recent: recent_rows(series, display.recent_rows),
            price,
        }
    }
}
