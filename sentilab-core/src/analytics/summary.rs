//! Summary statistics — pure functions of a series.
//!
//! First and last rows are taken by position. Callers that want chronological
//! semantics pass a time-sorted series (see [`chronological`]).

use serde::{Deserialize, Serialize};

use crate::coerce::{format_number, format_percent, PLACEHOLDER};
use crate::config::SummaryOrder;
use crate::domain::{Observation, Signal};

/// Headline figures for the selected series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub rows: usize,
    /// `first.date → last.date`
    pub range: Option<String>,
    pub last_close: Option<f64>,
    pub total_return: Option<f64>,
    pub last_signal: Option<Signal>,
    pub equity_return: Option<f64>,
}

/// Summary figures rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDisplay {
    pub range: String,
    pub last_close: String,
    pub total_return: String,
    pub last_signal: String,
    pub equity_return: String,
}

impl SummaryStats {
    /// Positional summary of `series`.
    pub fn from_series(series: &[Observation]) -> Self {
        let (first, last) = match (series.first(), series.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Self::default(),
        };

        Self {
            rows: series.len(),
            range: Some(format!("{} → {}", first.date, last.date)),
            last_close: last.close,
            total_return: ratio_return(first.close, last.close),
            last_signal: last.signal.clone(),
            equity_return: ratio_return(first.equity, last.equity),
        }
    }

    pub fn with_order(series: &[Observation], order: SummaryOrder) -> Self {
        match order {
            SummaryOrder::Positional => Self::from_series(series),
            SummaryOrder::Chronological => Self::from_series(&chronological(series)),
        }
    }

    pub fn last_signal_label(&self) -> &str {
        self.last_signal
            .as_ref()
            .map(Signal::as_str)
            .unwrap_or(PLACEHOLDER)
    }

    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            range: self.range.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            last_close: format_number(self.last_close),
            total_return: format_percent(self.total_return),
            last_signal: self.last_signal_label().to_string(),
            equity_return: format_percent(self.equity_return),
        }
    }
}

/// `last / first - 1` when both are defined and the result is finite.
pub fn ratio_return(first: Option<f64>, last: Option<f64>) -> Option<f64> {
    let r = last? / first? - 1.0;
    r.is_finite().then_some(r)
}

/// Stable copy sorted by resolved time; rows without a time keep their
/// relative order after every timed row.
pub fn chronological(series: &[Observation]) -> Vec<Observation> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|o| (o.time.is_none(), o.time));
    sorted
}

/// The last `n` rows by position, most recent first.
pub fn recent_rows(series: &[Observation], n: usize) -> Vec<Observation> {
    series.iter().rev().take(n).cloned().collect()
}
