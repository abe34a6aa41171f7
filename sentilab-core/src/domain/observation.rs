//! Canonical observation — one normalized daily data point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precomputed trading signal carried on an observation.
///
/// Unknown labels are preserved verbatim so nothing the backend sends is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    Other(String),
}

impl Signal {
    pub fn as_str(&self) -> &str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::Hold => "Hold",
            Signal::Other(s) => s,
        }
    }
}

impl From<String> for Signal {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Buy" => Signal::Buy,
            "Sell" => Signal::Sell,
            "Hold" => Signal::Hold,
            _ => Signal::Other(raw),
        }
    }
}

impl From<&str> for Signal {
    fn from(raw: &str) -> Self {
        Signal::from(raw.to_string())
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of price, sentiment, signal and equity data.
///
/// `date` is the only mandatory field; everything else is absent when the
/// source omitted it or sent something non-numeric.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub date: String,
    /// Epoch milliseconds resolved from `date`.
    pub time: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub sentiment: Option<f64>,
    pub signal: Option<Signal>,
    pub equity: Option<f64>,
}

impl Observation {
    /// Observation with only a date and its resolved time.
    pub fn dated(date: impl Into<String>) -> Self {
        let date = date.into();
        let time = crate::temporal::resolve_time(Some(&date));
        Self {
            date,
            time,
            ..Self::default()
        }
    }

    pub fn has_signal(&self, signal: &Signal) -> bool {
        self.signal.as_ref() == Some(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_round_trips_unknown_labels() {
        assert_eq!(Signal::from("Buy"), Signal::Buy);
        assert_eq!(Signal::from("buy"), Signal::Other("buy".into()));
        assert_eq!(String::from(Signal::Other("Strong Buy".into())), "Strong Buy");
        assert_eq!(Signal::Sell.to_string(), "Sell");
    }

    #[test]
    fn dated_resolves_time() {
        let obs = Observation::dated("2024-03-01");
        assert_eq!(obs.time, Some(1_709_251_200_000));
        assert!(obs.close.is_none());
        assert!(!obs.has_signal(&Signal::Buy));
    }
}
