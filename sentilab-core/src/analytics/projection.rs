//! Chart projections — time-sorted, filtered, ordinal-indexed views of a series.
//!
//! Trading days are unevenly spaced in calendar time, so charts plot against
//! the ordinal index and recover the calendar day through [`ChartProjection::label`].

use crate::domain::{Observation, Signal};
use crate::temporal::format_time_as_date;

/// One plotted row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Position in the projection, used as the x axis.
    pub index: usize,
    pub time: i64,
    /// The plotted y value (close or sentiment, depending on the projection).
    pub value: f64,
    pub observation: Observation,
}

/// Ordered, ordinal-indexed projection of a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartProjection {
    points: Vec<ChartPoint>,
}

impl ChartProjection {
    /// Rows with both `time` and `close`, ascending by time.
    pub fn price(series: &[Observation]) -> Self {
        Self::build(series, |o| o.close)
    }

    /// Rows with both `time` and `sentiment`, ascending by time.
    pub fn sentiment(series: &[Observation]) -> Self {
        Self::build(series, |o| o.sentiment)
    }

    fn build(series: &[Observation], value: impl Fn(&Observation) -> Option<f64>) -> Self {
        let mut rows: Vec<(i64, f64, &Observation)> = series
            .iter()
            .filter_map(|o| Some((o.time?, value(o)?, o)))
            .collect();
        // stable: equal timestamps keep source order
        rows.sort_by_key(|&(time, _, _)| time);

        let points = rows
            .into_iter()
            .enumerate()
            .map(|(index, (time, value, o))| ChartPoint {
                index,
                time,
                value,
                observation: o.clone(),
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(ordinal, value)` pairs for a plotting backend.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.index as f64, p.value))
            .collect()
    }

    /// Axis tick formatter: ordinal back to the row's `MM/DD` label.
    ///
    /// Fractional ordinals round to the nearest row; anything outside the
    /// projection yields an empty label.
    pub fn label(&self, ordinal: f64) -> String {
        if !ordinal.is_finite() || ordinal < -0.5 {
            return String::new();
        }
        let idx = ordinal.round() as usize;
        self.points
            .get(idx)
            .map(|p| format_time_as_date(p.time as f64))
            .unwrap_or_default()
    }

    /// Points whose signal equals `signal`, keeping their ordinals and order.
    pub fn markers(&self, signal: &Signal) -> Vec<ChartPoint> {
        self.points
            .iter()
            .filter(|p| p.observation.has_signal(signal))
            .cloned()
            .collect()
    }

    pub fn buys(&self) -> Vec<ChartPoint> {
        self.markers(&Signal::Buy)
    }

    pub fn sells(&self) -> Vec<ChartPoint> {
        self.markers(&Signal::Sell)
    }
}
