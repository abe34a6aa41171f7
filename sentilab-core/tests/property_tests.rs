//! Property tests for pipeline invariants.
//!
//! 1. Normalization keeps exactly the dated records, dates verbatim, in order
//! 2. Coercion never yields a non-finite number
//! 3. Chart projections are time-sorted with ordinals 0..N-1
//! 4. Markers are exact, order-preserving subsets of the price projection

use proptest::prelude::*;
use serde_json::{json, Value};

use sentilab_core::analytics::{recent_rows, ChartProjection};
use sentilab_core::coerce::to_optional_number;
use sentilab_core::data::{normalize_batch, FieldSchema, RawRecord};
use sentilab_core::{Observation, Signal};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => (2015i32..2026, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| Some(format!("{y:04}-{m:02}-{d:02}"))),
        1 => Just(Some(String::new())),
        1 => Just(Some("   ".to_string())),
        1 => Just(None),
        1 => "[a-z]{1,8}".prop_map(Some),
    ]
}

fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1e6..1e6f64).prop_map(|v| json!(v)),
        (-1e6..1e6f64).prop_map(|v| json!(v.to_string())),
        Just(Value::Null),
        Just(json!("")),
        Just(json!("NaN")),
        Just(json!("inf")),
        Just(json!(true)),
        "[a-z]{0,4}".prop_map(|s| json!(s)),
    ]
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    (arb_date(), arb_cell(), arb_cell(), prop::option::of("Buy|Sell|Hold|")).prop_map(
        |(date, close, sentiment, signal)| {
            let mut record = RawRecord::new();
            if let Some(d) = date {
                record.insert("Date".into(), json!(d));
            }
            record.insert("Close".into(), close);
            record.insert("sentiment".into(), sentiment);
            if let Some(s) = signal {
                record.insert("signal".into(), json!(s));
            }
            record
        },
    )
}

fn arb_observation() -> impl Strategy<Value = Observation> {
    (
        prop::option::of(0i64..1_000_000),
        prop::option::of(1.0..500.0f64),
        prop::option::of(prop_oneof![
            Just(Signal::Buy),
            Just(Signal::Sell),
            Just(Signal::Hold),
        ]),
        "[0-9]{8}",
    )
        .prop_map(|(time, close, signal, date)| Observation {
            date,
            time,
            close,
            signal,
            ..Observation::default()
        })
}

// ── 1. Normalization ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalization_keeps_dated_records_verbatim(
        records in prop::collection::vec(arb_record(), 0..40),
    ) {
        let expected: Vec<String> = records
            .iter()
            .filter_map(|r| r.get("Date").and_then(Value::as_str))
            .filter(|d| !d.trim().is_empty())
            .map(str::to_string)
            .collect();

        let series = normalize_batch(&records, &FieldSchema::backend());
        let dates: Vec<String> = series.iter().map(|o| o.date.clone()).collect();
        prop_assert_eq!(dates, expected);

        for obs in &series {
            if let Some(signal) = &obs.signal {
                prop_assert!(!signal.as_str().is_empty());
            }
        }
    }

    #[test]
    fn coercion_is_finite_or_absent(cell in arb_cell()) {
        if let Some(v) = to_optional_number(Some(&cell)) {
            prop_assert!(v.is_finite());
        }
    }
}

// ── 2. Projection ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn price_projection_sorted_with_ordinals(
        series in prop::collection::vec(arb_observation(), 0..60),
    ) {
        let projection = ChartProjection::price(&series);
        let eligible = series
            .iter()
            .filter(|o| o.time.is_some() && o.close.is_some())
            .count();
        prop_assert_eq!(projection.len(), eligible);

        for (i, point) in projection.points().iter().enumerate() {
            prop_assert_eq!(point.index, i);
            prop_assert_eq!(Some(point.value), point.observation.close);
        }
        for pair in projection.points().windows(2) {
            prop_assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn markers_are_ordered_subsets(
        series in prop::collection::vec(arb_observation(), 0..60),
    ) {
        let projection = ChartProjection::price(&series);
        let buys = projection.buys();
        let sells = projection.sells();

        let buy_count = projection
            .points()
            .iter()
            .filter(|p| p.observation.signal == Some(Signal::Buy))
            .count();
        prop_assert_eq!(buys.len(), buy_count);
        prop_assert!(buys.iter().all(|p| p.observation.signal == Some(Signal::Buy)));
        prop_assert!(sells.iter().all(|p| p.observation.signal == Some(Signal::Sell)));
        prop_assert!(buys.windows(2).all(|w| w[0].index < w[1].index));
        prop_assert!(sells.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn recent_rows_is_reversed_tail(
        series in prop::collection::vec(arb_observation(), 0..30),
        n in 0usize..20,
    ) {
        let recent = recent_rows(&series, n);
        prop_assert_eq!(recent.len(), n.min(series.len()));
        for (i, obs) in recent.iter().enumerate() {
            prop_assert_eq!(obs, &series[series.len() - 1 - i]);
        }
    }
}
