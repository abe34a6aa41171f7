//! Row normalizer — raw heterogeneous records to canonical observations.
//!
//! `RawRecord` is the untyped boundary: a CSV row or a JSON object straight off
//! the wire. Nothing outside this module inspects one; everything downstream
//! sees `Observation`.

use serde_json::Value;

use crate::coerce::to_optional_number;
use crate::domain::{Observation, Series, Signal};
use crate::temporal::resolve_time;

/// Untyped string-keyed record as delivered by a source.
pub type RawRecord = serde_json::Map<String, Value>;

/// Canonical observation fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
    Sentiment,
    Signal,
    Equity,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Date,
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
        Field::Sentiment,
        Field::Signal,
        Field::Equity,
    ];

    pub fn canonical(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
            Field::Sentiment => "sentiment",
            Field::Signal => "signal",
            Field::Equity => "equity",
        }
    }

    /// Column name the backend writes for this field.
    fn backend(self) -> Option<&'static str> {
        match self {
            Field::Date => Some("Date"),
            Field::Open => Some("Open"),
            Field::High => Some("High"),
            Field::Low => Some("Low"),
            Field::Close => Some("Close"),
            Field::Volume => Some("Volume"),
            Field::Sentiment | Field::Signal | Field::Equity => None,
        }
    }
}

/// Which raw keys feed which canonical field.
///
/// Keys are matched case-sensitively; the first key present in a record wins.
/// A field with no keys is always absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    keys: Vec<(Field, Vec<String>)>,
}

impl FieldSchema {
    /// Only the lower-case canonical names.
    pub fn canonical() -> Self {
        Self {
            keys: Field::ALL
                .iter()
                .map(|&f| (f, vec![f.canonical().to_string()]))
                .collect(),
        }
    }

    /// Canonical names plus the capitalized backend column names.
    pub fn backend() -> Self {
        let mut schema = Self::canonical();
        for field in Field::ALL {
            if let Some(alias) = field.backend() {
                schema = schema.with_alias(field, alias);
            }
        }
        schema
    }

    /// Entity sentiment rows carry only a date and a sentiment score.
    pub fn entity() -> Self {
        Self::backend().restricted_to(&[Field::Date, Field::Sentiment])
    }

    pub fn with_alias(mut self, field: Field, key: &str) -> Self {
        match self.keys.iter_mut().find(|(f, _)| *f == field) {
            Some((_, keys)) => {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
            None => self.keys.push((field, vec![key.to_string()])),
        }
        self
    }

    pub fn restricted_to(mut self, fields: &[Field]) -> Self {
        self.keys.retain(|(f, _)| fields.contains(f));
        self
    }

    pub fn keys(&self, field: Field) -> &[String] {
        self.keys
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    fn lookup<'r>(&self, record: &'r RawRecord, field: Field) -> Option<&'r Value> {
        self.keys(field).iter().find_map(|k| record.get(k))
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::backend()
    }
}

/// Normalize one record. Always yields an observation; the date may be empty.
pub fn normalize_record(record: &RawRecord, schema: &FieldSchema) -> Observation {
    let date = date_text(schema.lookup(record, Field::Date));
    let time = resolve_time(Some(&date));
    let number = |field| to_optional_number(schema.lookup(record, field));

    Observation {
        time,
        open: number(Field::Open),
        high: number(Field::High),
        low: number(Field::Low),
        close: number(Field::Close),
        volume: number(Field::Volume),
        sentiment: number(Field::Sentiment),
        signal: signal_value(schema.lookup(record, Field::Signal)),
        equity: number(Field::Equity),
        date,
    }
}

/// Normalize a batch in input order, dropping records without a date.
pub fn normalize_batch<'r, I>(records: I, schema: &FieldSchema) -> Series
where
    I: IntoIterator<Item = &'r RawRecord>,
{
    records
        .into_iter()
        .map(|r| normalize_record(r, schema))
        .filter(|obs| !obs.date.trim().is_empty())
        .collect()
}

fn date_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn signal_value(value: Option<&Value>) -> Option<Signal> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(Signal::from(s.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn backend_row_normalizes() {
        let raw = record(json!({
            "Date": "2024-03-01",
            "Open": 180.1,
            "Close": "181.5",
            "Volume": "n/a",
            "sentiment": 0.12,
            "signal": "Buy",
            "equity": 1.02,
            "Dividends": 0.0
        }));
        let obs = normalize_record(&raw, &FieldSchema::backend());
        assert_eq!(obs.date, "2024-03-01");
        assert_eq!(obs.time, Some(1_709_251_200_000));
        assert_eq!(obs.open, Some(180.1));
        assert_eq!(obs.close, Some(181.5));
        assert_eq!(obs.volume, None);
        assert_eq!(obs.high, None);
        assert_eq!(obs.sentiment, Some(0.12));
        assert_eq!(obs.signal, Some(Signal::Buy));
        assert_eq!(obs.equity, Some(1.02));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let raw = record(json!({ "DATE": "2024-03-01", "CLOSE": 1.0 }));
        let obs = normalize_record(&raw, &FieldSchema::backend());
        assert_eq!(obs.date, "");
        assert_eq!(obs.close, None);
    }

    #[test]
    fn first_alias_wins() {
        let raw = record(json!({ "date": "2024-01-02", "Date": "1999-01-01" }));
        let obs = normalize_record(&raw, &FieldSchema::backend());
        assert_eq!(obs.date, "2024-01-02");
    }

    #[test]
    fn non_string_signal_is_dropped() {
        let raw = record(json!({ "date": "2024-01-02", "signal": 1 }));
        assert_eq!(normalize_record(&raw, &FieldSchema::canonical()).signal, None);
    }

    #[test]
    fn unparseable_date_keeps_row_without_time() {
        let raw = record(json!({ "date": "Q1 2024", "close": 5 }));
        let series = normalize_batch([&raw], &FieldSchema::canonical());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, "Q1 2024");
        assert_eq!(series[0].time, None);
    }

    #[test]
    fn batch_drops_dateless_rows_and_keeps_order() {
        let rows = vec![
            record(json!({ "Date": "2024-01-03", "Close": 3 })),
            record(json!({ "Close": 9 })),
            record(json!({ "Date": "", "Close": 8 })),
            record(json!({ "Date": "   ", "Close": 7 })),
            record(json!({ "Date": "2024-01-02", "Close": 2 })),
        ];
        let series = normalize_batch(&rows, &FieldSchema::backend());
        let dates: Vec<&str> = series.iter().map(|o| o.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-03", "2024-01-02"]);
    }

    #[test]
    fn entity_schema_ignores_prices() {
        let raw = record(json!({ "Date": "2024-01-02", "sentiment": -0.3, "Close": 5, "count": 4 }));
        let obs = normalize_record(&raw, &FieldSchema::entity());
        assert_eq!(obs.sentiment, Some(-0.3));
        assert_eq!(obs.close, None);
        assert!(FieldSchema::entity().keys(Field::Close).is_empty());
    }
}
