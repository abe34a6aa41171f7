//! Wire payload parsing: CSV text and JSON envelopes into raw records and typed reports.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::provider::DataError;
use super::record::RawRecord;
use crate::domain::{Holding, HoldingsReport, InsiderFiling, InsiderReport};

/// Parse CSV text whose first line names the columns.
///
/// Every cell becomes a JSON string; coercion happens later in the normalizer.
/// Ragged rows and invalid UTF-8 are parse errors.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DataError::Parse(format!("invalid CSV header: {e}")))?
        .clone();

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| DataError::Parse(format!("invalid CSV row {}: {e}", i + 1)))?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn parse_object(body: &str) -> Result<Map<String, Value>, DataError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DataError::Parse(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(DataError::Parse(format!("invalid JSON: {e}"))),
    }
}

fn take_field<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    field: &str,
) -> Result<T, DataError> {
    let value = map.remove(field).ok_or_else(|| DataError::missing(field))?;
    serde_json::from_value(value)
        .map_err(|e| DataError::Parse(format!("invalid '{field}' field: {e}")))
}

fn optional_text(map: &Map<String, Value>, field: &str) -> Option<String> {
    match map.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the `data` array of records from an API envelope.
pub fn parse_data_envelope(body: &str) -> Result<Vec<RawRecord>, DataError> {
    let mut map = parse_object(body)?;
    take_field(&mut map, "data")
}

/// Parse a holdings response: `{ holdings: [...], cik?, filing_date? }`.
pub fn parse_holdings(body: &str) -> Result<HoldingsReport, DataError> {
    let mut map = parse_object(body)?;
    let holdings: Vec<Holding> = take_field(&mut map, "holdings")?;
    Ok(HoldingsReport {
        cik: optional_text(&map, "cik"),
        filing_date: optional_text(&map, "filing_date"),
        holdings,
    })
}

/// Parse an insider filings response: `{ filings: [...], cik? }`.
pub fn parse_insiders(body: &str) -> Result<InsiderReport, DataError> {
    let mut map = parse_object(body)?;
    let filings: Vec<InsiderFiling> = take_field(&mut map, "filings")?;
    Ok(InsiderReport {
        cik: optional_text(&map, "cik"),
        filings,
    })
}

/// Parse the cached ticker catalog: `{ tickers: [...] }`.
pub fn parse_tickers(body: &str) -> Result<Vec<String>, DataError> {
    let mut map = parse_object(body)?;
    take_field(&mut map, "tickers")
}

/// Backend liveness report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub ok: bool,
    pub ts: Option<String>,
}

/// Parse the health response: `{ ok: bool, ts: string }`.
pub fn parse_health(body: &str) -> Result<Health, DataError> {
    let mut map = parse_object(body)?;
    let ok: bool = take_field(&mut map, "ok")?;
    Ok(Health {
        ok,
        ts: optional_text(&map, "ts"),
    })
}
