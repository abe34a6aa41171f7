//! Regulatory filing records: 13F holdings and Form 4 insider filings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::coerce::to_optional_number;

/// One row of a 13F information table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub title: String,
    /// Reported market value.
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub shares: Option<f64>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub cusip: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub put_call: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub investment_discretion: Option<String>,
}

/// Latest 13F holdings resolved for an entity name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HoldingsReport {
    pub cik: Option<String>,
    pub filing_date: Option<String>,
    pub holdings: Vec<Holding>,
}

/// One Form 4 filing reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderFiling {
    #[serde(default)]
    pub filing_date: String,
    #[serde(default)]
    pub accession: String,
    #[serde(default)]
    pub document: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub url: Option<String>,
}

/// Recent insider filings for a ticker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsiderReport {
    pub cik: Option<String>,
    pub filings: Vec<InsiderFiling>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(to_optional_number(raw.as_ref()))
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}
