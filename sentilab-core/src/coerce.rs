//! Field coercion — loosely-typed scalars in, typed optionals and display strings out.
//!
//! Every function here is total: malformed input degrades to `None` or to the
//! placeholder, never to an error.

use serde_json::Value;

/// Display placeholder for an absent value.
pub const PLACEHOLDER: &str = "—";

/// Convert a raw scalar into a finite `f64`.
///
/// Numbers pass through when finite. Strings are trimmed and parsed; empty
/// strings, `NaN` and infinities are absent. Every other JSON type is absent.
pub fn to_optional_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parse a textual number, rejecting empty and non-finite input.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a fraction as a signed percentage with two decimals: `0.0523` → `+5.23%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let pct = v * 100.0;
            let sign = if pct > 0.0 { "+" } else { "" };
            format!("{sign}{pct:.2}%")
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format a fraction of a whole as an unsigned percentage: `0.25` → `25.00%`.
pub fn format_share(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format a number with thousands separators and at most two fractional digits.
///
/// Trailing fractional zeros are dropped (`1234.5` → `1,234.5`, `3.0` → `3`).
pub fn format_number(value: Option<f64>) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return PLACEHOLDER.to_string(),
    };

    let rounded = (v * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Short `MM/DD` axis label for an ISO-8601-prefixed date string.
///
/// Strings shorter than ten characters are returned unchanged.
pub fn format_date_label(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = date.chars().collect();
    if chars.len() < 10 {
        return date.to_string();
    }
    let month: String = chars[5..7].iter().collect();
    let day: String = chars[8..10].iter().collect();
    format!("{month}/{day}")
}
