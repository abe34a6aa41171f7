//! Series fingerprinting — deterministic identity of a canonical series.
//!
//! Two series hash equal iff every observation matches field-for-field in the
//! same order. Used to tell whether a refresh actually changed anything.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Observation;

/// BLAKE3 digest of a series, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesFingerprint(String);

impl SeriesFingerprint {
    pub fn of(series: &[Observation]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(series.len() as u64).to_le_bytes());

        for obs in series {
            hash_str(&mut hasher, &obs.date);
            match obs.time {
                Some(t) => {
                    hasher.update(&[1]);
                    hasher.update(&t.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            for value in [
                obs.open,
                obs.high,
                obs.low,
                obs.close,
                obs.volume,
                obs.sentiment,
                obs.equity,
            ] {
                match value {
                    Some(v) => {
                        hasher.update(&[1]);
                        hasher.update(&v.to_le_bytes());
                    }
                    None => {
                        hasher.update(&[0]);
                    }
                }
            }
            hash_str(&mut hasher, obs.signal.as_ref().map_or("", |s| s.as_str()));
        }

        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for SeriesFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Length-prefixed so ("ab","c") and ("a","bc") differ.
fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
