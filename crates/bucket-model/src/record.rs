//! Stored array records.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ArrayId;

/// Number of elements shown before a preview is truncated.
pub const PREVIEW_LEN: usize = 30;

/// A server-serialized timestamp.
///
/// The remote store decides the textual form, so the raw value is kept as-is
/// and only interpreted on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value.to_rfc3339())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the timestamp as UTC.
    ///
    /// RFC 3339 values are converted; values without an offset are assumed to
    /// already be UTC.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.0) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.0, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Human-readable age relative to `now`, e.g. "5 minutes ago".
    pub fn age(&self, now: DateTime<Utc>) -> Option<String> {
        let then = self.to_utc()?;
        let seconds = (now - then).num_seconds().max(0);
        let (amount, unit) = match seconds {
            0..=44 => return Some("just now".to_string()),
            45..=3_599 => ((seconds + 30) / 60, "minute"),
            3_600..=86_399 => ((seconds + 1_800) / 3_600, "hour"),
            86_400..=2_591_999 => ((seconds + 43_200) / 86_400, "day"),
            2_592_000..=31_535_999 => ((seconds + 1_296_000) / 2_592_000, "month"),
            _ => (seconds / 31_536_000, "year"),
        };
        let amount = amount.max(1);
        let plural = if amount == 1 { "" } else { "s" };
        Some(format!("{amount} {unit}{plural} ago"))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted integer sequence as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayRecord {
    pub id: ArrayId,
    pub data: Vec<i64>,
    pub is_sorted: bool,
    #[serde(rename = "creation_date")]
    pub created_at: Timestamp,
    #[serde(rename = "update_date")]
    pub updated_at: Timestamp,
}

impl ArrayRecord {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Comma-separated elements, truncated after `limit` with a trailing `...`.
    pub fn preview(&self, limit: usize) -> String {
        let shown = self
            .data
            .iter()
            .take(limit)
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if self.data.len() > limit {
            format!("{shown}...")
        } else {
            shown
        }
    }
}
