// src/time.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Seconds since the Unix epoch (UTC). Used as the aggregation bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Truncates a point in time down to the whole second.
    pub fn from_datetime(datetime: &DateTime<Utc>) -> Self {
        Timestamp(datetime.timestamp())
    }

    pub fn as_secs(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the `time` field of an access log entry (RFC3339 with fractional
/// seconds, e.g. `2018-07-02T22:23:00.186641Z`).
pub fn parse_log_time(time_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(time_str)
        .ok()
        .map(|datetime| datetime.with_timezone(&Utc))
}
