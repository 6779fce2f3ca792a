// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plaintext Graphite line format: `<name> <value> <timestamp>`.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A single metric sample in Graphite's plaintext protocol.
///
/// Renders as `<name> <value> <timestamp>` where the name is a dot-delimited
/// path and the timestamp is unix time in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    /// Dot-delimited metric path, e.g. `host1.net.rx_bps`.
    pub name: String,
    /// Value rendered as text.
    pub value: String,
    /// Unix timestamp in whole seconds.
    pub timestamp: u64,
}

impl MetricLine {
    /// Create a line with an explicit timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl fmt::Display, timestamp: u64) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            timestamp,
        }
    }

    /// Create a line stamped with the current time.
    #[must_use]
    pub fn now(name: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::new(name, value, unix_now())
    }
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.value, self.timestamp)
    }
}

/// Stamp a batch of `(name, value)` pairs with the current time.
///
/// When `prefix` is non-empty it is dot-joined in front of every name, so
/// `("a.b", 5)` with prefix `"host1"` becomes `host1.a.b 5 <now>`.
#[must_use]
pub fn stamp_now(data: &[(&str, f64)], prefix: Option<&str>) -> Vec<MetricLine> {
    let now = unix_now();
    data.iter()
        .map(|(name, value)| {
            let metric = match prefix {
                Some(p) if !p.is_empty() => format!("{p}.{name}"),
                _ => (*name).to_string(),
            };
            MetricLine::new(metric, value, now)
        })
        .collect()
}

/// Current unix time in whole seconds.
#[must_use]
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
