//! Utility functions and types.

use std::fmt::Debug;

/// Redact hides secrets like access keys when they show up in `Debug` output.
///
/// - Empty input prints `EMPTY`.
/// - Input shorter than 12 chars is fully replaced by `***`.
/// - Longer input keeps its first and last three chars, so two different keys
///   can still be told apart in logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        match length {
            0 => f.write_str("EMPTY"),
            1..=11 => f.write_str("***"),
            // Only print the edges when both are on char boundaries.
            _ => match (self.0.get(..3), self.0.get(length - 3..)) {
                (Some(head), Some(tail)) => write!(f, "{head}***{tail}"),
                _ => f.write_str("***"),
            },
        }
    }
}
