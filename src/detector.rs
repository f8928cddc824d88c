// Duplicate-notification suppression for the periodic leaderboard post.

use crate::fields::{resolve_name, resolve_number, Field};
use crate::normalize::Record;

const ENTRY_SEPARATOR: &str = "|";
const ABSENT_VALUE: &str = "-";

/// Deterministic fingerprint of a ranked record list.
///
/// Each record contributes `"{name}:{value}"`, joined with `|` in rank order.
/// An empty list fingerprints to the empty string.
pub fn fingerprint(records: &[Record], value_field: Field) -> String {
    records
        .iter()
        .map(|r| {
            let value = resolve_number(r, value_field)
                .map(|v| v.to_string())
                .unwrap_or_else(|| ABSENT_VALUE.to_string());
            format!("{}:{}", resolve_name(r), value)
        })
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Remembers the last fingerprint seen and reports when it changes.
///
/// State lives only in memory, so the first evaluation after a restart
/// always counts as a change.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    value_field: Field,
    last: String,
}

impl ChangeDetector {
    pub fn new(value_field: Field) -> Self {
        Self {
            value_field,
            last: String::new(),
        }
    }

    /// Compare `top` against the stored fingerprint.
    /// On a difference the stored fingerprint is replaced and `true` returned.
    pub fn evaluate(&mut self, top: &[Record]) -> bool {
        let current = fingerprint(top, self.value_field);
        if current == self.last {
            return false;
        }
        tracing::debug!(
            previous = %self.last,
            current = %current,
            "Leaderboard fingerprint changed"
        );
        self.last = current;
        true
    }

    /// The most recently stored fingerprint.
    pub fn last_fingerprint(&self) -> &str {
        &self.last
    }
}
