//! Normalizing accessor over heterogeneous measure records.
//!
//! Depending on the query, a measure's value arrives either inline (`value`) or as
//! new-code period data (`periods`, or a singular `period` on some server versions).
//! The precedence is centralized here rather than repeated at every call site.

use crate::api::types::Measure;

impl Measure {
    /// The string value this measure carries for a new-code style query.
    ///
    /// When period data exists its first entry is authoritative, even when an inline
    /// value is also present; otherwise the inline value applies.
    #[must_use]
    pub fn new_code_value(&self) -> Option<&str> {
        if let Some(first) = self.periods.first() {
            return first.value.as_deref();
        }

        if let Some(period) = &self.period {
            return period.value.as_deref();
        }

        self.value.as_deref()
    }
}

/// Looks up `metric_key` in `measures` and returns its numeric value.
///
/// The first measure whose name matches wins (names are unique by convention, but
/// duplicates are tolerated). Returns `None` when the metric is absent, carries no
/// value, or carries a value that does not parse as a number. Never panics.
#[must_use]
pub fn extract_number(measures: &[Measure], metric_key: &str) -> Option<f64> {
    measures
        .iter()
        .find(|m| m.metric == metric_key)
        .and_then(Measure::new_code_value)
        .and_then(|v| v.parse::<f64>().ok())
}
