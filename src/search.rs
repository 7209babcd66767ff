//! The matcher: evaluates a [`Query`] against a metadata collection.
//!
//! A threshold is a ceiling, not a floor. It exists to exclude images with
//! too many instances of a class while still requiring at least one
//! instance. A record with zero instances of a class never matches on that
//! class, whatever the threshold says, and a ceiling of 0 can never be
//! satisfied (intentional, not an error).

use crate::query::{Query, SearchMode};
use crate::record::DetectionRecord;

/// Order-preserving filter of `records` against `query`.
///
/// Pure and idempotent: the output is always a subsequence of the input in
/// its original relative order, and repeated calls with unchanged inputs
/// return identical results. A non-actionable query (no selected classes)
/// yields no matches; callers are expected to skip the call entirely in
/// that case rather than treat it as unconstrained.
pub fn search<'a>(records: &'a [DetectionRecord], query: &Query) -> Vec<&'a DetectionRecord> {
    if !query.is_actionable() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| record_matches(record, query))
        .collect()
}

fn record_matches(record: &DetectionRecord, query: &Query) -> bool {
    debug_assert!(record.counts_consistent());

    let mut verdicts = query
        .classes
        .iter()
        .map(|label| class_is_match(record.class_count(label), query.threshold(label)));

    match query.mode {
        SearchMode::Any => verdicts.any(|m| m),
        SearchMode::All => verdicts.all(|m| m),
    }
}

/// Per-class verdict: at least one instance, and no more than the ceiling
/// when one is set.
fn class_is_match(count: u32, ceiling: Option<u32>) -> bool {
    match ceiling {
        None => count >= 1,
        Some(max) => count >= 1 && count <= max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_never_a_floor() {
        assert!(class_is_match(2, Some(4)));
        assert!(class_is_match(4, Some(4)));
        assert!(!class_is_match(8, Some(4)));
        assert!(!class_is_match(0, Some(4)));
        assert!(class_is_match(1, None));
        assert!(!class_is_match(0, None));
    }

    #[test]
    fn zero_ceiling_matches_nothing() {
        assert!(!class_is_match(0, Some(0)));
        assert!(!class_is_match(1, Some(0)));
    }
}
