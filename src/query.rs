//! Search intent: selected classes, OR/AND combination, optional per-class
//! count ceilings.

use std::collections::HashMap;

/// How per-class match results combine into a record-level verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Match when at least one selected class matches (OR).
    #[default]
    Any,
    /// Match only when every selected class matches (AND).
    All,
}

/// A normalized search query.
///
/// Built through [`QueryBuilder`], which deduplicates classes and drops
/// unparseable thresholds. A query with no selected classes is not
/// actionable: the caller must skip the search rather than interpret it as
/// "match everything".
#[derive(Clone, Debug, Default)]
pub struct Query {
    pub mode: SearchMode,
    pub classes: Vec<String>,
    /// Per-class maximum-count ceiling; absent means unbounded (presence
    /// >= 1 is still required).
    pub thresholds: HashMap<String, u32>,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn is_actionable(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Ceiling for `label`, if one is set for a selected class.
    pub fn threshold(&self, label: &str) -> Option<u32> {
        self.thresholds.get(label).copied()
    }
}

/// Parses a raw threshold selection.
///
/// `"none"` (any case) and any non-numeric input mean unbounded. A parse
/// failure must never be coerced to 0, which would exclude every record
/// with at least one detection.
pub fn parse_threshold(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return None;
    }
    raw.parse().ok()
}

#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    mode: SearchMode,
    classes: Vec<String>,
    thresholds: HashMap<String, u32>,
}

impl QueryBuilder {
    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Select a class; duplicates are ignored (first occurrence wins).
    pub fn class(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !self.classes.contains(&label) {
            self.classes.push(label);
        }
        self
    }

    /// Set a maximum-count ceiling for a class. Thresholds naming classes
    /// that end up unselected are harmless; the matcher ignores them.
    pub fn max_count(mut self, label: impl Into<String>, ceiling: u32) -> Self {
        self.thresholds.insert(label.into(), ceiling);
        self
    }

    /// Set a ceiling from raw user input; non-numeric input means unbounded.
    pub fn max_count_raw(self, label: impl Into<String>, raw: &str) -> Self {
        match parse_threshold(raw) {
            Some(ceiling) => self.max_count(label, ceiling),
            None => self,
        }
    }

    pub fn build(self) -> Query {
        Query {
            mode: self.mode,
            classes: self.classes,
            thresholds: self.thresholds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_selected_classes() {
        let query = Query::builder()
            .class("person")
            .class("car")
            .class("person")
            .build();
        assert_eq!(query.classes, vec!["person", "car"]);
    }

    #[test]
    fn empty_query_is_not_actionable() {
        assert!(!Query::builder().build().is_actionable());
        assert!(Query::builder().class("cat").build().is_actionable());
    }

    #[test]
    fn threshold_parsing_maps_sentinels_to_unbounded() {
        assert_eq!(parse_threshold("4"), Some(4));
        assert_eq!(parse_threshold("0"), Some(0));
        assert_eq!(parse_threshold("None"), None);
        assert_eq!(parse_threshold("none"), None);
        assert_eq!(parse_threshold(""), None);
        assert_eq!(parse_threshold("abc"), None);
        assert_eq!(parse_threshold("-1"), None);
    }

    #[test]
    fn raw_threshold_never_coerces_to_zero() {
        let query = Query::builder()
            .class("person")
            .max_count_raw("person", "garbage")
            .build();
        assert_eq!(query.threshold("person"), None);
    }
}
