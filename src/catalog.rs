//! Class catalog aggregation.
//!
//! The catalog answers two questions for the search layer: which object
//! classes exist anywhere in the metadata collection, and which per-image
//! counts were actually observed for each class. The latter seeds the
//! threshold choices offered to the user, which is why a count of 0 never
//! appears: absence of a class is not an observed count.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::DetectionRecord;

/// Derived view over a metadata collection; recomputed on load or reprocess,
/// never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCatalog {
    /// All classes seen across the collection, sorted.
    pub unique_classes: Vec<String>,
    /// Per class, the distinct per-image counts observed, ascending.
    pub count_options: BTreeMap<String, Vec<u32>>,
}

impl ClassCatalog {
    pub fn is_empty(&self) -> bool {
        self.unique_classes.is_empty()
    }

    /// Observed per-image counts for `label`, ascending; empty when unseen.
    pub fn counts_for(&self, label: &str) -> &[u32] {
        self.count_options.get(label).map_or(&[], Vec::as_slice)
    }
}

/// Builds the [`ClassCatalog`] for a metadata collection in a single pass.
///
/// Pure function of its input; an empty collection yields an empty catalog.
pub fn aggregate(records: &[DetectionRecord]) -> ClassCatalog {
    let mut observed: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    for record in records {
        for (label, count) in record.class_counts() {
            observed.entry(label.clone()).or_default().insert(*count);
        }
    }

    ClassCatalog {
        unique_classes: observed.keys().cloned().collect(),
        count_options: observed
            .into_iter()
            .map(|(label, counts)| (label, counts.into_iter().collect()))
            .collect(),
    }
}
