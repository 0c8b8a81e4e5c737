//! Append-only label registries backing each matrix axis.

use std::collections::HashMap;

use crate::types::Label;

/// Ordered, append-only collection of labels with a label-to-index lookup.
///
/// Indices are assigned in insertion order and never reused. Inserting a label
/// twice appends a second entry and repoints the lookup at the newer index.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    labels: Vec<Label>,
    index: HashMap<Label, usize>,
}

impl LabelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label and return the index assigned to it.
    pub fn insert(&mut self, label: Label) -> usize {
        let idx = self.labels.len();
        self.labels.push(label);
        self.index.insert(label, idx);
        idx
    }

    /// Index currently mapped to `label`.
    #[must_use]
    pub fn index_of(&self, label: Label) -> Option<usize> {
        self.index.get(&label).copied()
    }

    #[must_use]
    pub fn contains(&self, label: Label) -> bool {
        self.index.contains_key(&label)
    }

    /// Labels in discovery order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
