//! Association of discovered novelty patterns with true classes.
//!
//! Each novelty column is credited to the row holding its largest count, which
//! turns unsupervised pattern discovery into a per-class quality signal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matrix::DynamicConfusionMatrix;
use crate::types::Label;

/// Mapping from a true-class row to the novelty patterns credited to it.
///
/// Patterns are listed in the order they were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoveltyAssociation(HashMap<Label, Vec<Label>>);

impl NoveltyAssociation {
    /// Novelty patterns credited to `row`, empty when none.
    #[must_use]
    pub fn get(&self, row: Label) -> &[Label] {
        self.0.get(&row).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if `pattern` is credited to `row`.
    #[must_use]
    pub fn is_associated(&self, row: Label, pattern: Label) -> bool {
        self.get(row).contains(&pattern)
    }

    /// Row a pattern is credited to, if any.
    #[must_use]
    pub fn row_of(&self, pattern: Label) -> Option<Label> {
        self.0
            .iter()
            .find(|(_, patterns)| patterns.contains(&pattern))
            .map(|(&row, _)| row)
    }

    /// Number of rows with at least one associated pattern.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, &[Label])> {
        self.0.iter().map(|(&row, patterns)| (row, patterns.as_slice()))
    }
}

impl DynamicConfusionMatrix {
    /// Credit every novelty column to the row with the strictly greatest count.
    ///
    /// Rows are scanned in discovery order and the first maximum wins ties.
    /// Columns whose counts are all zero are left unassociated.
    #[must_use]
    pub fn novelty_association(&self) -> NoveltyAssociation {
        let mut by_row: HashMap<Label, Vec<Label>> = HashMap::new();

        for &pattern in self.novelty.labels() {
            let Some(column) = self.novelty.index_of(pattern) else {
                continue;
            };

            let mut best: Option<(Label, u64)> = None;
            for &row_label in self.rows.labels() {
                let Some(row) = self.rows.index_of(row_label) else {
                    continue;
                };
                let count = self.novelty_cells[row][column];
                if count > best.map_or(0, |(_, max)| max) {
                    best = Some((row_label, count));
                }
            }

            if let Some((row_label, _)) = best {
                by_row.entry(row_label).or_default().push(pattern);
            }
        }

        NoveltyAssociation(by_row)
    }
}
