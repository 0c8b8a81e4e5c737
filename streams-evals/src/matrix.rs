//! The dynamic confusion matrix.
//!
//! Rows are true classes, and there are two column groups: known columns
//! (classes the classifier may predict directly) and novelty columns (pattern
//! identifiers the classifier emits for samples it flags as novel). A third,
//! single "unknown" column counts deferred samples per row.
//!
//! Both column groups and the row axis grow as labels are discovered. Every
//! axis is backed by a [`LabelRegistry`], so indices are stable for the
//! lifetime of the matrix.

use tracing::{debug, warn};

use crate::error::{MatrixError, Result};
use crate::registry::LabelRegistry;
use crate::types::Label;

/// Confusion matrix whose axes grow as new classes and novelty patterns appear.
#[derive(Debug, Clone, Default)]
pub struct DynamicConfusionMatrix {
    pub(crate) rows: LabelRegistry,
    pub(crate) known: LabelRegistry,
    pub(crate) novelty: LabelRegistry,
    /// Row-major counts, `known_cells[row][known_column]`.
    pub(crate) known_cells: Vec<Vec<u64>>,
    /// Row-major counts, `novelty_cells[row][novelty_column]`.
    pub(crate) novelty_cells: Vec<Vec<u64>>,
    /// Deferred samples per row. Resolution decrements without a floor.
    pub(crate) unknown: Vec<i64>,
}

impl DynamicConfusionMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matrix with the given labels registered as known, in order.
    pub fn with_known_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = Label>,
    {
        let mut matrix = Self::new();
        for label in labels {
            matrix.register_known(label);
        }
        matrix
    }

    /// Returns true if `label` is a registered known column.
    #[must_use]
    pub fn is_known(&self, label: Label) -> bool {
        self.known.contains(label)
    }

    /// Register `label` as a known column, creating its row if needed.
    ///
    /// Registering the same label twice appends a duplicate column; the label
    /// then resolves to the newer column and the older one stays at zero.
    pub fn register_known(&mut self, label: Label) {
        if self.known.contains(label) {
            warn!(label, "known label registered twice, appending duplicate column");
        }

        let column = self.known.insert(label);
        for row in &mut self.known_cells {
            row.push(0);
        }
        debug!(label, column, "registered known column");

        if !self.rows.contains(label) {
            self.add_row(label);
        }
    }

    /// Record a decided prediction for a sample whose true class is `real`.
    ///
    /// Novel predictions create the novelty column on first sight. Non-novel
    /// predictions must name a registered known label.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::UnregisteredKnownLabel`] when `is_novel` is false
    /// and `predicted` is not known. The matrix is left untouched.
    pub fn record_prediction(&mut self, real: Label, predicted: Label, is_novel: bool) -> Result<()> {
        self.check_known(predicted, is_novel)?;
        let row = self.ensure_row(real);
        self.apply_prediction(row, predicted, is_novel);
        Ok(())
    }

    /// Record that the decision for a sample of class `real` was deferred.
    pub fn record_deferral(&mut self, real: Label) {
        let row = self.ensure_row(real);
        self.unknown[row] += 1;
    }

    /// Resolve a previously deferred sample of class `real`.
    ///
    /// Decrements the row's unknown count and then records the prediction as
    /// [`record_prediction`](Self::record_prediction) would.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::UnknownRowLabel`] when no row exists for `real`,
    /// or [`MatrixError::UnregisteredKnownLabel`] as for `record_prediction`.
    /// Nothing is mutated on error.
    pub fn resolve_deferred(&mut self, real: Label, predicted: Label, is_novel: bool) -> Result<()> {
        let row = self.row_index(real)?;
        self.check_known(predicted, is_novel)?;

        self.unknown[row] -= 1;
        if self.unknown[row] < 0 {
            warn!(
                label = real,
                unknown = self.unknown[row],
                "resolved more samples than were deferred"
            );
        }

        self.apply_prediction(row, predicted, is_novel);
        Ok(())
    }

    /// True labels in row discovery order.
    #[must_use]
    pub fn row_labels(&self) -> &[Label] {
        self.rows.labels()
    }

    /// Known column labels in registration order.
    #[must_use]
    pub fn known_labels(&self) -> &[Label] {
        self.known.labels()
    }

    /// Novelty pattern labels in discovery order.
    #[must_use]
    pub fn novelty_labels(&self) -> &[Label] {
        self.novelty.labels()
    }

    /// Discovery index of a novelty pattern.
    #[must_use]
    pub fn novelty_index(&self, pattern: Label) -> Option<usize> {
        self.novelty.index_of(pattern)
    }

    /// Samples of class `real` predicted as the known label `predicted`.
    #[must_use]
    pub fn known_count(&self, real: Label, predicted: Label) -> Option<u64> {
        let row = self.rows.index_of(real)?;
        let column = self.known.index_of(predicted)?;
        Some(self.known_cells[row][column])
    }

    /// Samples of class `real` assigned to the novelty pattern `pattern`.
    #[must_use]
    pub fn novelty_count(&self, real: Label, pattern: Label) -> Option<u64> {
        let row = self.rows.index_of(real)?;
        let column = self.novelty.index_of(pattern)?;
        Some(self.novelty_cells[row][column])
    }

    /// Outstanding deferred samples of class `real`. May be negative.
    #[must_use]
    pub fn unknown_count(&self, real: Label) -> Option<i64> {
        self.rows.index_of(real).map(|row| self.unknown[row])
    }

    pub(crate) fn row_index(&self, label: Label) -> Result<usize> {
        self.rows
            .index_of(label)
            .ok_or(MatrixError::UnknownRowLabel(label))
    }

    fn check_known(&self, predicted: Label, is_novel: bool) -> Result<()> {
        if !is_novel && !self.known.contains(predicted) {
            return Err(MatrixError::UnregisteredKnownLabel(predicted));
        }
        Ok(())
    }

    fn ensure_row(&mut self, label: Label) -> usize {
        match self.rows.index_of(label) {
            Some(row) => row,
            None => self.add_row(label),
        }
    }

    fn add_row(&mut self, label: Label) -> usize {
        let row = self.rows.insert(label);
        self.known_cells.push(vec![0; self.known.len()]);
        self.novelty_cells.push(vec![0; self.novelty.len()]);
        self.unknown.push(0);
        debug!(label, row, "discovered row");
        row
    }

    fn add_novelty_column(&mut self, label: Label) -> usize {
        let column = self.novelty.insert(label);
        for row in &mut self.novelty_cells {
            row.push(0);
        }
        debug!(label, column, "discovered novelty pattern");
        column
    }

    /// Callers have already validated `predicted` for non-novel predictions.
    fn apply_prediction(&mut self, row: usize, predicted: Label, is_novel: bool) {
        if is_novel {
            let column = match self.novelty.index_of(predicted) {
                Some(column) => column,
                None => self.add_novelty_column(predicted),
            };
            self.novelty_cells[row][column] += 1;
        } else if let Some(column) = self.known.index_of(predicted) {
            self.known_cells[row][column] += 1;
        }
    }
}
