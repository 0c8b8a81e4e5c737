//! Contingency measures and aggregate error rates.
//!
//! Per-class counts treat every novelty pattern credited to a class (see
//! [`NoveltyAssociation`]) as if it were that class's own column.

use serde::{Deserialize, Serialize};

use crate::association::NoveltyAssociation;
use crate::error::Result;
use crate::matrix::DynamicConfusionMatrix;
use crate::types::Label;

/// TP/FP/FN/TN counts for a single true class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contingency {
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    /// True-positive mass of every other class, not a literal negative count.
    pub true_negatives: u64,
}

impl Contingency {
    /// `FP / max(1, FP + TN)`
    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positives, self.false_positives + self.true_negatives)
    }

    /// `FN / max(1, FN + TP)`
    #[must_use]
    pub fn false_negative_rate(&self) -> f64 {
        ratio(self.false_negatives, self.false_negatives + self.true_positives)
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

impl DynamicConfusionMatrix {
    /// Samples of class `label` predicted as `label`, or as a novelty pattern
    /// credited to it.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::UnknownRowLabel`](crate::MatrixError::UnknownRowLabel)
    /// when `label` has no row. The same applies to the other measures.
    pub fn true_positives(&self, label: Label, assoc: &NoveltyAssociation) -> Result<u64> {
        let row = self.row_index(label)?;

        let mut sum = self
            .known
            .index_of(label)
            .map_or(0, |column| self.known_cells[row][column]);

        sum += assoc
            .get(label)
            .iter()
            .filter_map(|&pattern| self.novelty.index_of(pattern))
            .map(|column| self.novelty_cells[row][column])
            .sum::<u64>();

        Ok(sum)
    }

    /// Samples of other classes predicted as `label`, or as a novelty pattern
    /// credited to it.
    pub fn false_positives(&self, label: Label, assoc: &NoveltyAssociation) -> Result<u64> {
        let own_row = self.row_index(label)?;
        let other_rows = || (0..self.rows.len()).filter(move |&row| row != own_row);

        let mut sum = self.known.index_of(label).map_or(0, |column| {
            other_rows()
                .map(|row| self.known_cells[row][column])
                .sum::<u64>()
        });

        for column in assoc
            .get(label)
            .iter()
            .filter_map(|&pattern| self.novelty.index_of(pattern))
        {
            sum += other_rows()
                .map(|row| self.novelty_cells[row][column])
                .sum::<u64>();
        }

        Ok(sum)
    }

    /// Samples of class `label` predicted as another known label, or as a
    /// novelty pattern not credited to it.
    pub fn false_negatives(&self, label: Label, assoc: &NoveltyAssociation) -> Result<u64> {
        let row = self.row_index(label)?;

        let mut sum = 0;
        if self.is_known(label) {
            sum += self
                .known
                .labels()
                .iter()
                .filter(|&&column_label| column_label != label)
                .filter_map(|&column_label| self.known.index_of(column_label))
                .map(|column| self.known_cells[row][column])
                .sum::<u64>();
        }

        let credited = assoc.get(label);
        sum += self
            .novelty
            .labels()
            .iter()
            .filter(|pattern| !credited.contains(pattern))
            .filter_map(|&pattern| self.novelty.index_of(pattern))
            .map(|column| self.novelty_cells[row][column])
            .sum::<u64>();

        Ok(sum)
    }

    /// Sum of the true positives of every other class.
    pub fn true_negatives(&self, label: Label, assoc: &NoveltyAssociation) -> Result<u64> {
        self.row_index(label)?;

        let mut sum = 0;
        for &other in self.rows.labels().iter().filter(|&&other| other != label) {
            sum += self.true_positives(other, assoc)?;
        }
        Ok(sum)
    }

    /// All four contingency measures for `label`.
    pub fn contingency(&self, label: Label, assoc: &NoveltyAssociation) -> Result<Contingency> {
        Ok(Contingency {
            true_positives: self.true_positives(label, assoc)?,
            false_positives: self.false_positives(label, assoc)?,
            false_negatives: self.false_negatives(label, assoc)?,
            true_negatives: self.true_negatives(label, assoc)?,
        })
    }

    /// Decided (non-deferred) samples of class `label`.
    pub fn explained(&self, label: Label) -> Result<u64> {
        let row = self.row_index(label)?;
        Ok(self.explained_at(row))
    }

    /// Decided samples across all classes.
    #[must_use]
    pub fn total_explained(&self) -> u64 {
        (0..self.rows.len()).map(|row| self.explained_at(row)).sum()
    }

    /// Combined error rate.
    ///
    /// Each class contributes its false-positive and false-negative rates
    /// weighted by its share of decided samples; the sum is halved. Classes
    /// with no decided samples contribute nothing.
    #[must_use]
    pub fn cer(&self) -> f64 {
        let total = self.total_explained();
        if total == 0 {
            return 0.0;
        }
        let assoc = self.novelty_association();

        let sum: f64 = self
            .rows
            .labels()
            .iter()
            .enumerate()
            .filter_map(|(row, &label)| {
                let explained = self.explained_at(row);
                if explained == 0 {
                    return None;
                }
                let counts = self.contingency(label, &assoc).ok()?;
                let weight = explained as f64 / total as f64;
                Some(weight * counts.false_positive_rate() + weight * counts.false_negative_rate())
            })
            .sum();

        sum / 2.0
    }

    /// Unknown rate: unweighted mean over classes of the deferred fraction.
    ///
    /// A class with deferred but no decided samples counts as 1, a class with
    /// neither counts as 0. An empty matrix has a rate of 0.
    #[must_use]
    pub fn unknown_rate(&self) -> f64 {
        let rows = self.rows.len();
        if rows == 0 {
            return 0.0;
        }

        let sum: f64 = (0..rows)
            .map(|row| {
                let unexplained = self.unknown[row] as f64;
                let explained = self.explained_at(row) as f64;
                if explained == 0.0 {
                    if unexplained == 0.0 { 0.0 } else { 1.0 }
                } else {
                    unexplained / (explained + unexplained)
                }
            })
            .sum();

        sum / rows as f64
    }

    fn explained_at(&self, row: usize) -> u64 {
        self.known_cells[row].iter().sum::<u64>() + self.novelty_cells[row].iter().sum::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatrixError;

    const EPSILON: f64 = 1e-12;

    fn record(matrix: &mut DynamicConfusionMatrix, real: Label, predicted: Label, novel: bool, times: usize) {
        for _ in 0..times {
            matrix.record_prediction(real, predicted, novel).unwrap();
        }
    }

    /// Two known classes, one class that only ever shows up as novel.
    fn sample_matrix() -> DynamicConfusionMatrix {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        record(&mut matrix, 1, 1, false, 6);
        record(&mut matrix, 1, 2, false, 1);
        record(&mut matrix, 2, 2, false, 4);
        record(&mut matrix, 2, 1, false, 2);
        record(&mut matrix, 3, 100, true, 5);
        record(&mut matrix, 3, 2, false, 1);
        record(&mut matrix, 1, 100, true, 1);
        record(&mut matrix, 2, 200, true, 3);
        matrix
    }

    #[test]
    fn contingency_of_known_class() {
        let matrix = sample_matrix();
        let assoc = matrix.novelty_association();

        let counts = matrix.contingency(1, &assoc).unwrap();

        // Row 1: 6 correct, 1 as known 2, 1 in pattern 100 (credited to 3).
        assert_eq!(counts.true_positives, 6);
        assert_eq!(counts.false_positives, 2);
        assert_eq!(counts.false_negatives, 2);
        // TP(2) = 4 + 3 (pattern 200), TP(3) = 5 (pattern 100)
        assert_eq!(counts.true_negatives, 12);
    }

    #[test]
    fn contingency_includes_credited_patterns() {
        let matrix = sample_matrix();
        let assoc = matrix.novelty_association();

        assert_eq!(assoc.get(2), &[200]);
        assert_eq!(matrix.true_positives(2, &assoc).unwrap(), 7);
        // Known column 2 from rows 1 and 3; nobody else hit pattern 200.
        assert_eq!(matrix.false_positives(2, &assoc).unwrap(), 2);
        assert_eq!(matrix.false_negatives(2, &assoc).unwrap(), 2);
    }

    #[test]
    fn contingency_of_novel_only_class() {
        let matrix = sample_matrix();
        let assoc = matrix.novelty_association();

        let counts = matrix.contingency(3, &assoc).unwrap();

        assert_eq!(counts.true_positives, 5);
        // Row 1 also landed in pattern 100.
        assert_eq!(counts.false_positives, 1);
        // Class 3 is not a known column, so its known predictions are not counted.
        assert_eq!(counts.false_negatives, 0);
        assert_eq!(counts.true_negatives, 6 + 7);
    }

    #[test]
    fn false_negatives_without_association_count_every_pattern() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        record(&mut matrix, 1, 1, false, 1);
        record(&mut matrix, 2, 10, true, 3);
        record(&mut matrix, 1, 10, true, 2);
        let assoc = matrix.novelty_association();

        assert!(assoc.get(1).is_empty());
        assert_eq!(matrix.false_negatives(1, &assoc).unwrap(), 2);
    }

    #[test]
    fn duplicate_known_column_counts_newest_cell_per_duplicate() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        matrix.register_known(1);
        record(&mut matrix, 1, 1, false, 1);
        record(&mut matrix, 2, 1, false, 1);
        let assoc = matrix.novelty_association();

        assert_eq!(matrix.known_labels(), &[1, 2, 1]);
        // Both entries for label 1 resolve to the newest column.
        assert_eq!(
            matrix.contingency(2, &assoc).unwrap(),
            Contingency {
                true_positives: 0,
                false_positives: 0,
                false_negatives: 2,
                true_negatives: 1,
            }
        );
        assert_eq!(matrix.explained(2).unwrap(), 1);
        assert_eq!(matrix.true_positives(1, &assoc).unwrap(), 1);
    }

    #[test]
    fn measures_reject_labels_without_rows() {
        let matrix = sample_matrix();
        let assoc = matrix.novelty_association();

        assert_eq!(
            matrix.true_positives(42, &assoc),
            Err(MatrixError::UnknownRowLabel(42))
        );
        assert_eq!(
            matrix.contingency(42, &assoc),
            Err(MatrixError::UnknownRowLabel(42))
        );
        assert_eq!(matrix.explained(42), Err(MatrixError::UnknownRowLabel(42)));
    }

    #[test]
    fn explained_ignores_deferred_samples() {
        let mut matrix = sample_matrix();
        matrix.record_deferral(1);

        assert_eq!(matrix.explained(1).unwrap(), 8);
        assert_eq!(matrix.explained(2).unwrap(), 9);
        assert_eq!(matrix.explained(3).unwrap(), 6);
        assert_eq!(matrix.total_explained(), 23);
    }

    #[test]
    fn cer_single_class_with_misses() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        record(&mut matrix, 1, 1, false, 8);
        record(&mut matrix, 1, 2, false, 2);

        let assoc = matrix.novelty_association();
        let counts = matrix.contingency(1, &assoc).unwrap();
        assert_eq!(
            counts,
            Contingency {
                true_positives: 8,
                false_positives: 0,
                false_negatives: 2,
                true_negatives: 0,
            }
        );
        // Row 2 exists but has nothing explained, so it contributes nothing.
        assert!((matrix.cer() - 0.1).abs() < EPSILON);
    }

    #[test]
    fn cer_is_zero_for_perfect_predictions() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        record(&mut matrix, 1, 1, false, 5);
        record(&mut matrix, 2, 2, false, 5);
        record(&mut matrix, 3, 9, true, 5);

        assert_eq!(matrix.cer(), 0.0);
    }

    #[test]
    fn cer_weights_classes_by_explained_share() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        record(&mut matrix, 1, 1, false, 3);
        record(&mut matrix, 1, 2, false, 1);

        let assoc = matrix.novelty_association();
        let c1 = matrix.contingency(1, &assoc).unwrap();
        let c2 = matrix.contingency(2, &assoc).unwrap();
        assert_eq!((c1.false_negatives, c1.true_positives), (1, 3));
        assert_eq!((c2.false_positives, c2.true_negatives), (1, 3));

        // Only row 1 is explained: weight 1, fp 0, fn 1/4.
        assert!((matrix.cer() - 0.125).abs() < EPSILON);
    }

    #[test]
    fn cer_of_empty_matrix_is_zero() {
        assert_eq!(DynamicConfusionMatrix::new().cer(), 0.0);
        assert_eq!(DynamicConfusionMatrix::with_known_labels([1]).cer(), 0.0);
    }

    #[test]
    fn unknown_rate_averages_rows_unweighted() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        record(&mut matrix, 1, 1, false, 9);
        matrix.record_deferral(1);

        assert!((matrix.unknown_rate() - 0.05).abs() < EPSILON);
    }

    #[test]
    fn unknown_rate_counts_fully_deferred_rows_as_one() {
        let mut matrix = DynamicConfusionMatrix::new();
        matrix.record_deferral(4);

        assert_eq!(matrix.unknown_rate(), 1.0);
    }

    #[test]
    fn unknown_rate_of_empty_matrix_is_zero() {
        assert_eq!(DynamicConfusionMatrix::new().unknown_rate(), 0.0);
    }

    #[test]
    fn rates_guard_zero_denominators() {
        let counts = Contingency::default();
        assert_eq!(counts.false_positive_rate(), 0.0);
        assert_eq!(counts.false_negative_rate(), 0.0);
    }
}
