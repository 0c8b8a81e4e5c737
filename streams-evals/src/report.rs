//! Serializable snapshot of a matrix's metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::DynamicConfusionMatrix;
use crate::metrics::Contingency;
use crate::types::{Label, RunId};

/// Per-class slice of an [`EvaluationReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    /// True class label
    pub label: Label,
    /// Whether the label is also a known column
    pub known: bool,
    /// Decided samples of this class
    pub explained: u64,
    /// Outstanding deferred samples of this class
    pub unknown: i64,
    /// Contingency counts under the current novelty association
    pub contingency: Contingency,
    /// Novelty patterns credited to this class
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub novelties: Vec<Label>,
}

/// Metrics computed from a matrix at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    /// Combined error rate
    pub cer: f64,
    /// Unknown rate
    pub unknown_rate: f64,
    pub total_explained: u64,
    pub known_labels: Vec<Label>,
    pub novelty_labels: Vec<Label>,
    /// One entry per row, in row discovery order
    pub classes: Vec<ClassReport>,
}

impl EvaluationReport {
    /// Build a report for `matrix` under a fresh run ID.
    pub fn from_matrix(matrix: &DynamicConfusionMatrix) -> Result<Self> {
        Self::for_run(RunId::new(), matrix)
    }

    /// Build a report for `matrix` under an existing run ID.
    pub fn for_run(run_id: RunId, matrix: &DynamicConfusionMatrix) -> Result<Self> {
        let assoc = matrix.novelty_association();

        let classes = matrix
            .row_labels()
            .iter()
            .map(|&label| -> Result<ClassReport> {
                Ok(ClassReport {
                    label,
                    known: matrix.is_known(label),
                    explained: matrix.explained(label)?,
                    unknown: matrix.unknown_count(label).unwrap_or_default(),
                    contingency: matrix.contingency(label, &assoc)?,
                    novelties: assoc.get(label).to_vec(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            run_id,
            generated_at: Utc::now(),
            cer: matrix.cer(),
            unknown_rate: matrix.unknown_rate(),
            total_explained: matrix.total_explained(),
            known_labels: matrix.known_labels().to_vec(),
            novelty_labels: matrix.novelty_labels().to_vec(),
            classes,
        })
    }

    /// Entry for a class, if the matrix had a row for it.
    #[must_use]
    pub fn class(&self, label: Label) -> Option<&ClassReport> {
        self.classes.iter().find(|class| class.label == label)
    }
}
