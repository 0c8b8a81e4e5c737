//! Error types for confusion matrix operations.

use thiserror::Error;

use crate::types::Label;

/// Result type for matrix operations.
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Usage errors raised by [`DynamicConfusionMatrix`](crate::DynamicConfusionMatrix).
///
/// Both variants are raised before the matrix is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A non-novel prediction referenced a label never registered as known.
    #[error("predicted label {0} is not a registered known label")]
    UnregisteredKnownLabel(Label),

    /// No row exists for the given true label.
    #[error("no row exists for true label {0}")]
    UnknownRowLabel(Label),
}
