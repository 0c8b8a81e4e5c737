//! Evaluation of streaming novelty-detection classifiers.
//!
//! The centre of this crate is [`DynamicConfusionMatrix`]: a confusion matrix
//! whose rows (true classes) and columns (known classes and discovered novelty
//! patterns) grow as the stream reveals them, plus a per-row count of samples
//! whose decision was deferred.
//!
//! # Metrics
//!
//! - [`DynamicConfusionMatrix::novelty_association`] credits each novelty
//!   pattern to the true class it captured most often.
//! - [`DynamicConfusionMatrix::contingency`] derives TP/FP/FN/TN per class
//!   under that association.
//! - [`DynamicConfusionMatrix::cer`] and [`DynamicConfusionMatrix::unknown_rate`]
//!   aggregate those into the combined error rate and the unknown rate.
//!
//! The matrix is single-owner and not thread-safe; metric queries scan every
//! row and column, so batch them at logging intervals.

mod association;
mod error;
mod events;
mod matrix;
mod metrics;
mod registry;
mod render;
mod report;
mod types;

pub use association::NoveltyAssociation;
pub use error::{MatrixError, Result};
pub use events::MatrixEvent;
pub use matrix::DynamicConfusionMatrix;
pub use metrics::Contingency;
pub use registry::LabelRegistry;
pub use report::{ClassReport, EvaluationReport};
pub use types::{Label, RunId};
