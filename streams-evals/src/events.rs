//! Matrix mutation events.
//!
//! A classifier run can be captured as a sequence of these events (one JSON
//! object per line) and replayed into a fresh matrix later.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::DynamicConfusionMatrix;
use crate::types::Label;

/// One mutation of a [`DynamicConfusionMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MatrixEvent {
    /// A label was declared predictable
    RegisterKnown { label: Label },

    /// The classifier decided on a sample
    Predict {
        real: Label,
        predicted: Label,
        #[serde(default)]
        novel: bool,
    },

    /// The classifier postponed its decision on a sample
    Defer { real: Label },

    /// A postponed sample was decided
    Resolve {
        real: Label,
        predicted: Label,
        #[serde(default)]
        novel: bool,
    },
}

impl MatrixEvent {
    /// Apply this event to `matrix`.
    ///
    /// # Errors
    ///
    /// Propagates the [`MatrixError`](crate::MatrixError) of the underlying
    /// operation.
    pub fn apply(&self, matrix: &mut DynamicConfusionMatrix) -> Result<()> {
        match *self {
            MatrixEvent::RegisterKnown { label } => matrix.register_known(label),
            MatrixEvent::Predict {
                real,
                predicted,
                novel,
            } => matrix.record_prediction(real, predicted, novel)?,
            MatrixEvent::Defer { real } => matrix.record_deferral(real),
            MatrixEvent::Resolve {
                real,
                predicted,
                novel,
            } => matrix.resolve_deferred(real, predicted, novel)?,
        }
        Ok(())
    }

    /// True label the event refers to, if any.
    #[must_use]
    pub fn real_label(&self) -> Option<Label> {
        match self {
            MatrixEvent::RegisterKnown { .. } => None,
            MatrixEvent::Predict { real, .. }
            | MatrixEvent::Defer { real }
            | MatrixEvent::Resolve { real, .. } => Some(*real),
        }
    }
}
