//! streams-core: sample streams and the driver loop for streaming classifiers
//!
//! - [`Sample`] - a feature vector with optional true label and identifier
//! - [`StreamsReader`] - lazy sample source over delimited text
//! - [`StreamsProcessor`] - the classifier contract: one sample in, an optional label out
//! - [`StreamsExecutor`] - feeds sources into a processor, logging its state periodically
//!
//! Scoring lives in `streams-evals`; processors record their decisions into a
//! [`DynamicConfusionMatrix`](streams_evals::DynamicConfusionMatrix).

pub mod error;
pub mod executor;
pub mod processor;
pub mod reader;
pub mod sample;

pub use error::{Result, StreamsError};
pub use executor::{InterruptHandle, StreamsExecutor};
pub use processor::StreamsProcessor;
pub use reader::StreamsReader;
pub use sample::Sample;
