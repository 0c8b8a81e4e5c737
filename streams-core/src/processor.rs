//! The contract every streaming classifier under evaluation implements.

use streams_evals::Label;

use crate::sample::Sample;

/// A streaming classifier fed one sample at a time.
///
/// Implementations own the wiring of their decisions into a
/// [`DynamicConfusionMatrix`](streams_evals::DynamicConfusionMatrix).
pub trait StreamsProcessor {
    /// Process one sample. `None` means the decision was deferred.
    fn process(&mut self, sample: &Sample) -> Option<Label>;

    /// Human-readable summary of the processor's current state.
    fn log(&self) -> String;
}

impl<P: StreamsProcessor + ?Sized> StreamsProcessor for Box<P> {
    fn process(&mut self, sample: &Sample) -> Option<Label> {
        (**self).process(sample)
    }

    fn log(&self) -> String {
        (**self).log()
    }
}
