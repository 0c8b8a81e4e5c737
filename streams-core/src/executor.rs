//! Driver loop feeding sample sources into a processor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::error::Result;
use crate::processor::StreamsProcessor;
use crate::sample::Sample;

/// Cloneable handle that stops a running [`StreamsExecutor`].
///
/// The flag is checked between samples, so the sample being processed when
/// the handle fires still completes.
#[derive(Debug, Clone)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn interrupt(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pulls samples from each source in turn and hands them to a processor.
#[derive(Debug)]
pub struct StreamsExecutor {
    alive: Arc<AtomicBool>,
    log_interval: u64,
}

impl Default for StreamsExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamsExecutor {
    /// Executor that never logs the processor state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_log_interval(0)
    }

    /// Executor that logs the processor state every `interval` samples.
    /// An interval of 0 disables logging.
    #[must_use]
    pub fn with_log_interval(interval: u64) -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(false)),
            log_interval: interval,
        }
    }

    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle(Arc::clone(&self.alive))
    }

    pub fn interrupt(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Run every source to exhaustion, or until interrupted.
    ///
    /// Returns `true` when all sources were exhausted and `false` when the
    /// run was interrupted.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by a source.
    pub fn start<P, I, S>(&self, processor: &mut P, sources: I) -> Result<bool>
    where
        P: StreamsProcessor + ?Sized,
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Result<Sample>>,
    {
        self.start_with_interval(processor, self.log_interval, sources)
    }

    /// Like [`start`](Self::start), logging the processor state every
    /// `interval` samples for this run instead of the configured interval.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by a source.
    pub fn start_with_interval<P, I, S>(
        &self,
        processor: &mut P,
        interval: u64,
        sources: I,
    ) -> Result<bool>
    where
        P: StreamsProcessor + ?Sized,
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Result<Sample>>,
    {
        self.alive.store(true, Ordering::SeqCst);
        let mut timestamp: u64 = 0;

        for (index, source) in sources.into_iter().enumerate() {
            debug!(source = index, "starting sample source");
            let mut samples = source.into_iter();

            while self.alive.load(Ordering::SeqCst) {
                let Some(sample) = samples.next() else {
                    break;
                };
                let sample = sample?;

                timestamp += 1;
                processor.process(&sample);

                if interval > 0 && timestamp % interval == 0 {
                    info!(timestamp, "{}", processor.log());
                }
            }
        }

        let completed = self.alive.load(Ordering::SeqCst);
        debug!(samples = timestamp, completed, "executor finished");
        Ok(completed)
    }
}
