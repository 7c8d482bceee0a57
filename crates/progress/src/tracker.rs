//! Render session owning a clock, a counter and an estimator.

use etabar_core::{
    system_time, Clock, OutOfBoundsFormat, ProgressConfig, Result, SharedTimeSource, Timestamp,
};
use serde::Serialize;
use tracing::debug;

use crate::counter::ProgressCounter;
use crate::estimator::{Eta, EtaEstimator};

/// A point-in-time view of a tracked task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: Timestamp,

    /// Current progress
    pub progress: u64,

    /// Total, if bounded
    pub total: Option<u64>,

    /// Completion percentage, if the total is known
    pub percentage: Option<f64>,

    /// Whole seconds since the clock started
    pub elapsed_seconds: Option<u64>,

    /// Estimated whole seconds remaining
    pub estimated_seconds_remaining: Option<u64>,

    /// Rendered ETA label
    pub eta: String,
}

/// Owns the progress triad for one task.
///
/// Starting, stopping and resetting act on the clock and the counter
/// together; the estimator reads both on every query.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    clock: Clock,
    counter: ProgressCounter,
    estimator: EtaEstimator,
}

impl ProgressTracker {
    /// Create a tracker reading the system time.
    pub fn new(config: ProgressConfig) -> Result<Self> {
        Self::with_time_source(config, system_time())
    }

    /// Create a tracker whose clock and counter share `time`.
    pub fn with_time_source(config: ProgressConfig, time: SharedTimeSource) -> Result<Self> {
        let counter = ProgressCounter::with_time_source(&config, time.clone())?;
        Ok(Self {
            clock: Clock::with_time_source(time),
            counter,
            estimator: EtaEstimator::new().with_out_of_bounds_format(config.out_of_bounds_format),
        })
    }

    /// Start the clock and the counter.
    pub fn start(&mut self) {
        self.counter.start();
        self.clock.start();
        debug!("Tracker started");
    }

    /// Freeze the clock and stop sampling; progress is kept.
    pub fn stop(&mut self) {
        self.clock.stop();
        self.counter.stop();
    }

    /// Alias for [`ProgressTracker::stop`].
    pub fn pause(&mut self) {
        self.stop();
    }

    /// Continue the clock and sampling after a pause.
    pub fn resume(&mut self) {
        self.clock.resume();
        self.counter.resume();
    }

    /// Reset the clock and the counter.
    pub fn reset(&mut self) {
        self.counter.reset();
        self.clock.reset();
        debug!("Tracker reset");
    }

    /// Complete the counter and stop the clock.
    pub fn finish(&mut self) {
        self.counter.finish();
        self.clock.stop();
    }

    /// Advance by one.
    pub fn increment(&mut self) -> Result<()> {
        self.counter.increment()
    }

    /// Advance by `amount`.
    pub fn increment_by(&mut self, amount: u64) -> Result<()> {
        self.counter.increment_by(amount)
    }

    /// Step back by one.
    pub fn decrement(&mut self) -> Result<()> {
        self.counter.decrement()
    }

    /// Set the current progress.
    pub fn set_progress(&mut self, value: u64) -> Result<()> {
        self.counter.set_progress(value)
    }

    /// Change the total.
    pub fn set_total(&mut self, total: Option<u64>) -> Result<()> {
        self.counter.set_total(total)
    }

    /// Change the out-of-bounds format from a token.
    pub fn set_out_of_bounds_format_str(&mut self, token: Option<&str>) -> Result<()> {
        self.estimator.set_out_of_bounds_format_str(token)
    }

    /// Change the out-of-bounds format.
    pub fn set_out_of_bounds_format(&mut self, format: OutOfBoundsFormat) {
        self.estimator.set_out_of_bounds_format(format);
    }

    /// ETA view for display.
    pub fn eta(&self) -> Eta<'_> {
        self.estimator.view(&self.clock, &self.counter)
    }

    /// Estimated whole seconds remaining.
    pub fn estimated_seconds_remaining(&self) -> Option<u64> {
        self.estimator
            .estimated_seconds_remaining(&self.clock, &self.counter)
    }

    /// `"Time: HH:MM:SS"` label for the elapsed time.
    pub fn elapsed_label(&self) -> String {
        self.clock.elapsed_label()
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            timestamp: self.clock.now(),
            progress: self.counter.progress(),
            total: self.counter.total(),
            percentage: self.counter.percentage(),
            elapsed_seconds: self.clock.elapsed_whole_seconds().ok(),
            estimated_seconds_remaining: self.estimated_seconds_remaining(),
            eta: self.eta().to_string(),
        }
    }

    /// The clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The counter.
    pub fn counter(&self) -> &ProgressCounter {
        &self.counter
    }

    /// The estimator.
    pub fn estimator(&self) -> &EtaEstimator {
        &self.estimator
    }
}
