//! Bounded progress counter.

use chrono::Duration;
use etabar_core::{system_time, Error, ProgressConfig, Result, SharedTimeSource, Timestamp};
use std::fmt;
use tracing::{debug, trace, warn};

/// One progress mutation: how long since the previous one, and by how much
/// the counter moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Time since the previous mutation (or since start)
    pub elapsed: Duration,
    /// Signed change in progress
    pub amount: i64,
}

/// Fold `value` into an exponentially smoothed average.
///
/// `factor` is the weight kept by the history: `0.0` returns `value`
/// unchanged, `1.0` never moves away from `previous`.
pub fn smooth(previous: f64, value: f64, factor: f64) -> f64 {
    value * (1.0 - factor) + previous * factor
}

/// `a - b` as a signed value, saturating at the `i64` bounds.
fn signed_diff(a: u64, b: u64) -> i64 {
    let diff = a as i128 - b as i128;
    diff.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Numeric progress counter with an optional upper bound.
///
/// Progress can never be set above the total. After [`ProgressCounter::start`]
/// every mutation is recorded as a [`Sample`] and folded into a smoothed
/// running average of net progress, which the ETA estimator reads.
#[derive(Clone)]
pub struct ProgressCounter {
    time: SharedTimeSource,
    starting_at: u64,
    total: Option<u64>,
    current: u64,
    smoothing: f64,
    started_at: Option<Timestamp>,
    stopped: bool,
    last_mutation_at: Option<Timestamp>,
    last_sample: Option<Sample>,
    running_average: f64,
}

impl ProgressCounter {
    /// Create an unstarted counter reading the system time.
    pub fn new(config: &ProgressConfig) -> Result<Self> {
        Self::with_time_source(config, system_time())
    }

    /// Create an unstarted counter reading the given time source.
    pub fn with_time_source(config: &ProgressConfig, time: SharedTimeSource) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            time,
            starting_at: config.starting_at,
            total: config.total,
            current: config.starting_at,
            smoothing: config.smoothing,
            started_at: None,
            stopped: false,
            last_mutation_at: None,
            last_sample: None,
            running_average: 0.0,
        })
    }

    /// Start tracking from the configured starting value.
    pub fn start(&mut self) {
        self.current = self.starting_at;
        self.begin();
    }

    /// Start tracking from `at`, which becomes the new starting value.
    pub fn start_at(&mut self, at: u64) -> Result<()> {
        self.check_progress(at)?;
        self.starting_at = at;
        self.current = at;
        self.begin();
        Ok(())
    }

    fn begin(&mut self) {
        let now = self.time.now();
        self.started_at = Some(now);
        self.stopped = false;
        self.last_mutation_at = Some(now);
        self.last_sample = None;
        self.running_average = 0.0;
        debug!(starting_at = self.starting_at, total = ?self.total, "Progress started");
    }

    /// Return to the unstarted state, discarding all history.
    pub fn reset(&mut self) {
        self.current = self.starting_at;
        self.started_at = None;
        self.stopped = false;
        self.last_mutation_at = None;
        self.last_sample = None;
        self.running_average = 0.0;
        debug!("Progress reset");
    }

    /// Stop recording samples. Progress, history and the running average are
    /// kept; later mutations still apply but are not sampled.
    ///
    /// Does nothing before [`ProgressCounter::start`].
    pub fn stop(&mut self) {
        if self.started_at.is_some() && !self.stopped {
            self.stopped = true;
            debug!(progress = self.current, "Progress stopped");
        }
    }

    /// Resume sampling after [`ProgressCounter::stop`]. The stopped interval
    /// does not count towards the next sample.
    pub fn resume(&mut self) {
        if self.stopped {
            self.stopped = false;
            self.last_mutation_at = Some(self.time.now());
            debug!(progress = self.current, "Progress resumed");
        }
    }

    /// Jump straight to the total without recording a sample.
    ///
    /// Does nothing when the total is unknown.
    pub fn finish(&mut self) {
        if let Some(total) = self.total {
            self.current = total;
            debug!(total, "Progress finished");
        }
    }

    /// Set the current progress.
    pub fn set_progress(&mut self, value: u64) -> Result<()> {
        self.check_progress(value)?;

        let amount = signed_diff(value, self.current);
        self.current = value;

        if let Some(started_at) = self.started_at.filter(|_| !self.stopped) {
            let now = self.time.now();
            let since = now - self.last_mutation_at.unwrap_or(started_at);
            self.last_mutation_at = Some(now);
            self.last_sample = Some(Sample { elapsed: since, amount });
            self.running_average = smooth(self.running_average, self.absolute() as f64, self.smoothing);
            trace!(
                progress = value,
                amount,
                running_average = self.running_average,
                "Progress sample"
            );
        }

        Ok(())
    }

    /// Advance by one.
    pub fn increment(&mut self) -> Result<()> {
        self.increment_by(1)
    }

    /// Advance by `amount`.
    pub fn increment_by(&mut self, amount: u64) -> Result<()> {
        self.set_progress(self.current.saturating_add(amount))
    }

    /// Step back by one.
    pub fn decrement(&mut self) -> Result<()> {
        self.decrement_by(1)
    }

    /// Step back by `amount`. The counter may drop below its starting value
    /// but never below zero.
    pub fn decrement_by(&mut self, amount: u64) -> Result<()> {
        self.set_progress(self.current.saturating_sub(amount))
    }

    /// Change the total. It cannot go below the current progress or the
    /// starting value.
    pub fn set_total(&mut self, total: Option<u64>) -> Result<()> {
        if let Some(total) = total {
            if total < self.starting_at {
                warn!(total, starting_at = self.starting_at, "Rejected total below start");
                return Err(Error::TotalBelowStart {
                    total,
                    starting_at: self.starting_at,
                });
            }
            if total < self.current {
                warn!(total, progress = self.current, "Rejected total below progress");
                return Err(Error::InvalidTotal {
                    total,
                    progress: self.current,
                });
            }
        }
        self.total = total;
        Ok(())
    }

    fn check_progress(&self, value: u64) -> Result<()> {
        match self.total {
            Some(total) if value > total => {
                warn!(progress = value, total, "Rejected progress above total");
                Err(Error::InvalidProgress {
                    progress: value,
                    total,
                })
            }
            _ => Ok(()),
        }
    }

    /// Current value.
    pub fn progress(&self) -> u64 {
        self.current
    }

    /// Configured total, if bounded.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Starting value.
    pub fn starting_at(&self) -> u64 {
        self.starting_at
    }

    /// Smoothing factor.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// When tracking started.
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    /// The most recent mutation sample.
    pub fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }

    /// Smoothed net progress since start.
    pub fn running_average(&self) -> f64 {
        self.running_average
    }

    /// Net progress since start; negative after decrementing past the start.
    pub fn absolute(&self) -> i64 {
        signed_diff(self.current, self.starting_at)
    }

    /// Units between the starting value and the total.
    pub fn span(&self) -> Option<u64> {
        self.total.map(|total| total.saturating_sub(self.starting_at))
    }

    /// Has tracking started?
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Is sampling stopped?
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Has the counter reached its total?
    pub fn is_finished(&self) -> bool {
        self.total == Some(self.current)
    }

    /// Is the total unknown?
    pub fn is_unknown(&self) -> bool {
        self.total.is_none()
    }

    /// No net progress since start.
    pub fn is_none(&self) -> bool {
        self.absolute() == 0
    }

    /// Completed share of the span in percent; `None` when the total is unknown.
    pub fn percentage(&self) -> Option<f64> {
        let span = self.span()?;
        if span == 0 {
            return Some(100.0);
        }
        Some(self.absolute() as f64 / span as f64 * 100.0)
    }

    /// Whole-number percentage, floored; `0` when the total is unknown.
    pub fn percentage_completed(&self) -> u64 {
        self.percentage()
            .map(|percentage| percentage.max(0.0).floor() as u64)
            .unwrap_or(0)
    }

    /// Percentage floored to two decimals, rendered as `%5.2f`.
    pub fn percentage_completed_with_precision(&self) -> String {
        let percentage = self
            .percentage()
            .map(|percentage| (percentage.max(0.0) * 100.0).floor() / 100.0)
            .unwrap_or(0.0);
        format!("{:5.2}", percentage)
    }
}

impl fmt::Debug for ProgressCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressCounter")
            .field("starting_at", &self.starting_at)
            .field("total", &self.total)
            .field("current", &self.current)
            .field("smoothing", &self.smoothing)
            .field("started_at", &self.started_at)
            .field("stopped", &self.stopped)
            .field("last_sample", &self.last_sample)
            .field("running_average", &self.running_average)
            .finish_non_exhaustive()
    }
}
