//! Remaining-time estimation.

use etabar_core::{format_eta, Clock, OutOfBoundsFormat, Result};
use std::fmt;
use tracing::debug;

use crate::counter::ProgressCounter;

/// Estimates the time remaining until a counter reaches its total.
///
/// The estimator keeps no copy of the clock or the counter. Each query
/// borrows both and works from their current state, so it never advances any
/// hidden state and two queries without an intervening mutation agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EtaEstimator {
    out_of_bounds_format: OutOfBoundsFormat,
}

impl EtaEstimator {
    /// Create an estimator with the raw out-of-bounds format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given out-of-bounds format.
    pub fn with_out_of_bounds_format(mut self, format: OutOfBoundsFormat) -> Self {
        self.out_of_bounds_format = format;
        self
    }

    /// Current out-of-bounds format.
    pub fn out_of_bounds_format(&self) -> OutOfBoundsFormat {
        self.out_of_bounds_format
    }

    /// Change the out-of-bounds format.
    pub fn set_out_of_bounds_format(&mut self, format: OutOfBoundsFormat) {
        self.out_of_bounds_format = format;
    }

    /// Change the out-of-bounds format from a token (`"unknown"`,
    /// `"friendly"`, `"raw"`, or `None` for raw).
    ///
    /// On error the previous format is kept.
    pub fn set_out_of_bounds_format_str(&mut self, token: Option<&str>) -> Result<()> {
        let format = OutOfBoundsFormat::from_token(token)?;
        debug!(%format, "Out of bounds format changed");
        self.out_of_bounds_format = format;
        Ok(())
    }

    /// Seconds per unit of smoothed progress, if it can be derived yet.
    pub fn seconds_per_unit(&self, clock: &Clock, progress: &ProgressCounter) -> Option<f64> {
        if !progress.is_started() || progress.is_none() {
            return None;
        }

        let elapsed = clock.elapsed_seconds().ok()?;
        let average = progress.running_average();
        if average <= 0.0 {
            return None;
        }

        let rate = elapsed / average;
        rate.is_finite().then_some(rate)
    }

    /// Whole seconds remaining, rounded to the nearest second.
    ///
    /// `None` when the total is unknown, the clock or counter has not
    /// started, or no net progress has been made.
    pub fn estimated_seconds_remaining(
        &self,
        clock: &Clock,
        progress: &ProgressCounter,
    ) -> Option<u64> {
        let span = progress.span()?;
        let rate = self.seconds_per_unit(clock, progress)?;
        let remaining_units = (span as f64 - progress.running_average()).max(0.0);
        let remaining = (rate * remaining_units).round();
        remaining.is_finite().then_some(remaining as u64)
    }

    /// The `" ETA: ..."` label.
    pub fn render(&self, clock: &Clock, progress: &ProgressCounter) -> String {
        format_eta(
            self.estimated_seconds_remaining(clock, progress),
            self.out_of_bounds_format,
        )
    }

    /// A displayable view over the estimator and its inputs.
    pub fn view<'a>(&'a self, clock: &'a Clock, progress: &'a ProgressCounter) -> Eta<'a> {
        Eta {
            estimator: self,
            clock,
            progress,
        }
    }
}

/// Borrowed estimator view that renders the ETA label through `Display`.
#[derive(Debug, Clone, Copy)]
pub struct Eta<'a> {
    estimator: &'a EtaEstimator,
    clock: &'a Clock,
    progress: &'a ProgressCounter,
}

impl Eta<'_> {
    /// Whole seconds remaining.
    pub fn seconds_remaining(&self) -> Option<u64> {
        self.estimator
            .estimated_seconds_remaining(self.clock, self.progress)
    }
}

impl fmt::Display for Eta<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.estimator.render(self.clock, self.progress))
    }
}
