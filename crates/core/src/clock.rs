//! Elapsed-time clock.

use chrono::Duration;
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{format_hms, NO_TIME};
use crate::time::{system_time, SharedTimeSource};
use crate::Timestamp;

/// Wall-clock elapsed-time tracker.
///
/// Elapsed time is computed on demand from the injected time source; the
/// clock itself never ticks.
#[derive(Clone)]
pub struct Clock {
    time: SharedTimeSource,
    started_at: Option<Timestamp>,
    stopped_at: Option<Timestamp>,
}

impl Clock {
    /// Create an unstarted clock reading the system time.
    pub fn new() -> Self {
        Self::with_time_source(system_time())
    }

    /// Create an unstarted clock reading the given time source.
    pub fn with_time_source(time: SharedTimeSource) -> Self {
        Self {
            time,
            started_at: None,
            stopped_at: None,
        }
    }

    /// Start (or re-stamp) the clock.
    pub fn start(&mut self) {
        self.started_at = Some(self.time.now());
        self.stopped_at = None;
        debug!("Clock started");
    }

    /// Freeze elapsed time. Does nothing if the clock was never started or is
    /// already stopped.
    pub fn stop(&mut self) {
        if self.started_at.is_none() || self.stopped_at.is_some() {
            return;
        }
        self.stopped_at = Some(self.time.now());
        debug!("Clock stopped");
    }

    /// Alias for [`Clock::stop`].
    pub fn pause(&mut self) {
        self.stop();
    }

    /// Continue a stopped clock, keeping the time accumulated before the stop.
    ///
    /// An unstarted clock is simply started; a running clock is left alone.
    pub fn resume(&mut self) {
        match (self.started_at, self.stopped_at) {
            (None, _) => self.start(),
            (Some(started), Some(stopped)) => {
                self.started_at = Some(self.time.now() - (stopped - started));
                self.stopped_at = None;
                debug!("Clock resumed");
            }
            (Some(_), None) => {}
        }
    }

    /// Clear both timestamps.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.stopped_at = None;
        debug!("Clock reset");
    }

    /// Reset and start again.
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Has the clock been started since creation or the last reset?
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Is elapsed time currently frozen?
    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Started and not stopped.
    pub fn is_running(&self) -> bool {
        self.is_started() && !self.is_stopped()
    }

    /// Never started, or reset since.
    pub fn is_reset(&self) -> bool {
        self.started_at.is_none()
    }

    /// Time elapsed since start, frozen at the stop time if stopped.
    pub fn elapsed(&self) -> Result<Duration> {
        let started = self.started_at.ok_or(Error::ClockNotStarted)?;
        let until = self.stopped_at.unwrap_or_else(|| self.time.now());
        Ok((until - started).max(Duration::zero()))
    }

    /// Elapsed time in fractional seconds.
    pub fn elapsed_seconds(&self) -> Result<f64> {
        self.elapsed().map(duration_secs)
    }

    /// Elapsed time truncated to whole seconds.
    pub fn elapsed_whole_seconds(&self) -> Result<u64> {
        self.elapsed().map(|elapsed| elapsed.num_seconds().max(0) as u64)
    }

    /// `"Time: HH:MM:SS"`, or `"Time: --:--:--"` before the clock starts.
    pub fn elapsed_label(&self) -> String {
        match self.elapsed_whole_seconds() {
            Ok(seconds) => format!("Time: {}", format_hms(seconds)),
            Err(_) => format!("Time: {}", NO_TIME),
        }
    }

    /// Current time according to this clock's source.
    pub fn now(&self) -> Timestamp {
        self.time.now()
    }

    /// The time source this clock reads.
    pub fn time_source(&self) -> &SharedTimeSource {
        &self.time
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("started_at", &self.started_at)
            .field("stopped_at", &self.stopped_at)
            .finish_non_exhaustive()
    }
}

/// Convert a chrono duration to fractional seconds.
pub fn duration_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => duration.num_milliseconds() as f64 / 1_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualTimeSource;
    use std::sync::Arc;

    fn manual_clock() -> (Clock, ManualTimeSource) {
        let source = ManualTimeSource::frozen_now();
        (Clock::with_time_source(Arc::new(source.clone())), source)
    }

    #[test]
    fn test_elapsed_before_start_fails() {
        let (clock, _) = manual_clock();
        assert!(matches!(clock.elapsed(), Err(Error::ClockNotStarted)));
        assert!(clock.is_reset());
        assert_eq!(clock.elapsed_label(), "Time: --:--:--");
    }

    #[test]
    fn test_elapsed_while_running() {
        let (mut clock, source) = manual_clock();
        clock.start();
        source.advance(Duration::seconds(90));
        assert_eq!(clock.elapsed().unwrap(), Duration::seconds(90));
        assert_eq!(clock.elapsed_label(), "Time: 00:01:30");
        assert!(clock.is_running());
    }

    #[test]
    fn test_stop_freezes_elapsed() {
        let (mut clock, source) = manual_clock();
        clock.start();
        source.advance(Duration::seconds(10));
        clock.stop();
        source.advance(Duration::seconds(50));
        assert_eq!(clock.elapsed_whole_seconds().unwrap(), 10);
        assert!(clock.is_stopped());

        // A second stop keeps the original freeze point.
        clock.stop();
        assert_eq!(clock.elapsed_whole_seconds().unwrap(), 10);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let (mut clock, _) = manual_clock();
        clock.stop();
        assert!(!clock.is_stopped());
        assert!(clock.elapsed().is_err());
    }

    #[test]
    fn test_start_restamps_and_clears_stop() {
        let (mut clock, source) = manual_clock();
        clock.start();
        source.advance(Duration::seconds(10));
        clock.stop();
        clock.start();
        source.advance(Duration::seconds(3));
        assert_eq!(clock.elapsed_whole_seconds().unwrap(), 3);
        assert!(clock.is_running());
    }

    #[test]
    fn test_resume_keeps_accumulated_time() {
        let (mut clock, source) = manual_clock();
        clock.start();
        source.advance(Duration::seconds(10));
        clock.pause();
        source.advance(Duration::seconds(100));
        clock.resume();
        source.advance(Duration::seconds(5));
        assert_eq!(clock.elapsed_whole_seconds().unwrap(), 15);
    }

    #[test]
    fn test_reset_clears_state() {
        let (mut clock, source) = manual_clock();
        clock.start();
        source.advance(Duration::seconds(10));
        clock.reset();
        assert!(clock.elapsed().is_err());

        clock.restart();
        source.advance(Duration::milliseconds(1500));
        assert_eq!(clock.elapsed_seconds().unwrap(), 1.5);
    }
}
