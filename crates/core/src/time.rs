//! Injectable time sources.
//!
//! Components never call `Utc::now()` directly; they read the time through a
//! [`TimeSource`] so tests can freeze and move time explicitly.

use chrono::Utc;
use std::sync::{Arc, Mutex};

use crate::Timestamp;

/// Something that can tell the current time.
pub trait TimeSource: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;
}

/// System clock, wrapping chrono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Manually driven time source.
///
/// Time stands still until [`ManualTimeSource::advance`] or
/// [`ManualTimeSource::set`] is called. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    current: Arc<Mutex<Timestamp>>,
}

impl ManualTimeSource {
    /// Create a source frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a source frozen at the current system time.
    pub fn frozen_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move time forward (or backward, for negative durations).
    pub fn advance(&self, by: chrono::Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = *current + by;
    }

    /// Move time forward by fractional seconds.
    pub fn advance_secs(&self, seconds: f64) {
        self.advance(chrono::Duration::microseconds((seconds * 1_000_000.0).round() as i64));
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: Timestamp) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::frozen_now()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Shared handle to a time source.
pub type SharedTimeSource = Arc<dyn TimeSource>;

/// The default time source: the system clock.
pub fn system_time() -> SharedTimeSource {
    Arc::new(SystemTimeSource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_source_is_frozen() {
        let source = ManualTimeSource::frozen_now();
        assert_eq!(source.now(), source.now());
    }

    #[test]
    fn test_manual_source_clones_share_time() {
        let source = ManualTimeSource::frozen_now();
        let other = source.clone();
        let before = other.now();
        source.advance(chrono::Duration::seconds(5));
        assert_eq!(other.now() - before, chrono::Duration::seconds(5));
    }

    #[test]
    fn test_advance_secs_fractional() {
        let source = ManualTimeSource::frozen_now();
        let before = source.now();
        source.advance_secs(0.5);
        assert_eq!(source.now() - before, chrono::Duration::milliseconds(500));
    }
}
