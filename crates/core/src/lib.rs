//! etabar core types.
//!
//! This crate defines the time plumbing, the elapsed-time clock, label
//! formatting, configuration and the shared error type used by the progress
//! components.

#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod format;
mod time;

pub use clock::{duration_secs, Clock};
pub use config::{ProgressConfig, DEFAULT_SMOOTHING, DEFAULT_TOTAL};
pub use error::{Error, Result};
pub use format::{
    divide_seconds, format_eta, format_hms, format_remaining, OutOfBoundsFormat,
    MAX_DISPLAYABLE_HOURS, NO_TIME, UNKNOWN_TIME,
};
pub use time::{system_time, ManualTimeSource, SharedTimeSource, SystemTimeSource, TimeSource};

/// Timestamp type
pub type Timestamp = chrono::DateTime<chrono::Utc>;
