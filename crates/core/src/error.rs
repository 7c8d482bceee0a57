//! Error types shared by the progress components.

/// Result alias for etabar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the clock, the counter and the estimator.
///
/// Every variant is a usage error reported synchronously to the caller;
/// none of them are retried or recovered internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Progress was set above the configured total.
    #[error("You can't set the item's current value to be greater than the total.")]
    InvalidProgress {
        /// Rejected progress value
        progress: u64,
        /// Total in force at the time
        total: u64,
    },

    /// Total was lowered below the current progress.
    #[error("You can't set the item's total value to less than the current progress.")]
    InvalidTotal {
        /// Rejected total
        total: u64,
        /// Progress in force at the time
        progress: u64,
    },

    /// Total was lowered below the starting value.
    #[error("You can't set the item's total value to less than the starting value.")]
    TotalBelowStart {
        /// Rejected total
        total: u64,
        /// Starting value in force at the time
        starting_at: u64,
    },

    /// Unrecognised out-of-bounds time format token.
    #[error("Invalid Out Of Bounds time format.  Valid formats are [:unknown, :friendly, nil]")]
    InvalidOutOfBoundsFormat(String),

    /// Elapsed time was queried before the clock was started.
    #[error("Clock has not been started")]
    ClockNotStarted,

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from a rejected progress or total mutation.
    pub fn is_invalid_progress(&self) -> bool {
        matches!(
            self,
            Error::InvalidProgress { .. } | Error::InvalidTotal { .. } | Error::TotalBelowStart { .. }
        )
    }
}
