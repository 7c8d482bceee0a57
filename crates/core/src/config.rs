//! Progress session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::OutOfBoundsFormat;

/// Default total when none is configured.
pub const DEFAULT_TOTAL: u64 = 100;

/// Default smoothing factor.
pub const DEFAULT_SMOOTHING: f64 = 0.1;

/// Recognised options for a progress session.
///
/// Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
    /// Total units of work; `None` means unbounded
    pub total: Option<u64>,

    /// Weight given to history when smoothing progress, in `[0, 1]`
    pub smoothing: f64,

    /// Value the counter starts from
    pub starting_at: u64,

    /// How over-long estimates are displayed
    pub out_of_bounds_format: OutOfBoundsFormat,
}

impl ProgressConfig {
    /// Parse and validate a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the total.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Remove the total, making progress unbounded.
    pub fn without_total(mut self) -> Self {
        self.total = None;
        self
    }

    /// Set the smoothing factor.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the starting value.
    pub fn with_starting_at(mut self, starting_at: u64) -> Self {
        self.starting_at = starting_at;
        self
    }

    /// Set the out-of-bounds format.
    pub fn with_out_of_bounds_format(mut self, format: OutOfBoundsFormat) -> Self {
        self.out_of_bounds_format = format;
        self
    }

    /// Check option ranges and their consistency.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be within [0, 1], got {}",
                self.smoothing
            )));
        }

        if let Some(total) = self.total {
            if self.starting_at > total {
                return Err(Error::InvalidConfig(format!(
                    "starting_at ({}) is greater than total ({})",
                    self.starting_at, total
                )));
            }
        }

        Ok(())
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            total: Some(DEFAULT_TOTAL),
            smoothing: DEFAULT_SMOOTHING,
            starting_at: 0,
            out_of_bounds_format: OutOfBoundsFormat::Raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProgressConfig::default();
        assert_eq!(config.total, Some(100));
        assert_eq!(config.smoothing, 0.1);
        assert_eq!(config.starting_at, 0);
        assert_eq!(config.out_of_bounds_format, OutOfBoundsFormat::Raw);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ProgressConfig::from_json(r#"{"total": 10, "out_of_bounds_format": "friendly"}"#).unwrap();
        assert_eq!(config.total, Some(10));
        assert_eq!(config.smoothing, DEFAULT_SMOOTHING);
        assert_eq!(config.out_of_bounds_format, OutOfBoundsFormat::Friendly);
    }

    #[test]
    fn test_from_json_null_total_is_unbounded() {
        let config = ProgressConfig::from_json(r#"{"total": null}"#).unwrap();
        assert_eq!(config.total, None);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = ProgressConfig::from_json(r#"{"totl": 10}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_json_rejects_bad_format() {
        assert!(ProgressConfig::from_json(r#"{"out_of_bounds_format": "foo"}"#).is_err());
    }

    #[test]
    fn test_validate_smoothing_range() {
        let err = ProgressConfig::default().with_smoothing(1.5).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(ProgressConfig::default().with_smoothing(-0.1).validate().is_err());
        assert!(ProgressConfig::default().with_smoothing(f64::NAN).validate().is_err());
        assert!(ProgressConfig::default().with_smoothing(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_starting_at_above_total() {
        let config = ProgressConfig::default().with_total(5).with_starting_at(6);
        assert!(config.validate().is_err());

        let unbounded = ProgressConfig::default().without_total().with_starting_at(600);
        assert!(unbounded.validate().is_ok());
    }
}
