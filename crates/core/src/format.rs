//! Time label formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Label shown when the remaining time cannot be estimated.
pub const UNKNOWN_TIME: &str = "??:??:??";

/// Label shown for elapsed time before the clock starts.
pub const NO_TIME: &str = "--:--:--";

/// Largest hour count that fits the two-digit hour field.
pub const MAX_DISPLAYABLE_HOURS: u64 = 99;

const SECONDS_PER_DAY: u64 = 86_400;

/// How to display an estimate whose hour field exceeds two digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsFormat {
    /// Natural `H:MM:SS` with as many hour digits as needed
    #[default]
    Raw,
    /// Replace the estimate with `??:??:??`
    Unknown,
    /// Replace the estimate with `> N Days`
    Friendly,
}

impl OutOfBoundsFormat {
    /// Parse an optional format token; `None` selects [`OutOfBoundsFormat::Raw`].
    pub fn from_token(token: Option<&str>) -> Result<Self> {
        match token {
            None => Ok(OutOfBoundsFormat::Raw),
            Some(token) => token.parse(),
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutOfBoundsFormat::Raw => "raw",
            OutOfBoundsFormat::Unknown => "unknown",
            OutOfBoundsFormat::Friendly => "friendly",
        }
    }
}

impl FromStr for OutOfBoundsFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raw" | "nil" => Ok(OutOfBoundsFormat::Raw),
            "unknown" => Ok(OutOfBoundsFormat::Unknown),
            "friendly" => Ok(OutOfBoundsFormat::Friendly),
            other => Err(Error::InvalidOutOfBoundsFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutOfBoundsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split whole seconds into hours, minutes and seconds.
pub fn divide_seconds(seconds: u64) -> (u64, u64, u64) {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    (hours, minutes, seconds % 60)
}

/// Render whole seconds as `HH:MM:SS`; hours grow past two digits as needed.
pub fn format_hms(seconds: u64) -> String {
    let (hours, minutes, seconds) = divide_seconds(seconds);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Render a remaining-time estimate without the `ETA:` prefix.
pub fn format_remaining(seconds: Option<u64>, out_of_bounds: OutOfBoundsFormat) -> String {
    let Some(seconds) = seconds else {
        return UNKNOWN_TIME.to_string();
    };

    let (hours, _, _) = divide_seconds(seconds);
    if hours <= MAX_DISPLAYABLE_HOURS {
        return format_hms(seconds);
    }

    match out_of_bounds {
        OutOfBoundsFormat::Raw => format_hms(seconds),
        OutOfBoundsFormat::Unknown => UNKNOWN_TIME.to_string(),
        OutOfBoundsFormat::Friendly => format!("> {} Days", seconds / SECONDS_PER_DAY),
    }
}

/// Render the full ETA label, e.g. `" ETA: 00:01:05"`.
pub fn format_eta(seconds: Option<u64>, out_of_bounds: OutOfBoundsFormat) -> String {
    format!(" ETA: {}", format_remaining(seconds, out_of_bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_seconds() {
        assert_eq!(divide_seconds(13332), (3, 42, 12));
        assert_eq!(divide_seconds(59), (0, 0, 59));
        assert_eq!(divide_seconds(360_000), (100, 0, 0));
    }

    #[test]
    fn test_format_eta_unknown() {
        assert_eq!(format_eta(None, OutOfBoundsFormat::Raw), " ETA: ??:??:??");
        assert_eq!(format_eta(None, OutOfBoundsFormat::Friendly), " ETA: ??:??:??");
    }

    #[test]
    fn test_format_eta_in_bounds() {
        assert_eq!(format_eta(Some(0), OutOfBoundsFormat::Raw), " ETA: 00:00:00");
        assert_eq!(format_eta(Some(31108), OutOfBoundsFormat::Friendly), " ETA: 08:38:28");
        assert_eq!(format_eta(Some(359_999), OutOfBoundsFormat::Unknown), " ETA: 99:59:59");
    }

    #[test]
    fn test_format_eta_out_of_bounds() {
        assert_eq!(format_eta(Some(360_000), OutOfBoundsFormat::Raw), " ETA: 100:00:00");
        assert_eq!(format_eta(Some(380_000), OutOfBoundsFormat::Raw), " ETA: 105:33:20");
        assert_eq!(format_eta(Some(380_000), OutOfBoundsFormat::Unknown), " ETA: ??:??:??");
        assert_eq!(format_eta(Some(380_000), OutOfBoundsFormat::Friendly), " ETA: > 4 Days");
        assert_eq!(format_eta(Some(864_000), OutOfBoundsFormat::Friendly), " ETA: > 10 Days");
    }

    #[test]
    fn test_parse_out_of_bounds_format() {
        assert_eq!(OutOfBoundsFormat::from_token(None).unwrap(), OutOfBoundsFormat::Raw);
        assert_eq!("friendly".parse::<OutOfBoundsFormat>().unwrap(), OutOfBoundsFormat::Friendly);
        assert_eq!("unknown".parse::<OutOfBoundsFormat>().unwrap(), OutOfBoundsFormat::Unknown);

        let err = "foo".parse::<OutOfBoundsFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Out Of Bounds time format.  Valid formats are [:unknown, :friendly, nil]"
        );
    }

    #[test]
    fn test_out_of_bounds_format_serde() {
        let format: OutOfBoundsFormat = serde_json::from_str("\"friendly\"").unwrap();
        assert_eq!(format, OutOfBoundsFormat::Friendly);
        assert_eq!(serde_json::to_string(&OutOfBoundsFormat::Raw).unwrap(), "\"raw\"");
    }
}
