//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default upper bound for a one-shot recording (5 minutes)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 300;

/// Value object representing a recording length.
/// Immutable; parsed values are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds, saturating at `u64::MAX` milliseconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs.saturating_mul(1000),
        }
    }

    /// Length of `samples` mono frames played back at `sample_rate` Hz.
    /// A zero sample rate yields a zero duration.
    pub const fn from_samples(samples: usize, sample_rate: u32) -> Self {
        if sample_rate == 0 {
            return Self::from_millis(0);
        }
        Self {
            milliseconds: (samples as u64).saturating_mul(1000) / sample_rate as u64,
        }
    }

    /// Default upper bound for one-shot recordings
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    /// Get duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Accepts "500ms", "30s", "1m" and "2m30s" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        if let Some(ms) = input.strip_suffix("ms") {
            if ms.is_empty() || !ms.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let ms: u64 = ms.parse().map_err(|_| invalid())?;
            if ms == 0 {
                return Err(invalid());
            }
            return Ok(Self::from_millis(ms));
        }

        let mut minutes: Option<u64> = None;
        let mut seconds: Option<u64> = None;
        let mut digits = String::new();

        for ch in input.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                // minutes must come first and only once
                'm' if !digits.is_empty() && minutes.is_none() && seconds.is_none() => {
                    minutes = Some(digits.parse().map_err(|_| invalid())?);
                    digits.clear();
                }
                's' if !digits.is_empty() && seconds.is_none() => {
                    seconds = Some(digits.parse().map_err(|_| invalid())?);
                    digits.clear();
                }
                _ => return Err(invalid()),
            }
        }

        if !digits.is_empty() || (minutes.is_none() && seconds.is_none()) {
            return Err(invalid());
        }

        let total_ms = minutes
            .unwrap_or(0)
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds.unwrap_or(0)))
            .and_then(|secs| secs.checked_mul(1000))
            .ok_or_else(invalid)?;
        if total_ms == 0 {
            return Err(invalid());
        }

        Ok(Self::from_millis(total_ms))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milliseconds % 1000 != 0 {
            return write!(f, "{}ms", self.milliseconds);
        }

        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        match (minutes, seconds) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}
