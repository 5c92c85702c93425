//! Wall-clock timestamps and the seconds-to-microseconds conversion.
//!
//! Managed callers speak in `f64` seconds. The kernel speaks in integer
//! units. Everything that crosses between the two goes through this module
//! so rounding and range checks happen in exactly one place.

use crate::config::{ClockConfig, NegativeDurationPolicy};
use crate::error::{ClockError, ClockResult, DurationFault};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microseconds per second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Wall-clock reading with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    secs: i64,
    micros: u32,
}

impl Timestamp {
    /// Build from a `timespec`-style pair. Sub-microsecond nanoseconds are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ClockUnavailable`] if `secs` is negative (a clock set
    /// before the epoch) or `nanos` is outside `0..1_000_000_000`, which only a
    /// misbehaving clock source reports.
    pub fn from_timespec(secs: i64, nanos: i64) -> ClockResult<Self> {
        if secs < 0 {
            return Err(ClockError::ClockUnavailable(format!(
                "clock before epoch: tv_sec={secs}"
            )));
        }
        if nanos < 0 {
            return Err(ClockError::ClockUnavailable(format!(
                "clock reported tv_nsec={nanos}"
            )));
        }
        let micros = u32::try_from(nanos / 1_000)
            .ok()
            .filter(|us| u64::from(*us) < MICROS_PER_SEC)
            .ok_or_else(|| {
                ClockError::ClockUnavailable(format!("clock reported tv_nsec={nanos}"))
            })?;
        Ok(Self { secs, micros })
    }

    /// Build from a [`SystemTime`].
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ClockUnavailable`] if the time lies before the epoch
    /// or beyond `i64` seconds.
    pub fn from_system_time(time: SystemTime) -> ClockResult<Self> {
        let since = time
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError::ClockUnavailable(format!("clock before epoch: {e}")))?;
        let secs = i64::try_from(since.as_secs())
            .map_err(|_| ClockError::ClockUnavailable("clock beyond i64 seconds".into()))?;
        Ok(Self {
            secs,
            micros: since.subsec_micros(),
        })
    }

    /// Whole seconds since the epoch.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// Microseconds past [`Timestamp::secs`].
    pub fn micros(&self) -> u32 {
        self.micros
    }

    /// `secs + micros / 1_000_000`, the value handed to managed callers.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + f64::from(self.micros) / MICROS_PER_SEC as f64
    }
}

/// Rounding applied when seconds are turned into whole microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Toward zero, like a C `(int)` cast.
    #[default]
    Truncate,
    /// To the nearest microsecond, ties away from zero.
    Nearest,
}

impl Rounding {
    /// Convert non-negative seconds to microseconds.
    ///
    /// # Errors
    ///
    /// - [`DurationFault::NotFinite`] for NaN or infinity
    /// - [`DurationFault::Negative`] for values below zero
    /// - [`DurationFault::Overflow`] if the count does not fit in a `u64`
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn to_micros(self, seconds: f64) -> ClockResult<u64> {
        if !seconds.is_finite() {
            return Err(ClockError::invalid_duration(seconds, DurationFault::NotFinite));
        }
        if seconds < 0.0 {
            return Err(ClockError::invalid_duration(seconds, DurationFault::Negative));
        }

        let scaled = seconds * MICROS_PER_SEC as f64;
        let micros = match self {
            Self::Truncate => scaled.trunc(),
            Self::Nearest => scaled.round(),
        };

        // u64::MAX rounds up to 2^64 as f64, so anything >= it is out of range
        if micros >= u64::MAX as f64 {
            return Err(ClockError::invalid_duration(seconds, DurationFault::Overflow));
        }
        Ok(micros as u64)
    }
}

/// Turn a caller-supplied `f64` seconds value into a sleep [`Duration`].
///
/// Applies, in order: the finiteness check, the negative-duration policy,
/// rounding to microseconds, and the optional `max_sleep` cap.
///
/// # Errors
///
/// Returns [`ClockError::InvalidDuration`] when any of those steps rejects the value.
pub fn duration_from_secs(seconds: f64, config: &ClockConfig) -> ClockResult<Duration> {
    if !seconds.is_finite() {
        return Err(ClockError::invalid_duration(seconds, DurationFault::NotFinite));
    }
    if seconds < 0.0 {
        match config.negative_duration {
            NegativeDurationPolicy::Reject => {
                return Err(ClockError::invalid_duration(seconds, DurationFault::Negative));
            }
            NegativeDurationPolicy::ClampToZero => return Ok(Duration::ZERO),
        }
    }

    let micros = config.rounding.to_micros(seconds)?;

    if let Some(max) = config.max_sleep {
        let limit_us = u64::try_from(max.as_micros()).unwrap_or(u64::MAX);
        if micros > limit_us {
            return Err(ClockError::invalid_duration(
                seconds,
                DurationFault::ExceedsLimit { limit_us },
            ));
        }
    }

    Ok(Duration::from_micros(micros))
}
