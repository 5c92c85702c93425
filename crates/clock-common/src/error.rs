use std::fmt;
use thiserror::Error;

/// Clock and sleep error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockError {
    /// The operating system refused to report the wall-clock time.
    #[error("clock unavailable: {0}")]
    ClockUnavailable(String),

    /// A sleep request that cannot be honoured as given.
    #[error("invalid duration {seconds}s: {reason}")]
    InvalidDuration {
        /// Requested duration in seconds, as supplied by the caller.
        seconds: f64,
        /// Why the request was rejected.
        reason: DurationFault,
    },
}

impl ClockError {
    /// Shorthand for an [`ClockError::InvalidDuration`].
    pub fn invalid_duration(seconds: f64, reason: DurationFault) -> Self {
        Self::InvalidDuration { seconds, reason }
    }

    /// Whether this error came from a rejected sleep argument.
    pub fn is_invalid_duration(&self) -> bool {
        matches!(self, Self::InvalidDuration { .. })
    }
}

/// Reason a sleep duration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFault {
    /// NaN or infinite.
    NotFinite,
    /// Below zero while the policy rejects negative durations.
    Negative,
    /// The microsecond count does not fit in 64 bits.
    Overflow,
    /// Longer than the configured `max_sleep`.
    ExceedsLimit {
        /// Configured limit in microseconds.
        limit_us: u64,
    },
}

impl fmt::Display for DurationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite => f.write_str("duration is not a finite number"),
            Self::Negative => f.write_str("duration is negative"),
            Self::Overflow => f.write_str("microsecond count overflows 64 bits"),
            Self::ExceedsLimit { limit_us } => {
                write!(f, "exceeds configured maximum of {limit_us}us")
            }
        }
    }
}

/// Convenience type alias for clock operations.
pub type ClockResult<T> = Result<T, ClockError>;
