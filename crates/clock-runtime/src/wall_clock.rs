//! Wall-clock reader.
//!
//! Reads `CLOCK_REALTIME` and hands it back as seconds since the Unix epoch
//! with microsecond resolution. A failed clock query is an error, never a
//! zeroed or half-filled timestamp. A clock set before the epoch is reported
//! as unavailable on every platform.

use clock_common::error::{ClockError, ClockResult};
use clock_common::time::Timestamp;
use tracing::trace;

/// The system real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl WallClock {
    /// Read the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ClockUnavailable`] if the OS clock query fails or
    /// reports a time before the epoch.
    #[cfg(unix)]
    pub fn now(&self) -> ClockResult<Timestamp> {
        use nix::time::{clock_gettime, ClockId};

        let ts = clock_gettime(ClockId::CLOCK_REALTIME).map_err(|e| {
            ClockError::ClockUnavailable(format!("clock_gettime(CLOCK_REALTIME) failed: {e}"))
        })?;

        #[allow(clippy::useless_conversion)]
        let stamp = Timestamp::from_timespec(i64::from(ts.tv_sec()), i64::from(ts.tv_nsec()))?;
        trace!(secs = stamp.secs(), micros = stamp.micros(), "wall clock read");
        Ok(stamp)
    }

    /// Read the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ClockUnavailable`] if the time lies before the epoch.
    #[cfg(not(unix))]
    pub fn now(&self) -> ClockResult<Timestamp> {
        let stamp = Timestamp::from_system_time(std::time::SystemTime::now())?;
        trace!(secs = stamp.secs(), micros = stamp.micros(), "wall clock read");
        Ok(stamp)
    }
}

/// Current wall-clock time as `f64` seconds since the epoch.
///
/// # Errors
///
/// Returns [`ClockError::ClockUnavailable`] if the OS clock query fails.
pub fn current_time() -> ClockResult<f64> {
    WallClock.now().map(|ts| ts.as_secs_f64())
}
