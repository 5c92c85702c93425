//! Thread sleeper with microsecond granularity.
//!
//! Requests arrive as `f64` seconds, are converted to whole microseconds by
//! [`duration_from_secs`], and are then slept in chunks no longer than
//! `max_chunk`. On Linux each chunk is a relative `clock_nanosleep` on
//! `CLOCK_MONOTONIC`, so wall-clock adjustments do not stretch or cut a sleep.
//! Signal interruptions resume with the remaining time.

use clock_common::config::ClockConfig;
use clock_common::error::ClockResult;
use clock_common::time::duration_from_secs;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Longest wait handed to the kernel in one call. Fits a 32-bit `time_t`.
pub const MAX_KERNEL_WAIT: Duration = Duration::from_secs(i32::MAX as u64);

/// Blocks the calling thread according to a [`ClockConfig`].
#[derive(Debug, Clone, Default)]
pub struct Sleeper {
    config: ClockConfig,
}

impl Sleeper {
    /// Create a sleeper with the given policy.
    pub fn new(config: ClockConfig) -> Self {
        Self { config }
    }

    /// The policy this sleeper applies.
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Convert `seconds` to the duration [`Sleeper::sleep`] would wait, without sleeping.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` for NaN, infinity, rejected negatives,
    /// microsecond overflow, or a request above `max_sleep`.
    pub fn resolve(&self, seconds: f64) -> ClockResult<Duration> {
        duration_from_secs(seconds, &self.config)
    }

    /// Sleep for `seconds`.
    ///
    /// # Errors
    ///
    /// Same as [`Sleeper::resolve`]. Nothing is slept when an error is returned.
    pub fn sleep(&self, seconds: f64) -> ClockResult<()> {
        let duration = self.resolve(seconds)?;
        trace!(seconds, micros = duration.as_micros(), "sleep requested");
        self.sleep_for(duration);
        Ok(())
    }

    /// Sleep for an already validated duration.
    pub fn sleep_for(&self, duration: Duration) {
        let max_chunk = if self.config.max_chunk.is_zero() {
            MAX_KERNEL_WAIT
        } else {
            self.config.max_chunk.min(MAX_KERNEL_WAIT)
        };

        let mut remaining = duration;
        while !remaining.is_zero() {
            let chunk = remaining.min(max_chunk);
            if chunk < remaining {
                debug!(
                    chunk_us = chunk.as_micros(),
                    remaining_us = remaining.as_micros(),
                    "splitting long sleep"
                );
            }
            pause(chunk);
            remaining -= chunk;
        }
    }
}

/// Sleep for `seconds` with the default policy.
///
/// # Errors
///
/// See [`Sleeper::resolve`].
pub fn sleep(seconds: f64) -> ClockResult<()> {
    Sleeper::default().sleep(seconds)
}

/// Block for one chunk using a relative monotonic sleep.
#[cfg(target_os = "linux")]
#[allow(unsafe_code, clippy::cast_possible_wrap)]
fn pause(chunk: Duration) {
    // chunk <= MAX_KERNEL_WAIT, so the seconds fit any time_t
    let mut request = libc::timespec {
        tv_sec: chunk.as_secs() as libc::time_t,
        tv_nsec: libc::c_long::from(chunk.subsec_nanos() as i32),
    };

    loop {
        let mut remain = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: both timespecs are valid, initialized stack values
        let rc = unsafe {
            libc::clock_nanosleep(
                libc::CLOCK_MONOTONIC,
                0, // Relative sleep
                &request,
                &mut remain,
            )
        };

        match rc {
            0 => return,
            libc::EINTR => {
                debug!(
                    remaining_s = remain.tv_sec,
                    remaining_ns = remain.tv_nsec,
                    "sleep interrupted by signal, resuming"
                );
                request = remain;
            }
            errno => {
                // EINVAL/ENOTSUP are the only other outcomes; std retries EINTR itself
                warn!(errno, "clock_nanosleep failed, falling back to thread::sleep");
                std::thread::sleep(chunk);
                return;
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn pause(chunk: Duration) {
    std::thread::sleep(chunk);
}
