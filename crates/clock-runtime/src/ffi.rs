//! C ABI exports for foreign runtimes.
//!
//! Any runtime with a C FFI (OCaml `external`, Python `ctypes`, Lua FFI, ...)
//! can bind these directly from the `cdylib`:
//!
//! ```c
//! double host_clock_current_time(void);
//! int32_t host_clock_current_time_checked(double *out);
//! int32_t host_clock_sleep(double seconds);
//! ```
//!
//! Values are plain IEEE-754 doubles in seconds. Errors are status codes.

use crate::sleeper::sleep;
use crate::wall_clock::current_time;
use clock_common::error::ClockError;
use tracing::warn;

/// Call succeeded.
pub const HOST_CLOCK_OK: i32 = 0;
/// Sleep argument was NaN, infinite, negative, or out of range.
pub const HOST_CLOCK_INVALID_DURATION: i32 = -1;
/// The OS clock query failed.
pub const HOST_CLOCK_UNAVAILABLE: i32 = -2;
/// A required output pointer was null.
pub const HOST_CLOCK_NULL_POINTER: i32 = -3;

fn status_of(err: &ClockError) -> i32 {
    match err {
        ClockError::ClockUnavailable(_) => HOST_CLOCK_UNAVAILABLE,
        ClockError::InvalidDuration { .. } => HOST_CLOCK_INVALID_DURATION,
    }
}

/// Current wall-clock time in seconds since the epoch, or `NaN` if the clock failed.
#[no_mangle]
pub extern "C" fn host_clock_current_time() -> f64 {
    match current_time() {
        Ok(now) => now,
        Err(e) => {
            warn!(error = %e, "host_clock_current_time returning NaN");
            f64::NAN
        }
    }
}

/// Write the current wall-clock time to `out`.
///
/// Returns [`HOST_CLOCK_OK`], [`HOST_CLOCK_UNAVAILABLE`] or [`HOST_CLOCK_NULL_POINTER`].
///
/// # Safety
///
/// `out` must be null or valid for a write of one `f64`.
#[no_mangle]
pub unsafe extern "C" fn host_clock_current_time_checked(out: *mut f64) -> i32 {
    if out.is_null() {
        return HOST_CLOCK_NULL_POINTER;
    }
    match current_time() {
        Ok(now) => {
            // SAFETY: non-null and valid per the caller contract
            unsafe { out.write(now) };
            HOST_CLOCK_OK
        }
        Err(e) => {
            warn!(error = %e, "host_clock_current_time_checked failed");
            status_of(&e)
        }
    }
}

/// Block the calling thread for `seconds`.
///
/// Returns [`HOST_CLOCK_OK`] after sleeping, or [`HOST_CLOCK_INVALID_DURATION`]
/// without sleeping.
#[no_mangle]
pub extern "C" fn host_clock_sleep(seconds: f64) -> i32 {
    match sleep(seconds) {
        Ok(()) => HOST_CLOCK_OK,
        Err(e) => {
            warn!(error = %e, "host_clock_sleep rejected request");
            status_of(&e)
        }
    }
}
