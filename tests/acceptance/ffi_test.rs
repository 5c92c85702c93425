//! C ABI acceptance tests.

use super::common::{assert_slept_at_least, reference_now, timed, PROMPT};
use clock_runtime::ffi::{
    host_clock_current_time, host_clock_current_time_checked, host_clock_sleep,
    HOST_CLOCK_INVALID_DURATION, HOST_CLOCK_OK,
};
use std::time::Duration;

#[test]
fn test_ffi_current_time_near_reference() {
    let now = host_clock_current_time();
    assert!((now - reference_now()).abs() < 2.0);

    let mut checked = f64::NAN;
    let rc = unsafe { host_clock_current_time_checked(&mut checked) };
    assert_eq!(rc, HOST_CLOCK_OK);
    assert!(checked >= now);
}

#[test]
fn test_ffi_sleep_blocks() {
    let (rc, elapsed) = timed(|| host_clock_sleep(0.05));
    assert_eq!(rc, HOST_CLOCK_OK);
    assert_slept_at_least(elapsed, Duration::from_millis(50));
}

#[test]
fn test_ffi_sleep_rejects_without_blocking() {
    for seconds in [-1.0, f64::NAN, f64::INFINITY, 1.0e300] {
        let (rc, elapsed) = timed(|| host_clock_sleep(seconds));
        assert_eq!(rc, HOST_CLOCK_INVALID_DURATION, "seconds={seconds}");
        assert!(elapsed < PROMPT);
    }
}
