//! Common utilities for acceptance tests.

#![allow(dead_code)]

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Scheduler jitter allowed below a requested sleep.
pub const JITTER: Duration = Duration::from_millis(10);

/// Bound for a zero-length sleep to return.
pub const PROMPT: Duration = Duration::from_millis(50);

/// Reference wall-clock reading that does not go through the crate.
pub fn reference_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs_f64()
}

/// Run `f` and return how long it took on the monotonic clock.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Assert `elapsed` is at least `requested` minus [`JITTER`].
pub fn assert_slept_at_least(elapsed: Duration, requested: Duration) {
    assert!(
        elapsed + JITTER >= requested,
        "slept {elapsed:?}, requested {requested:?}"
    );
}
