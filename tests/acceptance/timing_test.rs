//! Wall-clock and sleep timing acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - `current_time()` within 2s of an independent reference
//! - Consecutive reads never decrease
//! - `sleep(d)` lasts at least `d - 10ms`
//! - `sleep(0)` returns within 50ms
//! - Out-of-range sleeps fail immediately

use super::common::{assert_slept_at_least, reference_now, timed, PROMPT};
use clock_common::config::ClockConfig;
use clock_common::error::{ClockError, DurationFault};
use clock_runtime::{current_time, sleep, Sleeper};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_current_time_near_reference() {
    let before = reference_now();
    let now = current_time().expect("clock read failed");
    let after = reference_now();

    assert!(now >= before - 2.0 && now <= after + 2.0);
}

#[test]
fn test_current_time_non_decreasing() {
    let first = current_time().unwrap();
    let second = current_time().unwrap();
    assert!(second >= first, "{first} then {second}");
}

#[test]
fn test_sleep_lower_bound() {
    for seconds in [0.001, 0.02, 0.1] {
        let (result, elapsed) = timed(|| sleep(seconds));
        result.unwrap();
        assert_slept_at_least(elapsed, Duration::from_secs_f64(seconds));
    }
}

#[test]
fn test_sleep_zero_prompt() {
    let (result, elapsed) = timed(|| sleep(0.0));
    result.unwrap();
    assert!(elapsed < PROMPT, "sleep(0) took {elapsed:?}");
}

#[test]
fn test_time_sleep_time_scenario() {
    let start = current_time().unwrap();
    sleep(0.5).unwrap();
    let end = current_time().unwrap();

    let delta = end - start;
    assert!(
        (0.45..=2.0).contains(&delta),
        "expected 0.45..=2.0s between reads, got {delta}"
    );
}

#[test]
fn test_very_large_sleep_errors_instead_of_wrapping() {
    for seconds in [1.0e14, 1.0e300, f64::MAX] {
        let (result, elapsed) = timed(|| sleep(seconds));
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ClockError::InvalidDuration {
                reason: DurationFault::Overflow,
                ..
            }
        ));
        assert!(elapsed < PROMPT);
    }
}

#[test]
fn test_configured_cap_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "negative_duration = \"clamp_to_zero\"").unwrap();
    writeln!(file, "max_sleep = \"1s\"").unwrap();

    let config = ClockConfig::from_file(file.path()).unwrap();
    let sleeper = Sleeper::new(config);

    let (result, elapsed) = timed(|| sleeper.sleep(-3.0));
    result.unwrap();
    assert!(elapsed < PROMPT);

    let err = sleeper.sleep(5.0).unwrap_err();
    assert!(matches!(
        err,
        ClockError::InvalidDuration {
            reason: DurationFault::ExceedsLimit { limit_us: 1_000_000 },
            ..
        }
    ));
}

#[test]
fn test_concurrent_sleeps_block_only_their_thread() {
    let (_, elapsed) = timed(|| {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| sleep(0.2)))
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
    });

    assert_slept_at_least(elapsed, Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(750), "sleeps serialized: {elapsed:?}");
}
