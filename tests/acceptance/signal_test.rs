//! Signal interruption acceptance tests.
//!
//! A signal delivered mid-sleep interrupts the kernel wait with EINTR.
//! The sleeper must resume with the remaining time rather than return early.

#![cfg(target_os = "linux")]

use super::common::{assert_slept_at_least, timed};
use clock_runtime::sleep;
use std::time::Duration;

extern "C" fn ignore_signal(_: libc::c_int) {}

fn install_handler(signal: libc::c_int) {
    // SAFETY: zeroed sigaction is a valid starting point; handler is async-signal-safe
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = ignore_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        action.sa_flags = 0; // no SA_RESTART, so the wait sees EINTR
        libc::sigemptyset(&mut action.sa_mask);
        assert_eq!(libc::sigaction(signal, &action, std::ptr::null_mut()), 0);
    }
}

#[test]
fn test_sleep_survives_signal() {
    install_handler(libc::SIGUSR2);

    // SAFETY: pthread_self has no preconditions
    let target = unsafe { libc::pthread_self() };
    let interrupter = std::thread::spawn(move || {
        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(40));
            // SAFETY: target thread is alive until the join below
            unsafe { libc::pthread_kill(target, libc::SIGUSR2) };
        }
    });

    let (result, elapsed) = timed(|| sleep(0.3));
    interrupter.join().unwrap();

    result.unwrap();
    assert_slept_at_least(elapsed, Duration::from_millis(300));
}
