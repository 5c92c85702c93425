//! Host functions exported to Wasm guests.
//!
//! Wasm modules import the clock bindings from the "clock" module:
//!
//! ```wat
//! (import "clock" "current_time" (func $current_time (result f64)))
//! (import "clock" "sleep" (func $sleep (param f64)))
//! ```
//!
//! A clock failure or a rejected sleep duration traps the guest with the
//! underlying [`ClockError`](clock_common::error::ClockError) as the cause.

use crate::sleeper::Sleeper;
use crate::wall_clock::WallClock;
use anyhow::Context;
use clock_common::config::ClockConfig;
use std::time::Duration;
use tracing::{trace, warn};
use wasmtime::{Caller, Linker};

/// Import module name guests link against.
pub const IMPORT_MODULE: &str = "clock";

/// Host state accessible from the clock host functions.
#[derive(Debug, Default)]
pub struct ClockHostState {
    /// Sleep policy applied to guest requests.
    pub sleeper: Sleeper,
    /// Number of `current_time` calls.
    pub time_calls: u64,
    /// Number of `sleep` calls, including rejected ones.
    pub sleep_calls: u64,
    /// Total time the guest asked to sleep and was granted.
    pub slept: Duration,
}

impl ClockHostState {
    /// Create host state with the given sleep policy.
    pub fn new(config: ClockConfig) -> Self {
        Self {
            sleeper: Sleeper::new(config),
            ..Default::default()
        }
    }
}

/// Read the wall clock.
fn host_current_time(mut caller: Caller<'_, ClockHostState>) -> anyhow::Result<f64> {
    caller.data_mut().time_calls += 1;
    let now = WallClock
        .now()
        .context("clock.current_time")?
        .as_secs_f64();
    trace!(now, "current_time");
    Ok(now)
}

/// Block the thread running the guest.
fn host_sleep(mut caller: Caller<'_, ClockHostState>, seconds: f64) -> anyhow::Result<()> {
    let state = caller.data_mut();
    state.sleep_calls += 1;

    let duration = match state.sleeper.resolve(seconds) {
        Ok(d) => d,
        Err(e) => {
            warn!(seconds, error = %e, "guest sleep rejected");
            return Err(anyhow::Error::new(e).context("clock.sleep"));
        }
    };

    trace!(seconds, micros = duration.as_micros(), "sleep");
    state.sleeper.sleep_for(duration);
    state.slept += duration;
    Ok(())
}

/// Register the clock host functions with a Wasmtime linker.
pub fn register_clock_functions(linker: &mut Linker<ClockHostState>) -> anyhow::Result<()> {
    linker.func_wrap(IMPORT_MODULE, "current_time", host_current_time)?;
    linker.func_wrap(IMPORT_MODULE, "sleep", host_sleep)?;
    Ok(())
}
