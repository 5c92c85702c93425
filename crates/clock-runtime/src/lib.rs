#![doc = "Wall-clock and sleep bindings for managed runtimes."]

#[allow(unsafe_code)]
pub mod ffi;
pub mod sleeper;
pub mod wall_clock;
pub mod wasm_host;
pub mod wasm_imports;

pub use sleeper::*;
pub use wall_clock::*;
pub use wasm_host::ClockHost;
pub use wasm_imports::ClockHostState;
