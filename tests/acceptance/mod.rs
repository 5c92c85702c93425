//! Integration tests for host-clock acceptance testing.

mod common;
mod ffi_test;
mod signal_test;
mod timing_test;
