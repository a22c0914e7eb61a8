//! Cross-crate integration test suite for the drip toolchain.
//!
//! This crate exists only to run the integration tests under `tests/`; all
//! test code lives there. `tests/support` holds the shared pipeline helpers
//! (`run_source`, `run_asm`, ...) every test file imports.
