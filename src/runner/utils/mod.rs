//! Shared helpers for the runner.

pub mod fs;
