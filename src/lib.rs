//! Unreal Engine build orchestration library
//!
//! This library wraps the Unreal Automation Tool so that every packaged
//! build gets a dated, sequential version:
//! - `ProjectVersion` in `Config/DefaultGame.ini` is bumped (`042625_dev_001`)
//! - `BuildCookRun` archives into `<build path>/<version>`
//! - the packaged platform folder is zipped and checksummed
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod gateway;
pub mod ini;
pub mod runner;
pub mod version;

// Re-export commonly used types
pub use error::{BuildError, CliError, Result};
