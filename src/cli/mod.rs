//! Command line interface for the Unreal build orchestrator.
//!
//! This module provides argument parsing, command execution, and user
//! feedback for `ue_build`.

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{BuildError, Result};
use clap::Parser;

/// Main CLI entry point
///
/// Returns the process exit code: `0` when the build (or settings update)
/// finished, `1` otherwise.
pub async fn run() -> Result<i32> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print()?;
            return Ok(code);
        }
    };

    let config = RuntimeConfig::from(&args);
    let result = match args.validate() {
        Ok(()) => commands::execute(&args, &config).await,
        Err(e) => Err(BuildError::from(e)),
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            let output = config.output();
            output.error(&e.to_string())?;

            let captured = e.packager_output();
            if !captured.is_empty() {
                output.indent_error("Last packager output:")?;
                for line in &captured[captured.len().saturating_sub(20)..] {
                    output.indent_error(line)?;
                }
            }

            for suggestion in e.recovery_suggestions() {
                output.indent_error(&format!("- {suggestion}"))?;
            }
            Ok(1)
        }
    }
}
