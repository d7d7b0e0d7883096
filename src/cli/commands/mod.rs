//! Command execution for the `ue_build` tool.
//!
//! Resolves the effective settings, optionally persists them and runs the
//! build.

mod build;
mod settings;

pub use build::run_build;
pub use settings::{resolve_settings, save_settings};

use super::{Args, RuntimeConfig};
use crate::error::Result;

/// Executes the command selected by `args` and returns the exit code.
pub async fn execute(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let settings = resolve_settings(args)?;

    if args.update_settings_only {
        save_settings(&settings, &args.settings_file, config)?;
        return Ok(0);
    }

    if args.save_settings {
        save_settings(&settings, &args.settings_file, config)?;
    }

    run_build(&settings, config).await?;
    Ok(0)
}
