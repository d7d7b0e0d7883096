//! `ue_build` - version, package and archive an Unreal Engine project.
//!
//! This binary bumps the project version, runs the Unreal Automation Tool
//! and zips the packaged build.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match ue_build_orchestrator::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
