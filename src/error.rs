//! Error types for the command-line layer.
//!
//! This module wraps the build-run errors with CLI and settings failures and
//! provides recovery suggestions for the user.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for the `ue_build` tool
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Build-run errors outside of a run (settings, persistence)
    #[error("{0}")]
    Runner(#[from] crate::runner::Error),

    /// A build run that reached the `Failed` state
    #[error("Build failed: {0}")]
    Run(#[from] crate::runner::RunFailure),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BuildError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Runner(e) => e.recovery_suggestions(),
            Self::Run(failure) => failure.error.recovery_suggestions(),
            Self::Cli(CliError::InvalidArguments { .. }) => {
                vec!["Run with --help to see the accepted options".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Captured packager output, when the failure came from a packaging run.
    pub fn packager_output(&self) -> &[String] {
        match self {
            Self::Run(failure) => match &failure.error {
                crate::runner::Error::PackagingFailed { output, .. } => output,
                _ => &[],
            },
            _ => &[],
        }
    }
}
