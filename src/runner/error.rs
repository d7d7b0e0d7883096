//! Error types for build runs.
//!
//! Every failure a run can hit maps to one [`ErrorKind`]; the run state machine
//! attaches the phase it failed in (see [`crate::runner::RunFailure`]).

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Result type alias for build-run operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a build-run error, independent of its payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The project configuration file does not exist
    ConfigNotFound,
    /// The project configuration file exists but could not be read
    ConfigRead,
    /// The stored version token does not have the `DATE_FLAVOR_SEQ` shape
    MalformedVersionToken,
    /// A section targeted by an update is missing
    SectionNotFound,
    /// A key targeted by an update is missing
    EntryNotFound,
    /// A file could not be written
    WriteFailure,
    /// The per-version output directory could not be created
    DirectoryCreateFailure,
    /// The packaging tool could not be located
    PackagerNotFound,
    /// The packaging tool could not be started or awaited
    PackagerLaunch,
    /// The packaging tool exited with a failure status
    PackagingFailed,
    /// The packaging tool exceeded the configured timeout
    PackagingTimeout,
    /// The packaged output could not be compressed
    ArchiveFailure,
    /// Another run holds the advisory lock
    RunLocked,
    /// Settings are missing or invalid
    Settings,
    /// Any other I/O failure
    Io,
    /// Anything else
    Generic,
}

/// Main error type for build-run operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file is missing
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration file {}: {source}", path.display())]
    ConfigRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Version token does not split into `DATE_FLAVOR_SEQ`
    #[error("malformed version token `{token}`: {reason}")]
    MalformedVersionToken {
        /// Token as stored
        token: String,
        /// What is wrong with it
        reason: String,
    },

    /// Section missing from the document
    #[error("section {section} not found")]
    SectionNotFound {
        /// Normalized section name
        section: String,
    },

    /// Key missing from an existing section
    #[error("entry `{key}` not found in section {section}")]
    EntryNotFound {
        /// Normalized section name
        section: String,
        /// Key that was looked up
        key: String,
    },

    /// File write failed
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Output directory creation failed
    #[error("failed to create output directory {}: {source}", path.display())]
    DirectoryCreateFailure {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Packaging tool not found
    #[error("packaging tool not found: {reason}")]
    PackagerNotFound {
        /// Where it was looked for
        reason: String,
    },

    /// Packaging tool could not be spawned or awaited
    #[error("failed to run `{command}`: {error}")]
    PackagerLaunch {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        error: io::Error,
    },

    /// Packaging tool reported failure
    #[error("packaging failed ({})", describe_exit(code))]
    PackagingFailed {
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Last lines of stdout/stderr
        output: Vec<String>,
    },

    /// Packaging tool exceeded its time budget and was killed
    #[error("packaging timed out after {}s and was terminated", timeout.as_secs())]
    PackagingTimeout {
        /// Configured timeout
        timeout: Duration,
    },

    /// Archive creation failed
    #[error("failed to archive {}: {reason}", path.display())]
    ArchiveFailure {
        /// Folder or archive path involved
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Advisory lock already held
    #[error("another build run holds {}", path.display())]
    RunLocked {
        /// Lock file path
        path: PathBuf,
    },

    /// Invalid settings
    #[error("invalid settings: {0}")]
    Settings(String),

    /// File system error with context
    #[error("{context} ({}): {source}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Generic error message
    #[error("{0}")]
    GenericError(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigNotFound { .. } => ErrorKind::ConfigNotFound,
            Self::ConfigRead { .. } => ErrorKind::ConfigRead,
            Self::MalformedVersionToken { .. } => ErrorKind::MalformedVersionToken,
            Self::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            Self::EntryNotFound { .. } => ErrorKind::EntryNotFound,
            Self::WriteFailure { .. } => ErrorKind::WriteFailure,
            Self::DirectoryCreateFailure { .. } => ErrorKind::DirectoryCreateFailure,
            Self::PackagerNotFound { .. } => ErrorKind::PackagerNotFound,
            Self::PackagerLaunch { .. } => ErrorKind::PackagerLaunch,
            Self::PackagingFailed { .. } => ErrorKind::PackagingFailed,
            Self::PackagingTimeout { .. } => ErrorKind::PackagingTimeout,
            Self::ArchiveFailure { .. } => ErrorKind::ArchiveFailure,
            Self::RunLocked { .. } => ErrorKind::RunLocked,
            Self::Settings(_) => ErrorKind::Settings,
            Self::Fs { .. } => ErrorKind::Io,
            Self::GenericError(_) => ErrorKind::Generic,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigNotFound { path } => vec![
                format!("Expected the project config at {}", path.display()),
                "Check --project-path points at the folder holding the .uproject file".to_string(),
            ],
            Self::MalformedVersionToken { .. } => vec![
                "ProjectVersion must look like MMDDYY_flavor_NNN (e.g. 042625_dev_001)".to_string(),
                "Fix or remove the entry in Config/DefaultGame.ini and run again".to_string(),
            ],
            Self::PackagerNotFound { .. } => vec![
                "Pass --engine-root or --uat-path, or save them with --save-settings".to_string(),
            ],
            Self::PackagingFailed { output, .. } if !output.is_empty() => vec![
                "Review the packaging output above; the last lines were captured".to_string(),
            ],
            Self::PackagingTimeout { .. } => {
                vec!["Raise --timeout-secs or omit it to wait indefinitely".to_string()]
            }
            Self::RunLocked { .. } => vec![
                "Wait for the other build to finish before starting a new one".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Attaches file system context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with what was being done and the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Converts options and foreign errors into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Adds a context message.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaging_failure_mentions_exit_code() {
        let err = Error::PackagingFailed {
            code: Some(3),
            output: vec!["cook failed".into()],
        };
        assert_eq!(err.kind(), ErrorKind::PackagingFailed);
        assert_eq!(err.to_string(), "packaging failed (exit code 3)");

        let killed = Error::PackagingFailed {
            code: None,
            output: Vec::new(),
        };
        assert!(killed.to_string().contains("signal"));
    }

    #[test]
    fn fs_context_keeps_path() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = result.fs_context("opening lock file", "/tmp/x.lock").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/tmp/x.lock"));
    }

    #[test]
    fn option_context_becomes_generic() {
        let missing: Option<u8> = None;
        let err = missing.context("no value").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert_eq!(err.to_string(), "no value");
    }
}
