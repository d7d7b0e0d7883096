//! Run states and terminal results.

use crate::{runner::Error, version::VersionToken};
use std::{fmt, path::PathBuf};
use thiserror::Error;

/// Phase of a run that can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Reading, bumping and persisting the version entry
    VersionUpdating,
    /// Creating `<output_root>/<version>`
    ArchivePreparing,
    /// Running the external packager
    Packaging,
    /// Compressing the packaged platform folder
    Archiving,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VersionUpdating => "version update",
            Self::ArchivePreparing => "archive directory preparation",
            Self::Packaging => "packaging",
            Self::Archiving => "archiving",
        })
    }
}

/// State of the build-run state machine.
///
/// `Idle → VersionUpdating → ArchivePreparing → Packaging → Archiving →
/// Succeeded`, with `Failed` reachable from every non-terminal state.
/// `VersionUpdating` is skipped when version mutation is disabled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RunState {
    /// Nothing has happened yet
    Idle,
    /// See [`Phase::VersionUpdating`]
    VersionUpdating,
    /// See [`Phase::ArchivePreparing`]
    ArchivePreparing,
    /// See [`Phase::Packaging`]
    Packaging,
    /// See [`Phase::Archiving`]
    Archiving,
    /// Terminal success
    Succeeded,
    /// Terminal failure in the given phase
    Failed(Phase),
}

impl RunState {
    /// Returns `true` for `Succeeded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

impl From<Phase> for RunState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::VersionUpdating => Self::VersionUpdating,
            Phase::ArchivePreparing => Self::ArchivePreparing,
            Phase::Packaging => Self::Packaging,
            Phase::Archiving => Self::Archiving,
        }
    }
}

/// Summary of a successful run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Version the build was made under
    pub version: VersionToken,
    /// `<output_root>/<version>`
    pub output_dir: PathBuf,
    /// Compressed platform output
    pub archive_path: PathBuf,
    /// Archive size in bytes
    pub archive_size: u64,
    /// Hex-encoded SHA-256 of the archive
    pub archive_sha256: String,
    /// Every state the run entered, in order
    pub states: Vec<RunState>,
}

/// Terminal failure of a run.
///
/// Nothing is rolled back: a version bump or output directory made before
/// the failing phase stays in place.
#[derive(Debug, Error)]
#[error("{phase} failed: {error}")]
pub struct RunFailure {
    /// Phase that failed
    pub phase: Phase,
    /// Underlying cause
    #[source]
    pub error: Error,
    /// Version computed before the failure, if any
    pub version: Option<VersionToken>,
    /// Output directory, when it was derived before the failure
    pub output_dir: Option<PathBuf>,
    /// Every state the run entered, ending with `Failed`
    pub states: Vec<RunState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_names_phase() {
        let failure = RunFailure {
            phase: Phase::Packaging,
            error: Error::PackagingFailed {
                code: Some(1),
                output: Vec::new(),
            },
            version: None,
            output_dir: None,
            states: vec![RunState::Idle, RunState::Failed(Phase::Packaging)],
        };
        assert_eq!(
            failure.to_string(),
            "packaging failed: packaging failed (exit code 1)"
        );
        assert!(failure.states.last().copied().is_some_and(RunState::is_terminal));
    }
}
