//! Build run orchestration.
//!
//! This module provides the [`BuildRunner`] state machine that takes one
//! [`BuildRunContext`] from version bump to finished archive.

use crate::{
    runner::{BuildRunContext, Error, utils::fs::create_dir_all},
    version::VersionToken,
};
use chrono::NaiveDate;
use std::path::PathBuf;

use super::{
    archive::{archive_file_name, create_zip_archive, platform_output_folder},
    checksum::calculate_sha256,
    lock::RunLock,
    packager::Packager,
    state::{Phase, RunFailure, RunReport, RunState},
    tool_detection::resolve_packager,
    versioning::{current_version, update_version_file},
};

/// Drives a single build run.
///
/// The runner walks `Idle → VersionUpdating → ArchivePreparing → Packaging →
/// Archiving → Succeeded`, stopping at the first failure. Each transition is
/// logged and recorded in the returned report.
///
/// Advisory locks on the project config and on the output root are held for
/// the whole run, so concurrent runs against the same project fail fast.
///
/// # Examples
///
/// ```no_run
/// use ue_build_orchestrator::runner::{BuildRunContextBuilder, BuildRunner};
///
/// # async fn example() -> anyhow::Result<()> {
/// let context = BuildRunContextBuilder::new()
///     .project_name("MyGame")
///     .project_root("C:/Projects/MyGame")
///     .engine_root("C:/Program Files/Epic Games/UE_5.4")
///     .output_root("D:/Builds")
///     .build()?;
///
/// let report = BuildRunner::new(context).run().await?;
/// println!("{} -> {}", report.version, report.archive_path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BuildRunner {
    context: BuildRunContext,
    today: NaiveDate,
    states: Vec<RunState>,
}

impl BuildRunner {
    /// Creates a runner dated with the local calendar day.
    pub fn new(context: BuildRunContext) -> Self {
        Self {
            context,
            today: chrono::Local::now().date_naive(),
            states: vec![RunState::Idle],
        }
    }

    /// Overrides the date used for version tokens.
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Returns the run context.
    pub fn context(&self) -> &BuildRunContext {
        &self.context
    }

    /// Returns the current state.
    pub fn state(&self) -> RunState {
        self.states.last().copied().unwrap_or(RunState::Idle)
    }

    /// Executes the run to a terminal state.
    ///
    /// # Errors
    ///
    /// A [`RunFailure`] naming the phase that failed. Work done by earlier
    /// phases (the version bump, the output directory) is left in place.
    pub async fn run(mut self) -> Result<RunReport, RunFailure> {
        log::info!(
            "Starting {} build of {} for {}",
            self.context.flavor(),
            self.context.project_name(),
            self.context.platform()
        );

        let config_path = self.context.config_file_path();
        let section = self.context.version_section().to_string();
        let key = self.context.version_key().to_string();

        let (version, _config_lock) = if self.context.update_version() {
            self.enter(RunState::VersionUpdating);
            let bumped = RunLock::for_config_file(&config_path).and_then(|lock| {
                update_version_file(
                    &config_path,
                    &section,
                    &key,
                    self.today,
                    self.context.flavor(),
                )
                .map(|version| (version, Some(lock)))
            });
            match bumped {
                Ok(bumped) => bumped,
                Err(error) => return Err(self.fail(Phase::VersionUpdating, error, None, None)),
            }
        } else {
            log::info!("Version bump disabled, {} is left unchanged", key);
            let version = current_version(
                &config_path,
                &section,
                &key,
                self.today,
                self.context.flavor(),
            );
            (version, None)
        };

        self.enter(RunState::ArchivePreparing);
        let output_dir = self.context.output_root().join(version.to_string());
        let _output_lock = match RunLock::for_output_root(self.context.output_root()) {
            Ok(lock) => lock,
            Err(error) => {
                return Err(self.fail(Phase::ArchivePreparing, error, Some(version), None));
            }
        };
        match create_dir_all(&output_dir).await {
            Ok(true) => log::info!("Created output directory {}", output_dir.display()),
            Ok(false) => log::info!("Reusing output directory {}", output_dir.display()),
            Err(error) => {
                return Err(self.fail(
                    Phase::ArchivePreparing,
                    error,
                    Some(version),
                    Some(output_dir),
                ));
            }
        }

        self.enter(RunState::Packaging);
        let packaged = match resolve_packager(&self.context) {
            Ok(program) => Packager::new(program, &self.context, &output_dir).run().await,
            Err(error) => Err(error),
        };
        if let Err(error) = packaged {
            return Err(self.fail(Phase::Packaging, error, Some(version), Some(output_dir)));
        }

        self.enter(RunState::Archiving);
        let platform = self.context.platform();
        let folder = output_dir.join(platform_output_folder(platform));
        let archive_path = output_dir.join(archive_file_name(
            self.context.project_name(),
            &version.to_string(),
            platform,
        ));
        let archived = match create_zip_archive(&folder, &archive_path).await {
            Ok(size) => calculate_sha256(&archive_path).await.map(|sha| (size, sha)),
            Err(error) => Err(error),
        };
        let (archive_size, archive_sha256) = match archived {
            Ok(archived) => archived,
            Err(error) => {
                return Err(self.fail(Phase::Archiving, error, Some(version), Some(output_dir)));
            }
        };

        self.enter(RunState::Succeeded);
        log::info!(
            "Build {} archived to {} ({} bytes, sha256 {})",
            version,
            archive_path.display(),
            archive_size,
            archive_sha256
        );

        Ok(RunReport {
            version,
            output_dir,
            archive_path,
            archive_size,
            archive_sha256,
            states: self.states,
        })
    }

    fn enter(&mut self, state: RunState) {
        log::debug!("{:?} -> {:?}", self.state(), state);
        self.states.push(state);
    }

    fn fail(
        &mut self,
        phase: Phase,
        error: Error,
        version: Option<VersionToken>,
        output_dir: Option<PathBuf>,
    ) -> RunFailure {
        log::error!("Build run failed during {}: {}", phase, error);
        self.enter(RunState::Failed(phase));
        RunFailure {
            phase,
            error,
            version,
            output_dir,
            states: std::mem::take(&mut self.states),
        }
    }
}
