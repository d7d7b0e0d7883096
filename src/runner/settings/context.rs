//! BuildRunContext struct and accessors.

use super::{BuildFlavor, TargetArch};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Section of `DefaultGame.ini` holding the project version.
pub const DEFAULT_VERSION_SECTION: &str = "/Script/EngineSettings.GeneralProjectSettings";

/// Key of the project version entry.
pub const DEFAULT_VERSION_KEY: &str = "ProjectVersion";

/// Everything one build run needs to know.
///
/// Immutable once built; construct it with [`BuildRunContextBuilder`].
///
/// # Examples
///
/// ```
/// use ue_build_orchestrator::runner::{BuildFlavor, BuildRunContextBuilder};
///
/// # fn example() -> ue_build_orchestrator::runner::Result<()> {
/// let context = BuildRunContextBuilder::new()
///     .project_name("MyGame")
///     .project_root("/projects/MyGame")
///     .engine_root("/opt/UE_5.4")
///     .output_root("/builds/MyGame")
///     .flavor(BuildFlavor::Shipping)
///     .platform("Linux")
///     .build()?;
///
/// assert!(context.uproject_path().ends_with("MyGame.uproject"));
/// # Ok(())
/// # }
/// ```
///
/// [`BuildRunContextBuilder`]: super::BuildRunContextBuilder
#[derive(Clone, Debug)]
pub struct BuildRunContext {
    /// `.uproject` file stem.
    project_name: String,

    /// Folder holding the `.uproject` file.
    project_root: PathBuf,

    /// Engine install root (folder containing `Engine/`).
    engine_root: Option<PathBuf>,

    /// Explicit packager executable, overrides the engine root lookup.
    packager_path: Option<PathBuf>,

    /// Folder receiving one subfolder per version.
    output_root: PathBuf,

    flavor: BuildFlavor,
    platform: String,
    architecture: Option<TargetArch>,

    /// UAT command, normally `BuildCookRun`.
    cook_command: String,

    /// Whether the version entry is advanced and persisted.
    update_version: bool,

    /// Kill the packager after this long; `None` waits forever.
    packaging_timeout: Option<Duration>,

    version_section: String,
    version_key: String,
}

impl BuildRunContext {
    /// Returns the project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the engine install root, if configured.
    pub fn engine_root(&self) -> Option<&Path> {
        self.engine_root.as_deref()
    }

    /// Returns the explicit packager path, if configured.
    pub fn packager_path(&self) -> Option<&Path> {
        self.packager_path.as_deref()
    }

    /// Returns the output root.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Returns the build flavor.
    pub fn flavor(&self) -> BuildFlavor {
        self.flavor
    }

    /// Returns the target platform (e.g. `Win64`).
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Returns the target architecture, if any.
    pub fn architecture(&self) -> Option<TargetArch> {
        self.architecture
    }

    /// Returns the UAT cook command.
    pub fn cook_command(&self) -> &str {
        &self.cook_command
    }

    /// Returns whether the version entry is mutated by this run.
    pub fn update_version(&self) -> bool {
        self.update_version
    }

    /// Returns the packaging timeout.
    pub fn packaging_timeout(&self) -> Option<Duration> {
        self.packaging_timeout
    }

    /// Returns the configuration section holding the version.
    pub fn version_section(&self) -> &str {
        &self.version_section
    }

    /// Returns the version key.
    pub fn version_key(&self) -> &str {
        &self.version_key
    }

    /// Full path of `<project_root>/<project_name>.uproject`.
    pub fn uproject_path(&self) -> PathBuf {
        self.project_root
            .join(format!("{}.uproject", self.project_name))
    }

    /// Full path of the project's `Config/DefaultGame.ini`.
    pub fn config_file_path(&self) -> PathBuf {
        self.project_root.join("Config").join("DefaultGame.ini")
    }

    /// Creates a new context (used by BuildRunContextBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        project_name: String,
        project_root: PathBuf,
        engine_root: Option<PathBuf>,
        packager_path: Option<PathBuf>,
        output_root: PathBuf,
        flavor: BuildFlavor,
        platform: String,
        architecture: Option<TargetArch>,
        cook_command: String,
        update_version: bool,
        packaging_timeout: Option<Duration>,
        version_section: String,
        version_key: String,
    ) -> Self {
        Self {
            project_name,
            project_root,
            engine_root,
            packager_path,
            output_root,
            flavor,
            platform,
            architecture,
            cook_command,
            update_version,
            packaging_timeout,
            version_section,
            version_key,
        }
    }
}
