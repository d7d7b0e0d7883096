//! Builder for constructing BuildRunContext.

use super::{
    BuildFlavor, BuildRunContext, TargetArch,
    context::{DEFAULT_VERSION_KEY, DEFAULT_VERSION_SECTION},
};
use crate::runner::{Error, Result};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// UAT command used when none is configured.
pub const DEFAULT_COOK_COMMAND: &str = "BuildCookRun";

/// Platform used when none is configured.
pub const DEFAULT_PLATFORM: &str = "Win64";

/// Builder for constructing [`BuildRunContext`].
///
/// Required: project name, project root, output root, and either an engine
/// root or an explicit packager path. Everything else has a default.
#[derive(Debug, Default)]
pub struct BuildRunContextBuilder {
    project_name: Option<String>,
    project_root: Option<PathBuf>,
    engine_root: Option<PathBuf>,
    packager_path: Option<PathBuf>,
    output_root: Option<PathBuf>,
    flavor: BuildFlavor,
    platform: Option<String>,
    architecture: Option<TargetArch>,
    cook_command: Option<String>,
    skip_version_update: bool,
    packaging_timeout: Option<Duration>,
    version_section: Option<String>,
    version_key: Option<String>,
}

impl BuildRunContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the `.uproject` file stem.
    ///
    /// # Required
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Sets the folder holding the `.uproject` file.
    ///
    /// # Required
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the engine install root.
    pub fn engine_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.engine_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets an explicit packager executable (e.g. a `RunUAT.bat` path).
    pub fn packager_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.packager_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the folder that receives one subfolder per version.
    ///
    /// # Required
    pub fn output_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the build flavor.
    ///
    /// Default: [`BuildFlavor::Development`]
    pub fn flavor(mut self, flavor: BuildFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Sets the target platform.
    ///
    /// Default: `Win64`
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Sets the target architecture.
    pub fn architecture(mut self, architecture: Option<TargetArch>) -> Self {
        self.architecture = architecture;
        self
    }

    /// Sets the UAT cook command.
    ///
    /// Default: `BuildCookRun`
    pub fn cook_command(mut self, command: impl Into<String>) -> Self {
        self.cook_command = Some(command.into());
        self
    }

    /// Enables or disables mutation of the version file.
    ///
    /// Default: enabled
    pub fn update_version(mut self, enabled: bool) -> Self {
        self.skip_version_update = !enabled;
        self
    }

    /// Sets the packaging timeout.
    ///
    /// Default: none (wait for the packager indefinitely)
    pub fn packaging_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.packaging_timeout = timeout;
        self
    }

    /// Overrides the section and key holding the version.
    ///
    /// Default: `[/Script/EngineSettings.GeneralProjectSettings]` / `ProjectVersion`
    pub fn version_entry(mut self, section: impl Into<String>, key: impl Into<String>) -> Self {
        self.version_section = Some(section.into());
        self.version_key = Some(key.into());
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] if a required value is missing or empty, or
    /// if neither an engine root nor a packager path was given.
    pub fn build(self) -> Result<BuildRunContext> {
        let project_name = self
            .project_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::Settings("project name is required".into()))?;
        let project_root = non_empty_path(self.project_root)
            .ok_or_else(|| Error::Settings("project path is required".into()))?;
        let output_root = non_empty_path(self.output_root)
            .ok_or_else(|| Error::Settings("build output path is required".into()))?;

        let engine_root = non_empty_path(self.engine_root);
        let packager_path = non_empty_path(self.packager_path);
        if engine_root.is_none() && packager_path.is_none() {
            return Err(Error::Settings(
                "either an engine root or a UAT path is required".into(),
            ));
        }

        if self.packaging_timeout == Some(Duration::ZERO) {
            return Err(Error::Settings("packaging timeout must be positive".into()));
        }

        Ok(BuildRunContext::new(
            project_name,
            project_root,
            engine_root,
            packager_path,
            output_root,
            self.flavor,
            self.platform
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            self.architecture,
            self.cook_command
                .unwrap_or_else(|| DEFAULT_COOK_COMMAND.to_string()),
            !self.skip_version_update,
            self.packaging_timeout,
            self.version_section
                .unwrap_or_else(|| DEFAULT_VERSION_SECTION.to_string()),
            self.version_key
                .unwrap_or_else(|| DEFAULT_VERSION_KEY.to_string()),
        ))
    }
}

fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}
