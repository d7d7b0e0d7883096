//! Persisted run settings.
//!
//! Settings live in a flat JSON object (`settings.json` by default) so that a
//! project's paths only need to be typed once. The original seven keys
//! (`projectpath`, `projectname`, `uatpath`, `buildpath`, `buildconfig`,
//! `cookcommand`, `platform`) are always written; the newer ones are only
//! written when set.

use crate::error::{BuildError, CliError, Result};
use crate::runner::{
    self, BuildFlavor, BuildRunContext, BuildRunContextBuilder, DEFAULT_COOK_COMMAND,
    DEFAULT_PLATFORM, TargetArch, utils::fs::write_atomic,
};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Contents of the settings file.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    /// Folder holding the `.uproject` file
    #[serde(rename = "projectpath")]
    pub project_path: PathBuf,

    /// `.uproject` file stem
    #[serde(rename = "projectname")]
    pub project_name: String,

    /// Explicit UAT launcher
    #[serde(rename = "uatpath")]
    pub uat_path: PathBuf,

    /// Root that receives one folder per version
    #[serde(rename = "buildpath")]
    pub build_path: PathBuf,

    /// Client configuration
    #[serde(rename = "buildconfig")]
    pub build_config: BuildFlavor,

    /// UAT command, normally `BuildCookRun`
    #[serde(rename = "cookcommand")]
    pub cook_command: String,

    /// Target platform, e.g. `Win64`
    pub platform: String,

    /// Engine install root, used when no UAT path is set
    #[serde(rename = "engineroot", skip_serializing_if = "Option::is_none")]
    pub engine_root: Option<PathBuf>,

    /// Target architecture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<TargetArch>,

    /// Whether runs bump `ProjectVersion`
    #[serde(rename = "updateversion")]
    pub update_version: bool,

    /// Packaging timeout in seconds
    #[serde(rename = "timeoutsecs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            project_path: PathBuf::new(),
            project_name: String::new(),
            uat_path: PathBuf::new(),
            build_path: PathBuf::new(),
            build_config: BuildFlavor::default(),
            cook_command: DEFAULT_COOK_COMMAND.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            engine_root: None,
            architecture: None,
            update_version: true,
            timeout_secs: None,
        }
    }
}

/// Values given on the command line, each overriding its persisted value.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    /// `--project-name`
    pub project_name: Option<String>,
    /// `--project-path`
    pub project_path: Option<PathBuf>,
    /// `--engine-root`
    pub engine_root: Option<PathBuf>,
    /// `--uat-path`
    pub uat_path: Option<PathBuf>,
    /// `--build-path`
    pub build_path: Option<PathBuf>,
    /// `--build-config`
    pub build_config: Option<BuildFlavor>,
    /// `--platform`
    pub platform: Option<String>,
    /// `--architecture`
    pub architecture: Option<TargetArch>,
    /// `--cook-command`
    pub cook_command: Option<String>,
    /// `--timeout-secs`
    pub timeout_secs: Option<u64>,
    /// `--version-bump` / `--no-version-bump`
    pub update_version: Option<bool>,
}

impl PersistedSettings {
    /// Loads settings from `path`.
    ///
    /// A missing file yields the defaults. Keys absent from the file take
    /// their default values.
    ///
    /// # Errors
    ///
    /// - [`CliError::ExecutionFailed`] if the file exists but cannot be read
    /// - [`runner::Error::Settings`] if the file is not valid settings JSON
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No settings file at {}, using defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(BuildError::Cli(CliError::ExecutionFailed {
                    command: "read_settings".to_string(),
                    reason: format!("Failed to read {}: {}", path.display(), e),
                }));
            }
        };

        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
            .map_err(|e| runner::Error::Settings(format!("{e:#}")))?;

        log::info!("Imported settings from {}", path.display());
        Ok(settings)
    }

    /// Writes the settings to `path` as pretty JSON, atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        write_atomic(path, json.as_bytes())?;
        log::info!("Wrote settings to {}", path.display());
        Ok(())
    }

    /// Merges command-line values over the persisted ones.
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(name) = overrides.project_name {
            self.project_name = name;
        }
        if let Some(path) = overrides.project_path {
            self.project_path = path;
        }
        if let Some(root) = overrides.engine_root {
            self.engine_root = Some(root);
        }
        if let Some(path) = overrides.uat_path {
            self.uat_path = path;
        }
        if let Some(path) = overrides.build_path {
            self.build_path = path;
        }
        if let Some(flavor) = overrides.build_config {
            self.build_config = flavor;
        }
        if let Some(platform) = overrides.platform {
            self.platform = platform;
        }
        if let Some(arch) = overrides.architecture {
            self.architecture = Some(arch);
        }
        if let Some(command) = overrides.cook_command {
            self.cook_command = command;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = Some(secs);
        }
        if let Some(update) = overrides.update_version {
            self.update_version = update;
        }
    }

    /// Validates the settings and builds a run context.
    ///
    /// # Errors
    ///
    /// [`runner::Error::Settings`] if a required value is missing.
    pub fn to_context(&self) -> runner::Result<BuildRunContext> {
        let mut builder = BuildRunContextBuilder::new()
            .project_name(self.project_name.trim())
            .project_root(&self.project_path)
            .output_root(&self.build_path)
            .flavor(self.build_config)
            .platform(self.platform.trim())
            .architecture(self.architecture)
            .cook_command(self.cook_command.trim())
            .update_version(self.update_version)
            .packaging_timeout(self.timeout_secs.map(Duration::from_secs));

        if let Some(root) = &self.engine_root {
            builder = builder.engine_root(root);
        }
        if !self.uat_path.as_os_str().is_empty() {
            builder = builder.packager_path(&self.uat_path);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ErrorKind;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let settings = PersistedSettings::load(&temp.path().join("settings.json")).unwrap();
        assert_eq!(settings, PersistedSettings::default());
        assert_eq!(settings.cook_command, "BuildCookRun");
        assert_eq!(settings.platform, "Win64");
        assert!(settings.update_version);
    }

    #[test]
    fn reads_legacy_keys() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"projectpath": "C:/Projects/MyGame", "projectname": "MyGame",
                "uatpath": "C:/UE/Engine/Build/BatchFiles/RunUAT.bat",
                "buildpath": "D:/Builds", "buildconfig": "Shipping",
                "cookcommand": "BuildCookRun", "platform": "Win64"}"#,
        )
        .unwrap();

        let settings = PersistedSettings::load(&path).unwrap();
        assert_eq!(settings.project_name, "MyGame");
        assert_eq!(settings.build_config, BuildFlavor::Shipping);
        assert_eq!(settings.build_path, PathBuf::from("D:/Builds"));
        assert!(settings.engine_root.is_none());
        assert!(settings.update_version);
    }

    #[test]
    fn malformed_json_is_a_settings_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        match PersistedSettings::load(&path).unwrap_err() {
            BuildError::Runner(e) => assert_eq!(e.kind(), ErrorKind::Settings),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn save_then_load_keeps_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        let settings = PersistedSettings {
            project_name: "MyGame".into(),
            project_path: "/work/MyGame".into(),
            build_path: "/builds".into(),
            engine_root: Some("/opt/UE".into()),
            architecture: Some(TargetArch::Arm64),
            timeout_secs: Some(3600),
            build_config: BuildFlavor::DebugGame,
            ..Default::default()
        };

        settings.save(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["projectname"], "MyGame");
        assert_eq!(json["buildconfig"], "DebugGame");
        assert_eq!(json["uatpath"], "");

        assert_eq!(PersistedSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn overrides_take_precedence() {
        let mut settings = PersistedSettings {
            project_name: "Old".into(),
            platform: "Win64".into(),
            ..Default::default()
        };
        settings.apply_overrides(SettingsOverrides {
            project_name: Some("New".into()),
            build_config: Some(BuildFlavor::Shipping),
            update_version: Some(false),
            ..Default::default()
        });

        assert_eq!(settings.project_name, "New");
        assert_eq!(settings.platform, "Win64");
        assert_eq!(settings.build_config, BuildFlavor::Shipping);
        assert!(!settings.update_version);

        settings.apply_overrides(SettingsOverrides::default());
        assert!(!settings.update_version);

        settings.apply_overrides(SettingsOverrides {
            update_version: Some(true),
            ..Default::default()
        });
        assert!(settings.update_version);
    }

    #[test]
    fn to_context_requires_a_packager_source() {
        let settings = PersistedSettings {
            project_name: "MyGame".into(),
            project_path: "/work/MyGame".into(),
            build_path: "/builds".into(),
            ..Default::default()
        };
        assert_eq!(
            settings.to_context().unwrap_err().kind(),
            ErrorKind::Settings
        );

        let context = PersistedSettings {
            uat_path: "/opt/UE/Engine/Build/BatchFiles/RunUAT.sh".into(),
            timeout_secs: Some(60),
            ..settings
        }
        .to_context()
        .unwrap();
        assert_eq!(context.packaging_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(context.cook_command(), "BuildCookRun");
    }
}
