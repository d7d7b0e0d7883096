//! Command line argument parsing and validation.
//!
//! Every value can also come from the settings file; command-line values
//! take precedence for the current run and are persisted with
//! `--save-settings`.

use crate::{
    error::CliError,
    gateway::{DEFAULT_SETTINGS_FILE, SettingsOverrides},
    runner::{BuildFlavor, TargetArch},
};
use clap::Parser;
use std::path::PathBuf;

/// Unreal Engine build orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "ue_build",
    version,
    about = "Bump an Unreal project's version, package it with UAT and archive the result",
    long_about = "Bumps ProjectVersion in Config/DefaultGame.ini (MMDDYY_flavor_NNN), runs
the Unreal Automation Tool BuildCookRun into <build path>/<version> and zips the
packaged platform folder.

Settings are read from settings.json in the working directory; flags override them.

Usage:
  ue_build
  ue_build --project-name MyGame --project-path C:/Projects/MyGame --engine-root \"C:/Program Files/Epic Games/UE_5.4\" --build-path D:/Builds --save-settings
  ue_build --build-config shipping --platform Win64
  ue_build --uat-path /opt/UE/Engine/Build/BatchFiles/RunUAT.sh --update-settings-only

Exit code 0 = build packaged and archived."
)]
pub struct Args {
    /// Name of the .uproject file, without extension
    #[arg(long, value_name = "NAME")]
    pub project_name: Option<String>,

    /// Folder holding the .uproject file
    #[arg(long, value_name = "PATH")]
    pub project_path: Option<PathBuf>,

    /// Engine install root (RunUAT is looked up under Engine/Build/BatchFiles)
    #[arg(long, value_name = "PATH")]
    pub engine_root: Option<PathBuf>,

    /// Explicit RunUAT launcher, overrides --engine-root
    #[arg(long, value_name = "PATH")]
    pub uat_path: Option<PathBuf>,

    /// Root folder that receives one folder per version
    #[arg(long, value_name = "PATH")]
    pub build_path: Option<PathBuf>,

    /// Client configuration: dev, debuggame or shipping
    #[arg(long, value_name = "CONFIG")]
    pub build_config: Option<BuildFlavor>,

    /// Target platform (Win64, Linux, Mac, ...)
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Target architecture: x64 or arm64
    #[arg(long, value_name = "ARCH")]
    pub architecture: Option<TargetArch>,

    /// UAT command to run
    #[arg(long, value_name = "COMMAND")]
    pub cook_command: Option<String>,

    /// Kill the packager after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Leave ProjectVersion untouched (persisted with --save-settings)
    #[arg(long, conflicts_with = "version_bump")]
    pub no_version_bump: bool,

    /// Bump ProjectVersion even if the settings file disables it
    #[arg(long)]
    pub version_bump: bool,

    /// Save the effective settings before building
    #[arg(long)]
    pub save_settings: bool,

    /// Save the effective settings and exit without building
    #[arg(long)]
    pub update_settings_only: bool,

    /// Settings file to read and write
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings_file: PathBuf,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print extra detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        let invalid = |reason: String| Err(CliError::InvalidArguments { reason });

        if self.timeout_secs == Some(0) {
            return invalid("--timeout-secs must be greater than zero".to_string());
        }

        if self.settings_file.as_os_str().is_empty() {
            return invalid("--settings-file cannot be empty".to_string());
        }

        for (flag, value) in [
            ("--project-name", &self.project_name),
            ("--platform", &self.platform),
            ("--cook-command", &self.cook_command),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return invalid(format!("{flag} cannot be empty"));
            }
        }

        Ok(())
    }

    /// Values to merge over the persisted settings.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            project_name: self.project_name.clone(),
            project_path: self.project_path.clone(),
            engine_root: self.engine_root.clone(),
            uat_path: self.uat_path.clone(),
            build_path: self.build_path.clone(),
            build_config: self.build_config,
            platform: self.platform.clone(),
            architecture: self.architecture,
            cook_command: self.cook_command.clone(),
            timeout_secs: self.timeout_secs,
            update_version: match (self.version_bump, self.no_version_bump) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
