//! Packaging tool location.
//!
//! Resolves the Unreal Automation Tool entry point from either an explicit
//! path or the engine install root.

use crate::runner::{BuildRunContext, Error, Result};
use std::path::{Path, PathBuf};

/// UAT launcher script for the host platform.
#[cfg(windows)]
pub const RUN_UAT_SCRIPT: &str = "RunUAT.bat";

/// UAT launcher script for the host platform.
#[cfg(not(windows))]
pub const RUN_UAT_SCRIPT: &str = "RunUAT.sh";

/// Location of the launcher relative to the engine root.
pub fn run_uat_path(engine_root: &Path) -> PathBuf {
    engine_root
        .join("Engine")
        .join("Build")
        .join("BatchFiles")
        .join(RUN_UAT_SCRIPT)
}

/// Resolves the executable to invoke for packaging.
///
/// An explicit packager path wins. A bare program name (no directory part)
/// is looked up on `PATH`; anything else must exist on disk. Without an
/// explicit path the launcher under the engine root is used.
///
/// # Errors
///
/// [`Error::PackagerNotFound`] if nothing usable exists.
pub fn resolve_packager(context: &BuildRunContext) -> Result<PathBuf> {
    if let Some(explicit) = context.packager_path() {
        let is_bare_name = explicit.components().count() == 1 && !explicit.is_absolute();
        if is_bare_name {
            return match which::which(explicit) {
                Ok(path) => {
                    log::debug!("Found {} at: {}", explicit.display(), path.display());
                    Ok(path)
                }
                Err(e) => Err(Error::PackagerNotFound {
                    reason: format!("{} is not on PATH: {}", explicit.display(), e),
                }),
            };
        }

        return if explicit.is_file() {
            Ok(explicit.to_path_buf())
        } else {
            Err(Error::PackagerNotFound {
                reason: format!("{} does not exist", explicit.display()),
            })
        };
    }

    let engine_root = context.engine_root().ok_or_else(|| Error::PackagerNotFound {
        reason: "neither a UAT path nor an engine root is configured".to_string(),
    })?;
    let launcher = run_uat_path(engine_root);
    if launcher.is_file() {
        log::debug!("Using UAT launcher: {}", launcher.display());
        Ok(launcher)
    } else {
        Err(Error::PackagerNotFound {
            reason: format!(
                "{} not found under engine root {}",
                RUN_UAT_SCRIPT,
                engine_root.display()
            ),
        })
    }
}
