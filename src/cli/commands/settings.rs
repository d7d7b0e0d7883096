//! Settings resolution and persistence.

use crate::{
    cli::{Args, RuntimeConfig},
    error::Result,
    gateway::PersistedSettings,
};
use std::path::Path;

/// Loads the settings file and applies the command-line overrides.
pub fn resolve_settings(args: &Args) -> Result<PersistedSettings> {
    let mut settings = PersistedSettings::load(&args.settings_file)?;
    settings.apply_overrides(args.overrides());
    log::debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

/// Writes `settings` to `path` and reports it.
pub fn save_settings(
    settings: &PersistedSettings,
    path: &Path,
    config: &RuntimeConfig,
) -> Result<()> {
    settings.save(path)?;
    config.success(&format!("Saved settings to {}", path.display()))?;
    Ok(())
}
