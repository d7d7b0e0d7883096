//! The build command.

use crate::{
    cli::RuntimeConfig,
    error::Result,
    gateway::PersistedSettings,
    runner::BuildRunner,
};

/// Runs one build with `settings` and reports the outcome.
pub async fn run_build(settings: &PersistedSettings, config: &RuntimeConfig) -> Result<()> {
    let context = settings.to_context()?;

    config.section(&format!(
        "Building {} ({}, {})",
        context.project_name(),
        context.flavor(),
        context.platform()
    ))?;
    config.verbose_println(&format!("Project: {}", context.uproject_path().display()))?;
    config.verbose_println(&format!("Output root: {}", context.output_root().display()))?;
    if !context.update_version() {
        config.warn("Version bump disabled, ProjectVersion stays as is")?;
    }
    config.progress("Updating version, packaging and archiving...")?;

    let report = BuildRunner::new(context).run().await?;

    config.success(&format!("Build {} packaged", report.version))?;
    config.indent(&format!("Output:  {}", report.output_dir.display()))?;
    config.indent(&format!(
        "Archive: {} ({} bytes)",
        report.archive_path.display(),
        report.archive_size
    ))?;
    config.indent(&format!("SHA256:  {}", report.archive_sha256))?;
    Ok(())
}
