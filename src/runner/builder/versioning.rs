//! Reading and bumping the project version entry.

use crate::{
    ini::ConfigDocument,
    runner::{BuildFlavor, Result},
    version::{VersionToken, compute_next},
};
use chrono::NaiveDate;
use std::path::Path;

/// Bumps the version entry in `config_path` and returns the new token.
///
/// The entry (and its section) is created when missing; every other line of
/// the file is written back unchanged.
///
/// # Errors
///
/// - [`crate::runner::Error::ConfigNotFound`] / `ConfigRead` if the file cannot be loaded
/// - [`crate::runner::Error::MalformedVersionToken`] for an unparseable stored value
/// - [`crate::runner::Error::WriteFailure`] if persisting fails
pub fn update_version_file(
    config_path: &Path,
    section: &str,
    key: &str,
    today: NaiveDate,
    flavor: BuildFlavor,
) -> Result<VersionToken> {
    let mut document = ConfigDocument::parse(config_path)?;
    let previous = stored_version(&document, section, key);
    let next = compute_next(previous.as_deref(), today, flavor)?;

    document.add_entry(section, key, &next.to_string());
    document.write(config_path)?;

    log::info!(
        "{} {} -> {}",
        key,
        previous.as_deref().unwrap_or("<unset>"),
        next
    );
    Ok(next)
}

/// Token for a run that must not touch the config file.
///
/// The stored version is reused when it is well-formed; otherwise the token
/// the next bump would produce is returned without persisting it. A config
/// file that is missing or unreadable counts as having no stored version.
pub fn current_version(
    config_path: &Path,
    section: &str,
    key: &str,
    today: NaiveDate,
    flavor: BuildFlavor,
) -> VersionToken {
    match ConfigDocument::parse(config_path) {
        Ok(document) => {
            if let Some(stored) = stored_version(&document, section, key) {
                match VersionToken::parse(stored.trim()) {
                    Ok(token) => return token,
                    Err(e) => log::warn!("Ignoring stored {}: {}", key, e),
                }
            }
        }
        Err(e) => log::warn!("No stored {} available: {}", key, e),
    }

    VersionToken::first_of_day(today, flavor)
}

fn stored_version(document: &ConfigDocument, section: &str, key: &str) -> Option<String> {
    document
        .has_entry(section, key)
        .then(|| document.get_entry(section, key))
        .filter(|value| !value.trim().is_empty())
}
