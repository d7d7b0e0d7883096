//! File system utilities for build runs.
//!
//! Provides idempotent directory creation and all-or-nothing file writes
//! with error mapping onto the run's error kinds.

use crate::runner::error::{Error, Result};
use std::{
    io::{self, Write},
    path::Path,
};
use tokio::fs;

/// Creates the given directory and any missing parents.
///
/// An already existing directory is not an error. Returns `true` when the
/// directory was newly created and `false` when it was reused.
pub async fn create_dir_all(path: &Path) -> Result<bool> {
    if fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Ok(false);
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    match fs::create_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(source) => Err(Error::DirectoryCreateFailure {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `contents` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over `path`, so readers see either the old or the new file.
/// Existing permissions are carried over.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_failure = |source: io::Error| Error::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_failure)?;
    temp.write_all(contents).map_err(write_failure)?;
    temp.flush().map_err(write_failure)?;

    if let Ok(metadata) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_failure)?;
    }

    temp.as_file().sync_all().map_err(write_failure)?;
    temp.persist(path).map_err(|e| write_failure(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ErrorKind;

    #[tokio::test]
    async fn create_dir_all_reports_reuse() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("040125_dev_001");

        assert!(create_dir_all(&dir).await.unwrap());
        assert!(!create_dir_all(&dir).await.unwrap());
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn create_dir_all_fails_under_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let err = create_dir_all(&file.join("child")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryCreateFailure);
    }

    #[test]
    fn write_atomic_replaces_contents() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("DefaultGame.ini");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        let leftovers = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn write_atomic_into_missing_directory_fails() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing").join("DefaultGame.ini");

        let err = write_atomic(&path, b"data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteFailure);
    }
}
