//! Compression of the packaged platform folder.
//!
//! UAT stages the archived build under `<archive dir>/<platform folder>`,
//! where the folder name is the engine's display name for the platform
//! (`Win64` builds land in `Windows`). That folder is zipped next to it.

use crate::runner::{Error, Result};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Folder UAT archives a platform's build into.
pub fn platform_output_folder(platform: &str) -> &str {
    match platform {
        "Win64" => "Windows",
        "Linux" => "Linux",
        "Mac" => "Mac",
        other => other,
    }
}

/// Archive file name: `<project>_<version>_<platform>.zip`.
pub fn archive_file_name(project: &str, version: &str, platform: &str) -> String {
    format!("{project}_{version}_{platform}.zip")
}

/// Zips `source_dir` into `archive_path` and returns the archive size.
///
/// Entry names are prefixed with the folder's own name so that extracting
/// the archive recreates the folder. Runs on the blocking pool.
///
/// # Errors
///
/// [`Error::ArchiveFailure`] if `source_dir` is not a directory or anything
/// goes wrong while walking or writing. A partially written archive is
/// removed.
pub async fn create_zip_archive(source_dir: &Path, archive_path: &Path) -> Result<u64> {
    if !tokio::fs::metadata(source_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(Error::ArchiveFailure {
            path: source_dir.to_path_buf(),
            reason: "packaged platform folder does not exist".to_string(),
        });
    }

    let source = source_dir.to_path_buf();
    let target = archive_path.to_path_buf();
    let joined = tokio::task::spawn_blocking(move || write_zip(&source, &target)).await;

    let result = match joined {
        Ok(result) => result.map_err(|e| Error::ArchiveFailure {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        }),
        Err(e) => Err(Error::ArchiveFailure {
            path: archive_path.to_path_buf(),
            reason: format!("archive task failed: {e}"),
        }),
    };

    if result.is_err() {
        let _ = tokio::fs::remove_file(archive_path).await;
    }
    result
}

fn write_zip(source_dir: &Path, archive_path: &Path) -> io::Result<u64> {
    let root_name = source_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = source_dir.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);

    let mut files = 0usize;
    for entry in WalkDir::new(source_dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        let name = entry_name(&base, entry.path(), &root_name);

        if entry.file_type().is_dir() {
            zip.add_directory(name, options).map_err(io::Error::other)?;
        } else if entry.file_type().is_file() {
            let options = match unix_mode(entry.path()) {
                Some(mode) => options.unix_permissions(mode),
                None => options,
            };
            zip.start_file(name, options).map_err(io::Error::other)?;
            io::copy(&mut File::open(entry.path())?, &mut zip)?;
            files += 1;
        }
    }

    let file = zip.finish().map_err(io::Error::other)?;
    let size = file.metadata()?.len();
    log::debug!(
        "Archived {} files from {} into {} ({} bytes)",
        files,
        source_dir.display(),
        archive_path.display(),
        size
    );
    Ok(size)
}

/// Zip entry name with forward slashes, rooted at the archived folder.
fn entry_name(base: &Path, path: &Path, root_name: &str) -> String {
    let relative: PathBuf = path
        .strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| PathBuf::from(root_name));
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn unix_mode(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).ok().map(|m| m.permissions().mode())
}

#[cfg(not(unix))]
fn unix_mode(_path: &Path) -> Option<u32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ErrorKind;
    use std::io::Read;

    #[test]
    fn platform_folder_names() {
        assert_eq!(platform_output_folder("Win64"), "Windows");
        assert_eq!(platform_output_folder("Linux"), "Linux");
        assert_eq!(platform_output_folder("Mac"), "Mac");
        assert_eq!(platform_output_folder("Android"), "Android");
    }

    #[test]
    fn archive_name_joins_parts() {
        assert_eq!(
            archive_file_name("MyGame", "040125_dev_004", "Win64"),
            "MyGame_040125_dev_004_Win64.zip"
        );
    }

    #[tokio::test]
    async fn zips_folder_with_its_name_as_root() {
        let temp = tempfile::tempdir().unwrap();
        let folder = temp.path().join("Windows");
        std::fs::create_dir_all(folder.join("MyGame/Binaries")).unwrap();
        std::fs::write(folder.join("MyGame/Binaries/MyGame.exe"), b"binary").unwrap();
        std::fs::write(folder.join("Manifest.txt"), b"manifest").unwrap();

        let archive = temp.path().join("out.zip");
        let size = create_zip_archive(&folder, &archive).await.unwrap();
        assert_eq!(size, std::fs::metadata(&archive).unwrap().len());

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();
        assert!(names.iter().any(|n| n == "Windows/Manifest.txt"));
        assert!(names.iter().any(|n| n == "Windows/MyGame/Binaries/MyGame.exe"));

        let mut contents = String::new();
        zip.by_name("Windows/MyGame/Binaries/MyGame.exe")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "binary");
    }

    #[tokio::test]
    async fn missing_folder_is_archive_failure() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("out.zip");
        let err = create_zip_archive(&temp.path().join("Windows"), &archive)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveFailure);
        assert!(!archive.exists());
    }
}
