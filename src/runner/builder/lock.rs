//! Advisory run locks.
//!
//! Two runs must not bump the same configuration file or fill the same
//! output directory at once. Each run holds an exclusive lock on the config
//! file and on the output root until it finishes. Contention fails fast with
//! [`Error::RunLocked`] rather than waiting.
//!
//! On Unix the locks are `flock(2)` locks; elsewhere they are the platform's
//! exclusive file lock (`LockFileEx` on Windows). Either way the operating
//! system releases them when the process exits, even after a crash, so a
//! leftover lock file never blocks later runs. Lock files themselves are left
//! in place: removing one while another process waits to open it would let
//! two runs lock different files at the same path.

use crate::runner::{
    Error, Result,
    error::ErrorExt,
};
use sha2::{Digest, Sha256};
use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

/// Lock file name placed in the output root.
pub const OUTPUT_LOCK_FILE: &str = ".build.lock";

/// An exclusive advisory lock, released on drop.
pub struct RunLock {
    path: PathBuf,
    #[cfg(unix)]
    _guard: nix::fcntl::Flock<File>,
    #[cfg(not(unix))]
    _file: File,
}

impl std::fmt::Debug for RunLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLock").field("path", &self.path).finish()
    }
}

impl RunLock {
    /// Acquires the lock file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`Error::RunLocked`] if another holder has it.
    #[cfg(unix)]
    pub fn acquire(path: &Path) -> Result<Self> {
        use nix::{
            errno::Errno,
            fcntl::{Flock, FlockArg},
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .fs_context("opening lock file", path)?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(guard) => {
                log::debug!("Acquired lock {}", path.display());
                Ok(Self {
                    path: path.to_path_buf(),
                    _guard: guard,
                })
            }
            Err((_, errno)) if errno == Errno::EWOULDBLOCK => Err(Error::RunLocked {
                path: path.to_path_buf(),
            }),
            Err((_, errno)) => Err(Error::Fs {
                context: "locking",
                path: path.to_path_buf(),
                source: std::io::Error::from(errno),
            }),
        }
    }

    /// Acquires the lock file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`Error::RunLocked`] if another holder has it.
    #[cfg(not(unix))]
    pub fn acquire(path: &Path) -> Result<Self> {
        use std::fs::TryLockError;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .fs_context("opening lock file", path)?;

        match file.try_lock() {
            Ok(()) => {
                log::debug!("Acquired lock {}", path.display());
                Ok(Self {
                    path: path.to_path_buf(),
                    _file: file,
                })
            }
            Err(TryLockError::WouldBlock) => Err(Error::RunLocked {
                path: path.to_path_buf(),
            }),
            Err(TryLockError::Error(source)) => Err(Error::Fs {
                context: "locking",
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Locks a configuration file.
    ///
    /// The lock file lives in the system temp directory, named after a hash
    /// of the config file's canonical path, so nothing is added to the
    /// project tree. One such file stays behind per project and is reused by
    /// every later run.
    pub fn for_config_file(config: &Path) -> Result<Self> {
        let canonical = config
            .canonicalize()
            .unwrap_or_else(|_| config.to_path_buf());
        let digest = Sha256::digest(canonical.to_string_lossy().as_bytes());
        let name = format!("ue_build-{}.lock", &hex::encode(digest)[..16]);
        Self::acquire(&std::env::temp_dir().join(name))
    }

    /// Locks an output root, creating the root if it does not exist.
    pub fn for_output_root(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|source| Error::DirectoryCreateFailure {
            path: root.to_path_buf(),
            source,
        })?;
        Self::acquire(&root.join(OUTPUT_LOCK_FILE))
    }

    /// Returns the lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
