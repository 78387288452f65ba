//! Single-instance lock file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::AppError;

pub const LOCK_FILE_NAME: &str = "groundsync.lock";

/// Exclusive lock held for the lifetime of the application.
///
/// The file is created atomically and holds the owner's process id. It is
/// removed on drop.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    pub fn acquire(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(AppError::AlreadyRunning {
                    lock_path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(AppError::Runtime(e)),
        };
        writeln!(file, "{}", std::process::id())?;

        tracing::debug!(path = %path.display(), "Instance lock acquired");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        let first = InstanceLock::acquire(&path).unwrap();
        assert!(matches!(
            InstanceLock::acquire(&path),
            Err(AppError::AlreadyRunning { .. })
        ));
        drop(first);

        assert!(!path.exists());
        assert!(InstanceLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_lock_records_pid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(LOCK_FILE_NAME);
        let lock = InstanceLock::acquire(&path).unwrap();

        let contents = fs::read_to_string(lock.path()).unwrap();
        assert_eq!(contents.trim(), std::process::id().to_string());
    }
}
