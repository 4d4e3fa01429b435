// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem marker ensuring one catalog refresh at a time.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anitrack_core::AnitrackError;
use tracing::{debug, warn};

/// Held while a refresh runs. Dropping it removes the marker.
#[derive(Debug)]
pub struct RefreshLock {
    path: PathBuf,
}

impl RefreshLock {
    /// Create the marker, or return `None` when it already exists.
    pub fn acquire(path: &Path) -> Result<Option<Self>, AnitrackError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                write!(file, "running pid={}", std::process::id())?;
                debug!(path = %path.display(), "refresh lock taken");
                Ok(Some(Self {
                    path: path.to_path_buf(),
                }))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for RefreshLock {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "refresh lock released"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove refresh lock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("refresh.lock");

        let first = RefreshLock::acquire(&path).unwrap();
        assert!(first.is_some());
        assert!(path.exists());
        assert!(RefreshLock::acquire(&path).unwrap().is_none());

        drop(first);
        assert!(!path.exists());
        assert!(RefreshLock::acquire(&path).unwrap().is_some());
    }
}
