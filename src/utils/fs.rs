//! File system utilities for the bundling pipeline.
//!
//! Provides idempotent directory removal, writes that create parent
//! directories, and path resolution against a project root.

use std::{
    io::{self},
    path::{Path, PathBuf},
};

use path_absolutize::Absolutize;
use tokio::fs;

/// Returns whether `path` exists. Permission errors count as absent.
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Resolves `path` against `cwd` into a normalized absolute path.
///
/// Absolute inputs are only normalized.
pub fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    match path.absolutize_from(cwd) {
        Ok(resolved) => resolved.into_owned(),
        Err(e) => {
            log::debug!("Failed to normalize {}: {}", path.display(), e);
            cwd.join(path)
        }
    }
}

/// Normalizes `path` against the process working directory.
pub fn absolute(path: &Path) -> PathBuf {
    match path.absolutize() {
        Ok(resolved) => resolved.into_owned(),
        Err(e) => {
            log::debug!("Failed to absolutize {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e),
    }
}

/// Writes `contents` to `path`, creating any parent directories as needed.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, contents).await
}
