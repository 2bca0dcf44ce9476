//! External tool detection and availability checking.
//!
//! The bundling backend shells out to `esbuild`. A project-local install
//! (`node_modules/.bin/esbuild`) is preferred over one found in `PATH`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `esbuild` from `PATH`, verified with `--version`.
///
/// Cached result to avoid repeated subprocess calls while bundling.
pub static ESBUILD: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("esbuild") {
    Ok(path) => {
        if verify(&path) {
            Some(path)
        } else {
            None
        }
    }
    Err(e) => {
        log::debug!(
            "esbuild not found in PATH: {}. Only project-local installs will be used.",
            e
        );
        None
    }
});

/// Runs `<path> --version` and reports whether it behaved like esbuild.
fn verify(path: &Path) -> bool {
    match std::process::Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            log::info!("✓ esbuild available: {}", version.trim());
            true
        }
        Ok(output) => {
            log::warn!(
                "esbuild found at {} but --version check failed (exit code: {:?}). \
                     Stderr: {}",
                path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            );
            false
        }
        Err(e) => {
            log::warn!(
                "esbuild found at {} but failed to execute: {}. \
                     Check file permissions.",
                path.display(),
                e
            );
            false
        }
    }
}

/// Project-local esbuild binary under `cwd`, if installed.
pub fn local_esbuild(cwd: &Path) -> Option<PathBuf> {
    let name = if cfg!(windows) { "esbuild.cmd" } else { "esbuild" };
    let candidate = cwd.join("node_modules").join(".bin").join(name);
    candidate.is_file().then_some(candidate)
}

/// Resolves the esbuild executable for a project rooted at `cwd`.
pub fn find_esbuild(cwd: &Path) -> Option<PathBuf> {
    local_esbuild(cwd).or_else(|| ESBUILD.clone())
}
