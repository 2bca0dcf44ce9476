//! `esbuild` command-line backend.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;
use walkdir::WalkDir;

use super::backend::{BundleAsset, BundleBackend, BundleFailure, BundleOptions, BundleOutput};
use super::tool_detection::find_esbuild;

/// Shims `require` for CommonJS dependencies inside an ES module bundle.
const REQUIRE_BANNER: &str =
    "import { createRequire } from 'node:module';const require = createRequire(import.meta.url);";

const OUT_FILE: &str = "out.js";
const OUT_MAP: &str = "out.js.map";

/// Bundles entries by running the `esbuild` CLI.
///
/// Each call writes into its own directory under a scratch [`TempDir`] that
/// lives until [`dispose`](BundleBackend::dispose) or drop.
#[derive(Debug)]
pub struct EsbuildBackend {
    project_root: PathBuf,
    scratch: Mutex<Option<TempDir>>,
    runs: AtomicUsize,
}

impl EsbuildBackend {
    /// Creates a backend for the project at `project_root`, preferring its
    /// `node_modules/.bin/esbuild` over one in `PATH`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            scratch: Mutex::new(None),
            runs: AtomicUsize::new(0),
        }
    }

    /// Fresh output directory for one bundling run.
    fn run_dir(&self) -> Result<PathBuf, BundleFailure> {
        let mut scratch = self
            .scratch
            .lock()
            .map_err(|_| std::io::Error::other("scratch directory lock poisoned"))?;

        let root = match scratch.as_ref() {
            Some(dir) => dir.path().to_path_buf(),
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("kodegen-esbuild-")
                    .tempdir()?;
                let path = dir.path().to_path_buf();
                *scratch = Some(dir);
                path
            }
        };

        let run = self.runs.fetch_add(1, Ordering::Relaxed);
        Ok(root.join(run.to_string()))
    }

    fn arguments(entry: &Path, outfile: &Path, options: &BundleOptions) -> Vec<String> {
        let mut args = vec![
            entry.display().to_string(),
            "--bundle".to_string(),
            "--platform=node".to_string(),
            "--format=esm".to_string(),
            format!("--target={}", options.target),
            format!("--outfile={}", outfile.display()),
            format!("--banner:js={REQUIRE_BANNER}"),
            format!(
                "--log-level={}",
                if options.quiet { "error" } else { "warning" }
            ),
        ];
        if options.minify {
            args.push("--minify".to_string());
        }
        if options.source_map {
            args.push("--sourcemap=external".to_string());
        }
        for external in &options.externals {
            args.push(format!("--external:{external}"));
        }
        args
    }
}

impl Default for EsbuildBackend {
    fn default() -> Self {
        Self::new(".")
    }
}

/// First error diagnostic in esbuild's stderr.
fn first_diagnostic(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines
        .iter()
        .find(|line| line.contains("[ERROR]"))
        .or(lines.first())
        .map(|line| line.trim_start_matches(['✘', ' ']).to_string())
}

/// Reads every file under `dir` except the bundle and its map.
fn collect_assets(dir: &Path) -> std::io::Result<Vec<BundleAsset>> {
    let mut assets = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(std::io::Error::other)?
            .to_path_buf();
        if relative == Path::new(OUT_FILE) || relative == Path::new(OUT_MAP) {
            continue;
        }
        assets.push(BundleAsset {
            contents: std::fs::read(entry.path())?,
            path: relative,
        });
    }
    Ok(assets)
}

impl BundleBackend for EsbuildBackend {
    async fn bundle(
        &self,
        entry: &Path,
        options: &BundleOptions,
    ) -> Result<BundleOutput, BundleFailure> {
        let esbuild =
            find_esbuild(&self.project_root).ok_or(BundleFailure::ToolMissing { tool: "esbuild" })?;

        let out_dir = self.run_dir()?;
        tokio::fs::create_dir_all(&out_dir).await?;
        let outfile = out_dir.join(OUT_FILE);

        log::debug!(
            "Running {} for {} (target {}, minify {})",
            esbuild.display(),
            entry.display(),
            options.target,
            options.minify
        );

        let output = tokio::process::Command::new(&esbuild)
            .args(Self::arguments(entry, &outfile, options))
            .current_dir(&self.project_root)
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(BundleFailure::Rejected {
                message: first_diagnostic(&stderr)
                    .unwrap_or_else(|| format!("esbuild exited with {}", output.status)),
            });
        }
        if !options.quiet {
            for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
                log::warn!("esbuild: {}", line);
            }
        }

        let code = match tokio::fs::read(&outfile).await {
            Ok(code) => code,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BundleFailure::NoOutput {
                    entry: entry.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let source_map = if options.source_map {
            match tokio::fs::read(out_dir.join(OUT_MAP)).await {
                Ok(map) => Some(map),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };

        let assets = {
            let out_dir = out_dir.clone();
            tokio::task::spawn_blocking(move || collect_assets(&out_dir))
                .await
                .map_err(std::io::Error::other)??
        };

        Ok(BundleOutput {
            code,
            source_map,
            assets,
        })
    }

    fn dispose(&self) {
        let Ok(mut scratch) = self.scratch.lock() else {
            return;
        };
        if let Some(dir) = scratch.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                log::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
