//! Build orchestration.
//!
//! The [`Builder`] detects entries, bundles each one through a
//! [`BundleBackend`], writes the output layout under `dist/` and aggregates
//! per-entry outcomes into a [`BuildResult`].

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use super::backend::{BundleBackend, BundleOptions};
use super::esbuild::EsbuildBackend;
use super::result::{BuildResult, BundleResult, BundleStats, format_size};
use crate::config::Configuration;
use crate::entries::{DetectedEntry, EntryRole, OUTPUT_DIR, detect_entries};
use crate::error::BuildError;
use crate::utils::fs::{remove_dir_all, write_file};

/// Marker that makes Node treat `dist/*.js` as ES modules.
pub const MODULE_MARKER: &str = "{\"type\":\"module\"}\n";

/// Options for a single build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project root
    pub cwd: PathBuf,
    /// Remove `dist/` before bundling
    pub clean: bool,
}

impl BuildOptions {
    /// Build the project at `cwd`, cleaning `dist/` first.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            clean: true,
        }
    }

    /// Whether to remove `dist/` before bundling.
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

/// Build orchestrator.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_action::bundler::{BuildOptions, Builder, EsbuildBackend};
/// use kodegen_bundler_action::config::Configuration;
///
/// # async fn example() -> Result<(), kodegen_bundler_action::error::BuildError> {
/// let builder = Builder::new(EsbuildBackend::new("."));
/// let result = builder
///     .build(&Configuration::default(), &BuildOptions::new("."))
///     .await?;
/// println!("{} entries in {:?}", result.entries.len(), result.duration);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Builder<B = EsbuildBackend> {
    backend: B,
}

impl<B: BundleBackend> Builder<B> {
    /// Creates a builder that bundles through `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The bundling backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Builds every detected entry of the project at `options.cwd`.
    ///
    /// Entries are bundled one after another; a failing entry is recorded in
    /// the result and does not stop the others.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Entry`] when the primary entry does not exist
    /// - [`BuildError::CleanFailed`] when `dist/` cannot be removed
    /// - [`BuildError::WriteFailed`] when the module marker cannot be written
    pub async fn build(
        &self,
        config: &Configuration,
        options: &BuildOptions,
    ) -> Result<BuildResult, BuildError> {
        let started = Instant::now();

        let detected = detect_entries(&options.cwd, Some(&config.entries)).await?;
        let out_dir = options.cwd.join(OUTPUT_DIR);

        if options.clean {
            log::debug!("Cleaning {}", out_dir.display());
            remove_dir_all(&out_dir)
                .await
                .map_err(|source| BuildError::CleanFailed {
                    path: out_dir.clone(),
                    source,
                })?;
        }

        let bundle_options = BundleOptions::from(&config.build);
        let mut warnings = Vec::new();

        let limit = config.validation.max_bundle_bytes();
        if let (Some(raw), None) = (&config.validation.max_bundle_size, limit) {
            log::warn!("Ignoring invalid validation.maxBundleSize: {:?}", raw);
            warnings.push(format!("Ignoring invalid validation.maxBundleSize: {raw:?}"));
        }

        let mut entries = Vec::with_capacity(detected.entries.len());
        for entry in &detected.entries {
            log::info!(
                "Bundling {} entry: {}",
                entry.role,
                entry.source_path.display()
            );

            match self.bundle_entry(entry, &options.cwd, &bundle_options).await {
                Ok(stats) => {
                    if let Some(limit) = limit.filter(|limit| stats.size > *limit) {
                        let warning = format!(
                            "{} bundle is {}, over the {} limit (validation.maxBundleSize)",
                            stats.role,
                            format_size(stats.size),
                            format_size(limit)
                        );
                        log::warn!("{}", warning);
                        warnings.push(warning);
                    }
                    log::info!(
                        "✓ {} ({}, {:?})",
                        stats.output_path.display(),
                        format_size(stats.size),
                        stats.duration
                    );
                    entries.push(BundleResult::succeeded(stats));
                }
                Err(e) => {
                    log::error!("✗ {} entry failed: {}", entry.role, e);
                    entries.push(BundleResult::failed(entry.role, e));
                }
            }
        }

        let marker = out_dir.join("package.json");
        write_file(&marker, MODULE_MARKER)
            .await
            .map_err(|source| BuildError::WriteFailed {
                path: marker,
                source,
            })?;

        let failed: Vec<EntryRole> = entries
            .iter()
            .filter(|entry| !entry.success)
            .map(|entry| entry.role)
            .collect();
        let success = failed.is_empty();
        let error = (!success).then(|| {
            BuildError::BuildFailed {
                failed,
                total: entries.len(),
            }
            .to_string()
        });

        Ok(BuildResult {
            success,
            entries,
            duration: started.elapsed(),
            error,
            warnings,
        })
    }

    /// Bundles one entry and writes its files.
    async fn bundle_entry(
        &self,
        entry: &DetectedEntry,
        cwd: &Path,
        options: &BundleOptions,
    ) -> Result<BundleStats, BuildError> {
        let started = Instant::now();

        let output = self
            .backend
            .bundle(&entry.source_path, options)
            .await
            .map_err(|e| BuildError::BundleFailed {
                role: entry.role,
                cause: e.to_string(),
            })?;

        let out_path = cwd.join(&entry.output_path);
        write(&out_path, &output.code).await?;

        if options.source_map {
            if let Some(map) = &output.source_map {
                write(&map_path(&out_path), map).await?;
            }
        }

        for asset in &output.assets {
            match asset_destination(&out_path, &asset.path) {
                Some(destination) => write(&destination, &asset.contents).await?,
                None => log::warn!(
                    "Skipping {} asset {}: outside {} or clashes with a bundle output",
                    entry.role,
                    asset.path.display(),
                    OUTPUT_DIR
                ),
            }
        }

        Ok(BundleStats {
            role: entry.role,
            size: output.code.len() as u64,
            duration: started.elapsed(),
            output_path: entry.output_path.clone(),
        })
    }

    /// Releases backend resources.
    pub fn dispose(&self) {
        self.backend.dispose();
    }
}

async fn write(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    write_file(path, contents)
        .await
        .map_err(|source| BuildError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// `dist/main.js` -> `dist/main.js.map`
fn map_path(out_path: &Path) -> PathBuf {
    let mut path = OsString::from(out_path.as_os_str());
    path.push(".map");
    PathBuf::from(path)
}

/// Where an emitted asset is written, next to `out_path`.
///
/// `None` for paths that leave the output directory or that would replace a
/// bundle, its source map or the module marker.
fn asset_destination(out_path: &Path, asset: &Path) -> Option<PathBuf> {
    let out_dir = out_path.parent()?;
    let relative = asset
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !relative || asset.file_name().is_none() {
        return None;
    }

    let destination = out_dir.join(asset);
    let clashes = destination == out_dir.join("package.json")
        || EntryRole::ALL.iter().any(|role| {
            let bundle = out_dir.join(format!("{role}.js"));
            destination == bundle || destination == map_path(&bundle)
        });
    (!clashes).then_some(destination)
}
