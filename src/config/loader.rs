//! Configuration file discovery and loading.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::module::{ModuleLoader, NodeModuleLoader};
use super::types::{CONFIG_SHAPE, Configuration, PartialConfiguration};
use crate::error::ConfigError;
use crate::schema;
use crate::utils::fs::{exists, resolve_path};

/// Configuration file names searched in the working directory, in order.
pub const CONFIG_CANDIDATES: &[&str] = &[
    "action.config.ts",
    "action.config.mts",
    "action.config.js",
    "action.config.mjs",
    "action.config.json",
    "action.config.toml",
    "action.config.yaml",
    "action.config.yml",
];

/// Where to load configuration from.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Project root
    pub cwd: PathBuf,
    /// Explicit configuration path (relative to `cwd` or absolute)
    pub config_path: Option<PathBuf>,
}

impl LoadOptions {
    /// Auto-detect configuration in `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            config_path: None,
        }
    }

    /// Load from an explicit path.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Resolved configuration
    pub config: Configuration,
    /// File it came from, if any
    pub path: Option<PathBuf>,
    /// No configuration file was found; defaults are in effect
    pub used_defaults: bool,
}

/// Returns the first configuration candidate that exists in `cwd`.
pub async fn find_config_file(cwd: &Path) -> Option<PathBuf> {
    for candidate in CONFIG_CANDIDATES {
        let path = cwd.join(candidate);
        if exists(&path).await {
            return Some(path);
        }
    }
    None
}

/// Loads configuration files through a [`ModuleLoader`].
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader<L = NodeModuleLoader> {
    module_loader: L,
}

impl<L: ModuleLoader> ConfigLoader<L> {
    /// Creates a loader backed by `module_loader`.
    pub fn new(module_loader: L) -> Self {
        Self { module_loader }
    }

    /// Locates, loads and resolves configuration.
    ///
    /// Without an explicit path the candidates in [`CONFIG_CANDIDATES`] are
    /// searched; finding none yields defaults with `used_defaults` set.
    pub async fn load(&self, options: &LoadOptions) -> Result<LoadedConfig, ConfigError> {
        let path = match &options.config_path {
            Some(path) => resolve_path(&options.cwd, path),
            None => match find_config_file(&options.cwd).await {
                Some(path) => path,
                None => {
                    log::info!(
                        "No configuration file in {}, using defaults",
                        options.cwd.display()
                    );
                    return Ok(LoadedConfig {
                        config: Configuration::default(),
                        path: None,
                        used_defaults: true,
                    });
                }
            },
        };

        if !exists(&path).await {
            return Err(ConfigError::NotFound { path });
        }

        log::debug!("Loading configuration from {}", path.display());

        let export = self
            .module_loader
            .load_default_export(&path)
            .await
            .map_err(|cause| ConfigError::LoadFailed {
                path: path.clone(),
                cause,
            })?;

        let partial = parse_partial(&path, export)?;

        Ok(LoadedConfig {
            config: super::resolve(partial),
            path: Some(path),
            used_defaults: false,
        })
    }
}

/// Checks a default export and converts it into a [`PartialConfiguration`].
fn parse_partial(path: &Path, export: Value) -> Result<PartialConfiguration, ConfigError> {
    if !export.is_object() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!(
                "default export must be a plain object, got {}",
                schema::kind_of(&export)
            ),
        });
    }

    schema::decode(&CONFIG_SHAPE, export).map_err(|issues| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    })
}
