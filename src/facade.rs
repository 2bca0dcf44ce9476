//! One-object entry point for the load → validate → build lifecycle.
//!
//! [`ActionBundler`] is the boundary between the typed pipeline and callers
//! that only want a verdict: every operation returns a report with a
//! `success` flag and an optional error message instead of a typed error.

use std::path::{Path, PathBuf};

use tokio::sync::OnceCell;

use crate::bundler::{BuildOptions, BuildResult, BundleBackend, Builder, EsbuildBackend};
use crate::config::{
    ConfigLoader, Configuration, LoadOptions, LoadedConfig, ModuleLoader, NodeModuleLoader,
    PartialConfiguration, resolve,
};
use crate::error::{ConfigError, ValidationError};
use crate::utils::fs::absolute;
use crate::validation::{
    EnvSource, ProcessEnv, ValidateOptions, ValidationResult, Validator,
};

/// Where the configuration comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Already-parsed configuration
    Inline(PartialConfiguration),
    /// A configuration file, relative to the project root or absolute
    Path(PathBuf),
    /// Search the project root for a configuration file
    #[default]
    Auto,
}

/// Outcome of a facade operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<T> {
    pub success: bool,
    pub value: Option<T>,
    pub error: Option<String>,
}

impl<T> Report<T> {
    fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error.to_string()),
        }
    }
}

/// Outcome of [`ActionBundler::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub success: bool,
    pub error: Option<String>,
    /// Validation outcome, unless validation was skipped or never reached
    pub validation: Option<ValidationResult>,
    /// Build outcome, if the build ran
    pub build: Option<BuildResult>,
}

impl BuildReport {
    fn failed(error: impl ToString, validation: Option<ValidationResult>) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            validation,
            build: None,
        }
    }
}

/// Options for [`ActionBundler::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeBuildOptions {
    /// Skip validation entirely
    pub skip_validation: bool,
    /// Remove `dist/` before bundling
    pub clean: bool,
    /// Strict mode override for validation
    pub strict: Option<bool>,
}

impl Default for FacadeBuildOptions {
    fn default() -> Self {
        Self {
            skip_validation: false,
            clean: true,
            strict: None,
        }
    }
}

/// Stateful bundler for one project.
///
/// Configuration is loaded on first use and reused afterwards; a failed load
/// is retried on the next call. Not meant for overlapping concurrent calls.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_action::facade::{ActionBundler, ConfigSource, FacadeBuildOptions};
///
/// # async fn example() {
/// let bundler = ActionBundler::new(".", ConfigSource::Auto);
/// let report = bundler.build(FacadeBuildOptions::default()).await;
/// if !report.success {
///     eprintln!("{}", report.error.unwrap_or_default());
/// }
/// bundler.dispose();
/// # }
/// ```
#[derive(Debug)]
pub struct ActionBundler<B = EsbuildBackend, L = NodeModuleLoader, E = ProcessEnv> {
    cwd: PathBuf,
    source: ConfigSource,
    loader: ConfigLoader<L>,
    validator: Validator<E>,
    builder: Builder<B>,
    config: OnceCell<LoadedConfig>,
}

impl ActionBundler {
    /// Bundler for the project at `cwd` using esbuild, Node-evaluated
    /// configuration and the process environment.
    pub fn new(cwd: impl AsRef<Path>, source: ConfigSource) -> Self {
        let cwd = absolute(cwd.as_ref());
        let backend = EsbuildBackend::new(&cwd);
        Self::with_parts(cwd, source, backend, NodeModuleLoader::default(), ProcessEnv)
    }
}

impl<B: BundleBackend, L: ModuleLoader, E: EnvSource> ActionBundler<B, L, E> {
    /// Bundler assembled from explicit parts.
    pub fn with_parts(
        cwd: impl Into<PathBuf>,
        source: ConfigSource,
        backend: B,
        module_loader: L,
        env: E,
    ) -> Self {
        Self {
            cwd: cwd.into(),
            source,
            loader: ConfigLoader::new(module_loader),
            validator: Validator::with_env(env),
            builder: Builder::new(backend),
            config: OnceCell::new(),
        }
    }

    /// Project root.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Configuration file in use, once configuration has been loaded.
    pub fn config_file(&self) -> Option<&Path> {
        self.config.get().and_then(|loaded| loaded.path.as_deref())
    }

    async fn config(&self) -> Result<&Configuration, ConfigError> {
        let loaded = self
            .config
            .get_or_try_init(|| async {
                match &self.source {
                    ConfigSource::Inline(partial) => Ok(LoadedConfig {
                        config: resolve(partial.clone()),
                        path: None,
                        used_defaults: false,
                    }),
                    ConfigSource::Path(path) => {
                        self.loader
                            .load(&LoadOptions::new(&self.cwd).with_config_path(path))
                            .await
                    }
                    ConfigSource::Auto => self.loader.load(&LoadOptions::new(&self.cwd)).await,
                }
            })
            .await?;
        Ok(&loaded.config)
    }

    /// Loads (or returns the cached) configuration.
    pub async fn load_config(&self) -> Report<Configuration> {
        match self.config().await {
            Ok(config) => Report::ok(config.clone()),
            Err(e) => Report::failed(e),
        }
    }

    /// Validates the project.
    ///
    /// A strict-mode escalation reports `success: false` with the escalated
    /// warnings in an invalid result.
    pub async fn validate(&self, strict: Option<bool>) -> Report<ValidationResult> {
        let config = match self.config().await {
            Ok(config) => config,
            Err(e) => return Report::failed(e),
        };

        let options = ValidateOptions {
            cwd: self.cwd.clone(),
            strict,
        };
        match self.validator.validate(config, &options).await {
            Ok(result) => Report {
                success: result.valid,
                error: (!result.valid)
                    .then(|| format!("Validation failed with {} error(s)", result.errors.len())),
                value: Some(result),
            },
            Err(e) => Report {
                success: false,
                error: Some(e.to_string()),
                value: escalated_result(e),
            },
        }
    }

    /// Loads configuration, validates unless skipped, then builds.
    pub async fn build(&self, options: FacadeBuildOptions) -> BuildReport {
        let config = match self.config().await {
            Ok(config) => config,
            Err(e) => return BuildReport::failed(e, None),
        };

        let validation = if options.skip_validation {
            log::debug!("Skipping validation");
            None
        } else {
            let report = self.validate(options.strict).await;
            if !report.success {
                let error = report
                    .error
                    .unwrap_or_else(|| "Validation failed".to_string());
                return BuildReport::failed(error, report.value);
            }
            report.value
        };

        let build_options = BuildOptions::new(&self.cwd).clean(options.clean);
        match self.builder.build(config, &build_options).await {
            Ok(result) => BuildReport {
                success: result.success,
                error: result.error.clone(),
                validation,
                build: Some(result),
            },
            Err(e) => BuildReport::failed(e, validation),
        }
    }

    /// Releases backend resources and drops the cached configuration.
    pub fn dispose(self) {
        self.builder.dispose();
    }
}

/// Invalid result carrying the warnings a strict-mode failure escalated.
fn escalated_result(error: ValidationError) -> Option<ValidationResult> {
    match error {
        ValidationError::ValidationFailed { warnings, .. } => Some(ValidationResult {
            valid: false,
            errors: Vec::new(),
            warnings,
            strict: true,
        }),
        _ => None,
    }
}
