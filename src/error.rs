//! Error types for the action bundling pipeline.
//!
//! Each pipeline stage owns a closed set of failures with structured context:
//! [`ConfigError`] for configuration loading, [`ValidationError`] for entry
//! detection and `action.yml` checks, and [`BuildError`] for bundling and output.
//! [`BundlerError`] aggregates them for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::entries::EntryRole;
use crate::schema::SchemaIssue;
use crate::validation::ValidationItem;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Build errors
    #[error(transparent)]
    Build(#[from] BuildError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Scaffold target already exists and `--force` was not given
    #[error("Directory already exists: {} (use --force to overwrite)", .path.display())]
    TargetExists {
        /// Directory that would have been overwritten
        path: PathBuf,
    },
}

/// Configuration loading failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The module loaded but its default export has the wrong shape.
    #[error("Invalid configuration in {}: {message}", .path.display())]
    Invalid {
        /// Configuration file path
        path: PathBuf,
        /// Description of every violation
        message: String,
    },

    /// The module could not be loaded at all.
    #[error("Failed to load configuration from {}: {cause}", .path.display())]
    LoadFailed {
        /// Configuration file path
        path: PathBuf,
        /// Underlying loader failure
        cause: String,
    },
}

/// Entry detection and manifest validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The primary entry point does not exist.
    #[error("Main entry point not found: {}", .expected_path.display())]
    MainEntryMissing {
        /// Absolute path that was expected
        expected_path: PathBuf,
        /// Working directory the path was resolved against
        cwd: PathBuf,
    },

    /// An explicitly configured optional entry does not exist.
    #[error("Configured {role} entry not found: {}", .path.display())]
    ExplicitEntryMissing {
        /// Role of the configured entry
        role: EntryRole,
        /// Absolute path that was configured
        path: PathBuf,
    },

    /// `action.yml` does not exist.
    #[error("action.yml not found: {}", .path.display())]
    ActionYmlMissing {
        /// Manifest path
        path: PathBuf,
    },

    /// `action.yml` exists but could not be read.
    #[error("Failed to read {}: {message}", .path.display())]
    ActionYmlReadError {
        /// Manifest path
        path: PathBuf,
        /// Underlying I/O failure
        message: String,
    },

    /// `action.yml` is not valid YAML or its top level is not a mapping.
    #[error("Invalid YAML in {}{}: {message}", .path.display(), format_location(.line, .column))]
    ActionYmlSyntaxError {
        /// Manifest path
        path: PathBuf,
        /// Parser message
        message: String,
        /// 1-based line, when known
        line: Option<usize>,
        /// 1-based column, when known
        column: Option<usize>,
    },

    /// `action.yml` parsed but does not match the manifest schema.
    #[error("action.yml schema validation failed with {} error(s)", .errors.len())]
    ActionYmlSchemaError {
        /// Manifest path
        path: PathBuf,
        /// Every field-level violation
        errors: Vec<SchemaIssue>,
    },

    /// Strict mode escalated warnings into a failure.
    #[error("{message}")]
    ValidationFailed {
        /// Number of errors
        error_count: usize,
        /// Number of warnings
        warning_count: usize,
        /// Summary message
        message: String,
        /// The warnings that were escalated
        warnings: Vec<ValidationItem>,
    },
}

impl ValidationError {
    /// Stable machine-readable code used in validation reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MainEntryMissing { .. } => "MAIN_ENTRY_MISSING",
            Self::ExplicitEntryMissing { .. } => "EXPLICIT_ENTRY_MISSING",
            Self::ActionYmlMissing { .. } => "ACTION_YML_MISSING",
            Self::ActionYmlReadError { .. } => "ACTION_YML_READ_ERROR",
            Self::ActionYmlSyntaxError { .. } => "ACTION_YML_SYNTAX_ERROR",
            Self::ActionYmlSchemaError { .. } => "ACTION_YML_SCHEMA_ERROR",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
        }
    }

    /// File the failure refers to, if any.
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            Self::MainEntryMissing { expected_path, .. } => Some(expected_path),
            Self::ExplicitEntryMissing { path, .. }
            | Self::ActionYmlMissing { path }
            | Self::ActionYmlReadError { path, .. }
            | Self::ActionYmlSyntaxError { path, .. }
            | Self::ActionYmlSchemaError { path, .. } => Some(path),
            Self::ValidationFailed { .. } => None,
        }
    }

    /// Actionable remediation hint for this failure.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MainEntryMissing { .. } => Some(
                "Create src/main.ts or set entries.main in your configuration".to_string(),
            ),
            Self::ExplicitEntryMissing { role, .. } => Some(format!(
                "Create the file or remove entries.{role} from your configuration"
            )),
            Self::ActionYmlMissing { .. } => Some(
                "Create an action.yml describing the action, or set validation.requireActionYml to false"
                    .to_string(),
            ),
            Self::ActionYmlReadError { .. } => {
                Some("Check the file permissions of action.yml".to_string())
            }
            Self::ActionYmlSyntaxError { .. } => {
                Some("Fix the YAML syntax at the reported location".to_string())
            }
            Self::ActionYmlSchemaError { .. } => Some(
                "See https://docs.github.com/actions/creating-actions/metadata-syntax-for-github-actions"
                    .to_string(),
            ),
            Self::ValidationFailed { .. } => Some(
                "Resolve the warnings or disable strict mode with validation.strict = false"
                    .to_string(),
            ),
        }
    }
}

fn format_location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!(" at line {line}, column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

/// Build failures.
///
/// `BundleFailed` and `WriteFailed` are captured per entry inside a build
/// result; the remaining variants abort the build.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Entry detection failed (never downgraded during a build)
    #[error(transparent)]
    Entry(#[from] ValidationError),

    /// The bundler backend rejected an entry
    #[error("Failed to bundle {role} entry: {cause}")]
    BundleFailed {
        /// Entry role
        role: EntryRole,
        /// Backend failure text
        cause: String,
    },

    /// Writing build output failed
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Cleaning the output directory failed
    #[error("Failed to clean {}: {source}", .path.display())]
    CleanFailed {
        /// Output directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// One or more entries failed
    #[error("Build failed: {} of {total} entries failed ({})", .failed.len(), join_roles(.failed))]
    BuildFailed {
        /// Roles whose bundle failed
        failed: Vec<EntryRole>,
        /// Number of attempted entries
        total: usize,
    },
}

fn join_roles(roles: &[EntryRole]) -> String {
    roles
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation(e) => e.suggestion().into_iter().collect(),
            Self::Build(BuildError::Entry(e)) => e.suggestion().into_iter().collect(),
            Self::Config(ConfigError::LoadFailed { .. }) => vec![
                "Check that node (or tsx for TypeScript configs) is installed and the config module has no syntax errors"
                    .to_string(),
            ],
            Self::Config(ConfigError::Invalid { .. }) => vec![
                "The configuration module must `export default` a plain object".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
