//! Project validation: entry points and `action.yml` in one pass.
//!
//! The [`Validator`] turns individual failures into report items. Entry
//! detection failure becomes a `MAIN_ENTRY_MISSING` error item here, whereas a
//! build treats it as fatal.

mod strict;

pub use strict::{EnvSource, ProcessEnv, is_ci, resolve_strict};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Configuration, parse_size};
use crate::entries::detect_entries;
use crate::error::ValidationError;
use crate::manifest::{ACTION_YML, validate_manifest};
use crate::schema::SchemaIssue;

/// A single finding in a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationItem {
    /// Stable machine-readable code, e.g. `ACTION_YML_MISSING`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// File the finding refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// How to fix it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationItem {
    /// Creates an item without file or suggestion.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
            suggestion: None,
        }
    }

    /// Attaches the file the item refers to.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// One error item per schema violation.
    fn from_schema_issue(path: &Path, issue: &SchemaIssue) -> Self {
        Self::new(
            "ACTION_YML_SCHEMA_ERROR",
            format!("action.yml: {issue}"),
        )
        .with_file(path)
        .with_suggestion(
            "See https://docs.github.com/actions/creating-actions/metadata-syntax-for-github-actions",
        )
    }
}

impl From<&ValidationError> for ValidationItem {
    fn from(error: &ValidationError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            file: error.file().cloned(),
            suggestion: error.suggestion(),
        }
    }
}

/// Outcome of [`Validator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Overall verdict
    pub valid: bool,
    /// Findings that make the project invalid
    pub errors: Vec<ValidationItem>,
    /// Advisory findings
    pub warnings: Vec<ValidationItem>,
    /// Whether strict mode was in effect
    pub strict: bool,
}

/// Options for a validation pass.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Project root
    pub cwd: PathBuf,
    /// Strict mode override; takes precedence over configuration and CI detection
    pub strict: Option<bool>,
}

impl ValidateOptions {
    /// Validate `cwd` with strict mode resolved from configuration or CI.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            strict: None,
        }
    }

    /// Force strict mode on or off.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }
}

/// Validation orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Validator<E = ProcessEnv> {
    env: E,
}

impl Validator<ProcessEnv> {
    /// Creates a validator that reads CI indicators from the process environment.
    pub fn new() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: EnvSource> Validator<E> {
    /// Creates a validator reading CI indicators from `env`.
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    /// Validates entry points and, unless disabled, `action.yml`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ValidationFailed`] only when strict mode is on,
    /// there are no errors, and at least one warning was produced. When errors
    /// exist the result is returned with `valid == false` instead.
    pub async fn validate(
        &self,
        config: &Configuration,
        options: &ValidateOptions,
    ) -> Result<ValidationResult, ValidationError> {
        let strict = resolve_strict(options.strict, config.validation.strict, || {
            is_ci(&self.env)
        });
        log::debug!("Validating {} (strict: {})", options.cwd.display(), strict);

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match detect_entries(&options.cwd, Some(&config.entries)).await {
            Ok(detected) => {
                for (role, path) in detected.missing_explicit {
                    warnings.push(ValidationItem::from(
                        &ValidationError::ExplicitEntryMissing { role, path },
                    ));
                }
            }
            Err(e) => errors.push(ValidationItem::from(&e)),
        }

        let size_limit = config.validation.max_bundle_size.as_deref();
        if let Some(size) = size_limit.filter(|size| parse_size(size).is_none()) {
            warnings.push(
                ValidationItem::new(
                    "INVALID_BUNDLE_SIZE",
                    format!("validation.maxBundleSize {size:?} is not a size, limit ignored"),
                )
                .with_suggestion("Use a number with a unit, e.g. \"500kb\" or \"5mb\""),
            );
        }

        if config.validation.require_action_yml {
            let manifest_path = options.cwd.join(ACTION_YML);
            match validate_manifest(&manifest_path).await {
                Ok(report) => warnings.extend(report.warnings),
                Err(e @ ValidationError::ActionYmlMissing { .. }) => {
                    warnings.push(ValidationItem::from(&e));
                }
                Err(ValidationError::ActionYmlSchemaError { path, errors: issues }) => {
                    errors.extend(
                        issues
                            .iter()
                            .map(|issue| ValidationItem::from_schema_issue(&path, issue)),
                    );
                }
                Err(e) => errors.push(ValidationItem::from(&e)),
            }
        } else {
            log::debug!("validation.requireActionYml is false, skipping action.yml");
        }

        if strict && errors.is_empty() && !warnings.is_empty() {
            return Err(ValidationError::ValidationFailed {
                error_count: 0,
                warning_count: warnings.len(),
                message: format!(
                    "Validation failed in strict mode: {} warning(s) treated as errors",
                    warnings.len()
                ),
                warnings,
            });
        }

        let valid = errors.is_empty() && !(strict && !warnings.is_empty());
        log::info!(
            "Validation finished: {} error(s), {} warning(s)",
            errors.len(),
            warnings.len()
        );

        Ok(ValidationResult {
            valid,
            errors,
            warnings,
            strict,
        })
    }
}
