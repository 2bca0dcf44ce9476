//! Configuration values and their defaults.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::{Field, Shape};

/// Default primary entry path, relative to the project root.
pub const DEFAULT_MAIN_ENTRY: &str = "src/main.ts";

/// ECMAScript language level emitted by the bundler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsTarget {
    /// ES2020
    Es2020,
    /// ES2021
    Es2021,
    /// ES2022
    #[default]
    Es2022,
    /// ES2023
    Es2023,
    /// ES2024
    Es2024,
    /// Latest syntax
    Esnext,
}

/// Every accepted `build.target` value.
pub const ES_TARGETS: &[&str] = &["es2020", "es2021", "es2022", "es2023", "es2024", "esnext"];

impl EsTarget {
    /// Target name as passed to the bundler.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es2020 => "es2020",
            Self::Es2021 => "es2021",
            Self::Es2022 => "es2022",
            Self::Es2023 => "es2023",
            Self::Es2024 => "es2024",
            Self::Esnext => "esnext",
        }
    }
}

impl fmt::Display for EsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved configuration.
///
/// Produced by [`resolve`](super::resolve); every field carries a value or a
/// deliberate `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Entry point paths
    pub entries: EntriesConfig,
    /// Bundler options
    pub build: BuildConfig,
    /// Validation policy
    pub validation: ValidationConfig,
}

/// Entry point paths, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesConfig {
    /// Primary entry (`runs.main`)
    pub main: String,
    /// Pre-step entry (`runs.pre`); convention path when `None`
    pub pre: Option<String>,
    /// Post-step entry (`runs.post`); convention path when `None`
    pub post: Option<String>,
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            main: DEFAULT_MAIN_ENTRY.to_string(),
            pre: None,
            post: None,
        }
    }
}

/// Options forwarded to the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Minify output
    pub minify: bool,
    /// Language level
    pub target: EsTarget,
    /// Emit external source maps
    pub source_map: bool,
    /// Packages left out of the bundle
    pub externals: Vec<String>,
    /// Suppress bundler diagnostics
    pub quiet: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            minify: true,
            target: EsTarget::default(),
            source_map: false,
            externals: Vec::new(),
            quiet: false,
        }
    }
}

/// Validation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Validate `action.yml`
    pub require_action_yml: bool,
    /// Largest acceptable bundle, e.g. `"5mb"`
    pub max_bundle_size: Option<String>,
    /// Strict mode override; `None` means detect from CI
    pub strict: Option<bool>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_action_yml: true,
            max_bundle_size: None,
            strict: None,
        }
    }
}

impl ValidationConfig {
    /// `max_bundle_size` in bytes, if set and well-formed.
    pub fn max_bundle_bytes(&self) -> Option<u64> {
        self.max_bundle_size.as_deref().and_then(parse_size)
    }
}

/// User-supplied configuration; every section and field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfiguration {
    /// Entry overrides
    #[serde(default)]
    pub entries: Option<PartialEntries>,
    /// Build overrides
    #[serde(default)]
    pub build: Option<PartialBuild>,
    /// Validation overrides
    #[serde(default)]
    pub validation: Option<PartialValidation>,
}

/// Partial `entries` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialEntries {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub pre: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
}

/// Partial `build` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialBuild {
    #[serde(default)]
    pub minify: Option<bool>,
    #[serde(default)]
    pub target: Option<EsTarget>,
    #[serde(default)]
    pub source_map: Option<bool>,
    #[serde(default)]
    pub externals: Option<Vec<String>>,
    #[serde(default)]
    pub quiet: Option<bool>,
}

/// Partial `validation` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialValidation {
    #[serde(default)]
    pub require_action_yml: Option<bool>,
    #[serde(default)]
    pub max_bundle_size: Option<String>,
    #[serde(default)]
    pub strict: Option<bool>,
}

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(b|kb|mb|gb)\s*$").expect("size pattern is valid")
});

/// Parses a size such as `"512kb"` or `"1.5MB"` into bytes (1024-based).
pub fn parse_size(input: &str) -> Option<u64> {
    let captures = SIZE_PATTERN.captures(input)?;
    let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
    let multiplier = match captures.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "b" => 1u64,
        "kb" => 1024,
        "mb" => 1024 * 1024,
        "gb" => 1024 * 1024 * 1024,
        _ => return None,
    };
    Some((amount * multiplier as f64).round() as u64)
}

/// Shape of a configuration module's default export.
pub static CONFIG_SHAPE: Shape = Shape::Struct(&[
    Field::optional(
        "entries",
        Shape::Struct(&[
            Field::optional("main", Shape::String),
            Field::optional("pre", Shape::String),
            Field::optional("post", Shape::String),
        ]),
    ),
    Field::optional(
        "build",
        Shape::Struct(&[
            Field::optional("minify", Shape::Bool),
            Field::optional("target", Shape::OneOf(ES_TARGETS)),
            Field::optional("sourceMap", Shape::Bool),
            Field::optional("externals", Shape::Array(&Shape::String)),
            Field::optional("quiet", Shape::Bool),
        ]),
    ),
    Field::optional(
        "validation",
        Shape::Struct(&[
            Field::optional("requireActionYml", Shape::Bool),
            Field::optional(
                "maxBundleSize",
                Shape::Pattern(&SIZE_PATTERN, "size (e.g. \"5mb\", \"512kb\")"),
            ),
            Field::optional("strict", Shape::Bool),
        ]),
    ),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes_with_units() {
        assert_eq!(parse_size("512b"), Some(512));
        assert_eq!(parse_size("2kb"), Some(2048));
        assert_eq!(parse_size("5MB"), Some(5 * 1024 * 1024));
        assert_eq!(parse_size(" 1.5 mb "), Some(1_572_864));
        assert_eq!(parse_size("1gb"), Some(1024 * 1024 * 1024));
    }

    #[test]
    fn rejects_sizes_without_units() {
        assert_eq!(parse_size("1024"), None);
        assert_eq!(parse_size("five mb"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn target_names_round_trip_through_serde() {
        for name in ES_TARGETS {
            let target: EsTarget =
                serde_json::from_value(serde_json::Value::String((*name).to_string()))
                    .expect("known target");
            assert_eq!(target.as_str(), *name);
        }
    }
}
