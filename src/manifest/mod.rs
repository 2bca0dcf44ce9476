//! `action.yml` parsing, schema validation and advisory checks.

mod branding;
mod schema;

pub use branding::{BRANDING_COLORS, BRANDING_ICONS};
pub use schema::{
    ActionInput, ActionManifest, ActionOutput, ActionRuns, Branding, MANIFEST_SHAPE,
    SUPPORTED_RUNTIME,
};

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::error::ValidationError;
use crate::validation::ValidationItem;

/// Manifest file name, relative to the project root.
pub const ACTION_YML: &str = "action.yml";

/// A schema-valid manifest plus its advisory warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    /// Typed manifest
    pub manifest: ActionManifest,
    /// Non-fatal findings
    pub warnings: Vec<ValidationItem>,
}

/// Reads, parses and validates the manifest at `path`.
///
/// # Errors
///
/// - [`ValidationError::ActionYmlMissing`] if the file does not exist
/// - [`ValidationError::ActionYmlReadError`] if it cannot be read
/// - [`ValidationError::ActionYmlSyntaxError`] for invalid YAML or a non-mapping document
/// - [`ValidationError::ActionYmlSchemaError`] with every schema violation
pub async fn validate_manifest(path: &Path) -> Result<ManifestReport, ValidationError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ValidationError::ActionYmlMissing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(ValidationError::ActionYmlReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    let tree = parse_tree(path, &bytes)?;

    let manifest: ActionManifest = crate::schema::decode(&MANIFEST_SHAPE, tree.clone())
        .map_err(|errors| ValidationError::ActionYmlSchemaError {
            path: path.to_path_buf(),
            errors,
        })?;

    let warnings = advisory_warnings(path, &tree);
    log::debug!(
        "{} is valid with {} warning(s)",
        path.display(),
        warnings.len()
    );

    Ok(ManifestReport { manifest, warnings })
}

/// Parses YAML into a JSON tree whose top level is a mapping.
fn parse_tree(path: &Path, bytes: &[u8]) -> Result<Value, ValidationError> {
    let syntax_error = |message: String, line: Option<usize>, column: Option<usize>| {
        ValidationError::ActionYmlSyntaxError {
            path: path.to_path_buf(),
            message,
            line,
            column,
        }
    };

    let document: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(|e| {
        let location = e.location();
        syntax_error(
            e.to_string(),
            location.as_ref().map(|l| l.line()),
            location.as_ref().map(|l| l.column()),
        )
    })?;

    if !document.is_mapping() {
        return Err(syntax_error(
            format!(
                "top-level value must be a mapping, got {}",
                yaml_kind(&document)
            ),
            None,
            None,
        ));
    }

    serde_json::to_value(&document).map_err(|e| syntax_error(e.to_string(), None, None))
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "an empty document",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Derives advisory warnings from the raw parsed tree.
fn advisory_warnings(path: &Path, tree: &Value) -> Vec<ValidationItem> {
    let mut warnings = Vec::new();
    let warn = |code: &str, message: String, suggestion: &str| {
        ValidationItem::new(code, message)
            .with_file(path)
            .with_suggestion(suggestion)
    };

    match tree.get("branding") {
        branding if is_absent(branding) => warnings.push(warn(
            "MISSING_BRANDING",
            "action.yml has no branding section".to_string(),
            "Add branding.icon and branding.color to customize the Marketplace badge",
        )),
        Some(branding) => {
            if is_absent(branding.get("icon")) {
                warnings.push(warn(
                    "MISSING_BRANDING_ICON",
                    "branding.icon is not set".to_string(),
                    "Choose an icon from the Feather icon set, e.g. icon: package",
                ));
            }
            if is_absent(branding.get("color")) {
                warnings.push(warn(
                    "MISSING_BRANDING_COLOR",
                    "branding.color is not set".to_string(),
                    "Set branding.color to one of: white, black, yellow, blue, green, orange, red, purple, gray-dark",
                ));
            }
        }
        None => {}
    }

    if let Some(inputs) = tree.get("inputs").and_then(Value::as_object) {
        for (name, input) in inputs {
            if is_absent(input.get("description")) {
                warnings.push(warn(
                    "MISSING_INPUT_DESCRIPTION",
                    format!("Input '{name}' has no description"),
                    "Describe every input so users know what to pass",
                ));
            }
        }
    }

    if let Some(outputs) = tree.get("outputs").and_then(Value::as_object) {
        for (name, output) in outputs {
            if is_absent(output.get("description")) {
                warnings.push(warn(
                    "MISSING_OUTPUT_DESCRIPTION",
                    format!("Output '{name}' has no description"),
                    "Describe every output so users know what it contains",
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"
name: Greeter
description: Says hello
author: octocat
inputs:
  who-to-greet:
    description: Who to greet
    required: true
    default: World
  retries:
    description: Retry count
    default: 3
outputs:
  time:
    description: When we greeted
runs:
  using: node24
  main: dist/main.js
  post: dist/post.js
  post-if: always()
branding:
  icon: sun
  color: yellow
"#;

    async fn validate_str(contents: &str) -> (tempfile::TempDir, Result<ManifestReport, ValidationError>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(ACTION_YML);
        std::fs::write(&path, contents).expect("write manifest");
        let result = validate_manifest(&path).await;
        (dir, result)
    }

    fn codes(items: &[ValidationItem]) -> Vec<&str> {
        items.iter().map(|item| item.code.as_str()).collect()
    }

    #[tokio::test]
    async fn complete_manifest_has_no_warnings() {
        let (_dir, result) = validate_str(COMPLETE).await;
        let report = result.expect("valid manifest");
        assert!(report.warnings.is_empty());
        assert_eq!(report.manifest.name, "Greeter");
        assert_eq!(report.manifest.runs.post_if.as_deref(), Some("always()"));

        let inputs = report.manifest.inputs.expect("inputs");
        assert_eq!(inputs["retries"].default.as_deref(), Some("3"));
        assert_eq!(inputs["who-to-greet"].required, Some(true));
    }

    #[tokio::test]
    async fn missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(ACTION_YML);
        let err = validate_manifest(&path).await.expect_err("missing");
        assert_eq!(err, ValidationError::ActionYmlMissing { path });
    }

    #[tokio::test]
    async fn unsupported_runtime_is_schema_error() {
        for runtime in ["node20", "node16", "docker", "composite"] {
            let contents = COMPLETE.replace("using: node24", &format!("using: {runtime}"));
            let (_dir, result) = validate_str(&contents).await;
            match result {
                Err(ValidationError::ActionYmlSchemaError { errors, .. }) => {
                    assert_eq!(errors.len(), 1, "runtime {runtime}");
                    assert_eq!(errors[0].path, "runs.using");
                }
                other => panic!("expected schema error for {runtime}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn schema_errors_are_collected() {
        let contents = r#"
description: 42
runs:
  main: dist/main.js
branding:
  icon: not-an-icon
  color: pink
"#;
        let (_dir, result) = validate_str(contents).await;
        match result {
            Err(ValidationError::ActionYmlSchemaError { errors, .. }) => {
                let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
                assert_eq!(
                    paths,
                    vec!["name", "description", "runs.using", "branding.icon", "branding.color"]
                );
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_yaml_reports_location() {
        let (_dir, result) = validate_str("name: [unclosed\ndescription: x\n").await;
        match result {
            Err(ValidationError::ActionYmlSyntaxError { line, .. }) => {
                assert!(line.is_some());
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_mapping_document_is_syntax_error() {
        let (_dir, result) = validate_str("- just\n- a list\n").await;
        match result {
            Err(ValidationError::ActionYmlSyntaxError { message, .. }) => {
                assert_eq!(message, "top-level value must be a mapping, got a sequence");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_branding_is_single_warning() {
        let contents = COMPLETE.replace("branding:\n  icon: sun\n  color: yellow\n", "");
        let (_dir, result) = validate_str(&contents).await;
        let report = result.expect("valid manifest");
        assert_eq!(codes(&report.warnings), vec!["MISSING_BRANDING"]);
    }

    #[tokio::test]
    async fn missing_branding_fields_warn_individually() {
        let no_icon = COMPLETE.replace("  icon: sun\n", "");
        let (_dir, result) = validate_str(&no_icon).await;
        assert_eq!(
            codes(&result.expect("valid").warnings),
            vec!["MISSING_BRANDING_ICON"]
        );

        let no_color = COMPLETE.replace("  color: yellow\n", "");
        let (_dir, result) = validate_str(&no_color).await;
        assert_eq!(
            codes(&result.expect("valid").warnings),
            vec!["MISSING_BRANDING_COLOR"]
        );
    }

    #[tokio::test]
    async fn undocumented_inputs_and_outputs_warn() {
        let contents = COMPLETE
            .replace("    description: Retry count\n", "")
            .replace("    description: When we greeted\n", "    value: ignored\n");
        let (_dir, result) = validate_str(&contents).await;
        let report = result.expect("valid manifest");
        assert_eq!(
            codes(&report.warnings),
            vec!["MISSING_INPUT_DESCRIPTION", "MISSING_OUTPUT_DESCRIPTION"]
        );
        assert_eq!(report.warnings[0].message, "Input 'retries' has no description");
        assert!(report.warnings[0].suggestion.is_some());
    }
}
