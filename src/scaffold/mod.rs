//! Project scaffolding for `init`.
//!
//! Renders a minimal TypeScript action that validates and builds out of the box.

mod templates;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::Regex;

use crate::config::EsTarget;
use crate::error::{CliError, Result};
use crate::manifest::SUPPORTED_RUNTIME;
use crate::utils::fs::write_file;

use templates::PROJECT_FILES;

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("project name pattern is valid")
});

/// A freshly scaffolded project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    /// Project directory
    pub root: PathBuf,
    /// Written files, relative to `root`
    pub files: Vec<PathBuf>,
}

/// `my-action` -> `My Action`
fn title_case(name: &str) -> String {
    name.split(['-', '_', '.'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders `value` as a YAML scalar, quoted when it would otherwise read as
/// a number, boolean or null.
fn yaml_scalar(value: &str) -> Result<String> {
    let rendered = serde_yaml::to_string(value).map_err(anyhow::Error::from)?;
    Ok(rendered.trim_end().to_string())
}

/// Creates `<parent>/<name>` with a starter action.
///
/// An existing directory is only written into when `force` is set; files the
/// scaffold does not produce are left alone.
///
/// # Errors
///
/// - [`CliError::InvalidArguments`] for names that are not a single path segment
/// - [`CliError::TargetExists`] when the directory exists and `force` is false
pub async fn init_project(parent: &Path, name: &str, force: bool) -> Result<Scaffold> {
    if !PROJECT_NAME.is_match(name) {
        return Err(CliError::InvalidArguments {
            reason: format!(
                "invalid project name {name:?}: use letters, digits, '-', '_' or '.'"
            ),
        }
        .into());
    }

    let root = parent.join(name);
    if tokio::fs::try_exists(&root).await? {
        if !force {
            return Err(CliError::TargetExists { path: root }.into());
        }
        log::warn!("Writing into existing directory {}", root.display());
    }

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    for (path, template) in PROJECT_FILES {
        handlebars
            .register_template_string(path, template)
            .map_err(|e| anyhow::anyhow!("failed to register {} template: {}", path, e))?;
    }

    let title = title_case(name);
    let mut data = BTreeMap::new();
    data.insert("name", name.to_string());
    data.insert("package_name", name.to_ascii_lowercase());
    data.insert(
        "description_yaml",
        yaml_scalar(&format!("{title} GitHub Action"))?,
    );
    data.insert("title_yaml", yaml_scalar(&title)?);
    data.insert("runtime", SUPPORTED_RUNTIME.to_string());
    data.insert("target", EsTarget::default().to_string());
    data.insert("bin", env!("CARGO_PKG_NAME").to_string());

    let mut files = Vec::with_capacity(PROJECT_FILES.len());
    for (path, _) in PROJECT_FILES {
        let contents = handlebars.render(path, &data)?;
        write_file(&root.join(path), contents).await?;
        log::debug!("Wrote {}", root.join(path).display());
        files.push(PathBuf::from(path));
    }

    log::info!("Scaffolded {} in {}", name, root.display());
    Ok(Scaffold { root, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, LoadOptions, StaticModuleLoader};
    use crate::error::BundlerError;
    use crate::manifest::validate_manifest;
    use crate::validation::{ValidateOptions, Validator};
    use std::collections::HashMap;

    #[test]
    fn titles_from_names() {
        assert_eq!(title_case("my-action"), "My Action");
        assert_eq!(title_case("hello_world.v2"), "Hello World V2");
        assert_eq!(title_case("x"), "X");
    }

    #[tokio::test]
    async fn scaffold_writes_every_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scaffold = init_project(dir.path(), "my-action", false)
            .await
            .expect("scaffold");

        assert_eq!(scaffold.root, dir.path().join("my-action"));
        assert_eq!(scaffold.files.len(), PROJECT_FILES.len());
        for file in &scaffold.files {
            assert!(scaffold.root.join(file).is_file(), "{}", file.display());
        }

        let manifest =
            std::fs::read_to_string(scaffold.root.join("action.yml")).expect("read manifest");
        assert!(manifest.starts_with("name: My Action\n"));
        assert!(manifest.contains("using: node24"));

        let package: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(scaffold.root.join("package.json")).expect("read package"),
        )
        .expect("package.json is valid JSON");
        assert_eq!(package["name"], "my-action");
    }

    #[tokio::test]
    async fn scaffold_is_valid_and_configured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scaffold = init_project(dir.path(), "Greeter", false)
            .await
            .expect("scaffold");

        let loaded = ConfigLoader::new(StaticModuleLoader)
            .load(&LoadOptions::new(&scaffold.root))
            .await
            .expect("config loads");
        assert_eq!(loaded.config.validation.max_bundle_size.as_deref(), Some("5mb"));

        let result = Validator::with_env(HashMap::new())
            .validate(&loaded.config, &ValidateOptions::new(&scaffold.root).strict(true))
            .await
            .expect("no warnings");
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn yaml_scalars_keep_strings_strings() {
        assert_eq!(yaml_scalar("My Action").expect("render"), "My Action");
        for ambiguous in ["2048", "true", "null", "1.5"] {
            let rendered = yaml_scalar(ambiguous).expect("render");
            let parsed: serde_yaml::Value = serde_yaml::from_str(&rendered).expect("parse");
            assert_eq!(parsed, serde_yaml::Value::String(ambiguous.to_string()));
        }
    }

    #[tokio::test]
    async fn scalar_like_names_produce_valid_manifests() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["2048", "true", "null", "1.5"] {
            let scaffold = init_project(dir.path(), name, false)
                .await
                .expect("scaffold");
            let report = validate_manifest(&scaffold.root.join("action.yml"))
                .await
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(report.warnings.is_empty(), "{name}: {:?}", report.warnings);
        }
    }

    #[tokio::test]
    async fn existing_directory_requires_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("taken")).expect("mkdir");
        std::fs::write(dir.path().join("taken/notes.txt"), "keep").expect("write");

        let err = init_project(dir.path(), "taken", false)
            .await
            .expect_err("exists");
        assert!(matches!(
            err,
            BundlerError::Cli(CliError::TargetExists { .. })
        ));

        init_project(dir.path(), "taken", true)
            .await
            .expect("forced");
        assert!(dir.path().join("taken/action.yml").exists());
        assert!(dir.path().join("taken/notes.txt").exists());
    }

    #[tokio::test]
    async fn rejects_path_like_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["", "..", "a/b", "-flag", "with space"] {
            let err = init_project(dir.path(), name, false)
                .await
                .expect_err(name);
            assert!(
                matches!(err, BundlerError::Cli(CliError::InvalidArguments { .. })),
                "{name}"
            );
        }
    }
}
