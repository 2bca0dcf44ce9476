//! Loading a configuration module's default export.
//!
//! Configuration is code: `action.config.ts` runs to produce its default
//! export. [`ModuleLoader`] is the seam for that capability, so the pipeline
//! can use [`StaticModuleLoader`] (data formats only) where executing project
//! code is not acceptable.

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde_json::Value;

/// Loads the default export of the module at a path.
///
/// Failures are reported as a human-readable cause; the caller attaches the path.
pub trait ModuleLoader {
    /// Evaluates the module and returns its default export as JSON.
    fn load_default_export(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Value, String>> + Send;
}

/// Parses data-only configuration files (`.json`, `.toml`, `.yaml`, `.yml`).
///
/// The whole document is treated as the default export.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticModuleLoader;

impl StaticModuleLoader {
    /// Whether this loader understands the file's extension.
    pub fn supports(path: &Path) -> bool {
        matches!(
            extension(path).as_deref(),
            Some("json" | "toml" | "yaml" | "yml")
        )
    }
}

impl ModuleLoader for StaticModuleLoader {
    async fn load_default_export(&self, path: &Path) -> Result<Value, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;

        match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&contents).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&contents).map_err(|e| e.to_string()),
            Some("yaml" | "yml") => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
            other => Err(format!(
                "unsupported configuration format: {}",
                other.unwrap_or("<none>")
            )),
        }
    }
}

/// Evaluates JavaScript and TypeScript configuration modules with an external
/// JS runtime, delegating data formats to [`StaticModuleLoader`].
///
/// TypeScript modules run under `tsx` when available, otherwise under
/// `node --experimental-strip-types`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeModuleLoader {
    fallback: StaticModuleLoader,
}

/// Script that imports the module named by its first argument and prints the
/// default export as JSON.
const LOADER_SCRIPT: &str = r#"import { pathToFileURL } from 'node:url';
const mod = await import(pathToFileURL(process.argv[2]).href);
const value = mod.default === undefined ? null : mod.default;
process.stdout.write(JSON.stringify(value) ?? 'null');
"#;

/// `node` executable, if installed.
static NODE: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("node"));

/// `tsx` executable, if installed.
static TSX: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("tsx"));

fn locate(tool: &str) -> Option<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            None
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

impl NodeModuleLoader {
    /// Chooses the program and leading arguments for evaluating `path`.
    fn runtime_for(path: &Path) -> Result<(PathBuf, Vec<&'static str>), String> {
        let typescript = matches!(extension(path).as_deref(), Some("ts" | "mts" | "cts"));

        if typescript {
            if let Some(tsx) = TSX.as_ref() {
                return Ok((tsx.clone(), Vec::new()));
            }
            if let Some(node) = NODE.as_ref() {
                return Ok((
                    node.clone(),
                    vec!["--experimental-strip-types", "--no-warnings"],
                ));
            }
            return Err(
                "no TypeScript runtime found in PATH (install tsx or node >= 22.6)".to_string(),
            );
        }

        NODE.as_ref()
            .map(|node| (node.clone(), Vec::new()))
            .ok_or_else(|| "node not found in PATH".to_string())
    }

    async fn evaluate(&self, path: &Path) -> Result<Value, String> {
        let (program, leading_args) = Self::runtime_for(path)?;

        let mut script = tempfile::Builder::new()
            .prefix("kodegen-config-")
            .suffix(".mjs")
            .tempfile()
            .map_err(|e| format!("failed to create loader script: {e}"))?;
        script
            .write_all(LOADER_SCRIPT.as_bytes())
            .map_err(|e| format!("failed to write loader script: {e}"))?;

        log::debug!(
            "Evaluating {} with {}",
            path.display(),
            program.display()
        );

        let mut command = tokio::process::Command::new(&program);
        command.args(&leading_args).arg(script.path()).arg(path);
        if let Some(dir) = path.parent() {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", program.display(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(stderr
                .lines()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.trim().to_string())
                .unwrap_or_else(|| format!("module evaluation exited with {}", output.status)));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("module produced unreadable output: {e}"))
    }
}

impl ModuleLoader for NodeModuleLoader {
    async fn load_default_export(&self, path: &Path) -> Result<Value, String> {
        if StaticModuleLoader::supports(path) {
            return self.fallback.load_default_export(path).await;
        }
        self.evaluate(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn static_loader_reads_each_format() {
        let dir = tempfile::tempdir().expect("tempdir");

        let json_path = dir.path().join("action.config.json");
        std::fs::write(&json_path, r#"{"build": {"minify": false}}"#).expect("write json");
        let toml_path = dir.path().join("action.config.toml");
        std::fs::write(&toml_path, "[build]\nminify = false\n").expect("write toml");
        let yaml_path = dir.path().join("action.config.yaml");
        std::fs::write(&yaml_path, "build:\n  minify: false\n").expect("write yaml");

        let loader = StaticModuleLoader;
        for path in [json_path, toml_path, yaml_path] {
            let value = loader.load_default_export(&path).await.expect("parsed");
            assert_eq!(value, json!({"build": {"minify": false}}));
        }
    }

    #[tokio::test]
    async fn static_loader_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("action.config.json");
        std::fs::write(&path, "{ not json").expect("write");

        let err = StaticModuleLoader
            .load_default_export(&path)
            .await
            .expect_err("syntax error");
        assert!(!err.is_empty());
    }

    #[tokio::test]
    async fn static_loader_rejects_code_modules() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("action.config.ts");
        std::fs::write(&path, "export default {}").expect("write");

        let err = StaticModuleLoader
            .load_default_export(&path)
            .await
            .expect_err("unsupported");
        assert!(err.contains("unsupported configuration format"));
    }

    #[test]
    fn node_loader_delegates_data_formats() {
        assert!(StaticModuleLoader::supports(Path::new("a/action.config.JSON")));
        assert!(StaticModuleLoader::supports(Path::new("action.config.yml")));
        assert!(!StaticModuleLoader::supports(Path::new("action.config.mjs")));
    }
}
