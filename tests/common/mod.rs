//! Common test utilities for integration tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kodegen_bundler_action::bundler::{BundleBackend, BundleFailure, BundleOptions, BundleOutput};
use tempfile::TempDir;

/// Manifest that validates without warnings
#[allow(dead_code)]
pub const VALID_MANIFEST: &str = "\
name: Greeter
description: Says hello
inputs:
  who-to-greet:
    description: Who to greet
    default: World
outputs:
  greeting:
    description: The greeting
runs:
  using: node24
  main: dist/main.js
  post: dist/post.js
branding:
  icon: sun
  color: yellow
";

/// A temporary action project
pub struct TestProject {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Project root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Create an empty project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) -> &Self {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        self
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

/// Backend answering from a script keyed by entry file stem.
///
/// Unscripted entries bundle to `// <stem>`.
#[derive(Default)]
#[allow(dead_code)]
pub struct ScriptedBackend {
    outputs: HashMap<String, Result<BundleOutput, String>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `stem` fail with `message`
    pub fn failing(mut self, stem: &str, message: &str) -> Self {
        self.outputs
            .insert(stem.to_string(), Err(message.to_string()));
        self
    }

    /// Make `stem` produce `output`
    pub fn producing(mut self, stem: &str, output: BundleOutput) -> Self {
        self.outputs.insert(stem.to_string(), Ok(output));
        self
    }

    /// Entry stems bundled so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl BundleBackend for ScriptedBackend {
    async fn bundle(
        &self,
        entry: &Path,
        _options: &BundleOptions,
    ) -> Result<BundleOutput, BundleFailure> {
        let stem = entry
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        self.calls.lock().expect("calls lock").push(stem.clone());

        match self.outputs.get(&stem) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(BundleFailure::Rejected {
                message: message.clone(),
            }),
            None => Ok(BundleOutput {
                code: format!("// {stem}\n").into_bytes(),
                ..Default::default()
            }),
        }
    }
}

/// Environment with no CI indicators
#[allow(dead_code)]
pub fn no_ci() -> HashMap<String, String> {
    HashMap::new()
}
