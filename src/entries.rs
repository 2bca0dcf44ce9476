//! Entry point discovery.
//!
//! An action has up to three JavaScript entry points, one per lifecycle role.
//! The primary entry must exist; the pre and post steps are bundled only when
//! their source file is present.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::EntriesConfig;
use crate::error::ValidationError;
use crate::utils::fs::{exists, resolve_path};

/// Directory that receives bundle output, relative to the project root.
pub const OUTPUT_DIR: &str = "dist";

/// Extension of bundled output files.
pub const OUTPUT_EXTENSION: &str = "js";

/// Lifecycle position of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    /// `runs.main`
    Main,
    /// `runs.pre`
    Pre,
    /// `runs.post`
    Post,
}

impl EntryRole {
    /// All roles in bundling order.
    pub const ALL: [EntryRole; 3] = [EntryRole::Main, EntryRole::Pre, EntryRole::Post];

    /// Role name as used in paths and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }

    /// Conventional source path for this role.
    pub fn default_source(self) -> &'static str {
        match self {
            Self::Main => crate::config::DEFAULT_MAIN_ENTRY,
            Self::Pre => "src/pre.ts",
            Self::Post => "src/post.ts",
        }
    }

    /// Output path for this role, relative to the project root (`dist/<role>.js`).
    pub fn output_path(self) -> PathBuf {
        Path::new(OUTPUT_DIR).join(format!("{}.{}", self.as_str(), OUTPUT_EXTENSION))
    }
}

impl fmt::Display for EntryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry point found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedEntry {
    /// Lifecycle role
    pub role: EntryRole,
    /// Absolute source path
    pub source_path: PathBuf,
    /// Output path relative to the project root
    pub output_path: PathBuf,
}

/// Result of entry detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectEntriesResult {
    /// Entries present on disk, ordered main, pre, post
    pub entries: Vec<DetectedEntry>,
    /// Optional entries that were configured explicitly but do not exist
    pub missing_explicit: Vec<(EntryRole, PathBuf)>,
}

impl DetectEntriesResult {
    /// The entry for `role`, if detected.
    pub fn get(&self, role: EntryRole) -> Option<&DetectedEntry> {
        self.entries.iter().find(|entry| entry.role == role)
    }
}

/// Detects which entry points exist under `cwd`.
///
/// # Errors
///
/// Returns [`ValidationError::MainEntryMissing`] when the primary entry does
/// not exist. Missing pre/post entries are simply left out.
pub async fn detect_entries(
    cwd: &Path,
    entries: Option<&EntriesConfig>,
) -> Result<DetectEntriesResult, ValidationError> {
    let main = entries
        .map(|e| e.main.as_str())
        .unwrap_or(EntryRole::Main.default_source());
    let main_path = resolve_path(cwd, Path::new(main));

    if !exists(&main_path).await {
        return Err(ValidationError::MainEntryMissing {
            expected_path: main_path,
            cwd: cwd.to_path_buf(),
        });
    }

    let mut result = DetectEntriesResult {
        entries: vec![DetectedEntry {
            role: EntryRole::Main,
            source_path: main_path,
            output_path: EntryRole::Main.output_path(),
        }],
        missing_explicit: Vec::new(),
    };

    for role in [EntryRole::Pre, EntryRole::Post] {
        let explicit = entries.and_then(|e| match role {
            EntryRole::Pre => e.pre.as_deref(),
            _ => e.post.as_deref(),
        });
        let source_path = resolve_path(cwd, Path::new(explicit.unwrap_or(role.default_source())));

        if exists(&source_path).await {
            log::debug!("Detected {} entry: {}", role, source_path.display());
            result.entries.push(DetectedEntry {
                role,
                source_path,
                output_path: role.output_path(),
            });
        } else if explicit.is_some() {
            log::debug!(
                "Configured {} entry does not exist: {}",
                role,
                source_path.display()
            );
            result.missing_explicit.push((role, source_path));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, "export {};\n").expect("write entry");
    }

    #[tokio::test]
    async fn empty_project_is_missing_main() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = detect_entries(dir.path(), None).await.expect_err("missing main");
        assert_eq!(
            err,
            ValidationError::MainEntryMissing {
                expected_path: dir.path().join("src/main.ts"),
                cwd: dir.path().to_path_buf(),
            }
        );
    }

    #[tokio::test]
    async fn main_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/main.ts");

        let result = detect_entries(dir.path(), None).await.expect("detected");
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].role, EntryRole::Main);
        assert_eq!(result.entries[0].source_path, dir.path().join("src/main.ts"));
        assert_eq!(result.entries[0].output_path, PathBuf::from("dist/main.js"));
        assert!(result.missing_explicit.is_empty());
    }

    #[tokio::test]
    async fn all_three_roles_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/main.ts");
        touch(dir.path(), "src/pre.ts");
        touch(dir.path(), "src/post.ts");

        let result = detect_entries(dir.path(), None).await.expect("detected");
        let roles: Vec<EntryRole> = result.entries.iter().map(|e| e.role).collect();
        assert_eq!(roles, EntryRole::ALL.to_vec());
        assert_eq!(
            result.get(EntryRole::Post).map(|e| e.output_path.clone()),
            Some(PathBuf::from("dist/post.js"))
        );
    }

    #[tokio::test]
    async fn explicit_paths_override_convention() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "lib/index.ts");
        touch(dir.path(), "lib/setup.ts");
        touch(dir.path(), "src/post.ts");

        let config = EntriesConfig {
            main: "lib/index.ts".to_string(),
            pre: Some("lib/setup.ts".to_string()),
            post: Some("lib/teardown.ts".to_string()),
        };
        let result = detect_entries(dir.path(), Some(&config))
            .await
            .expect("detected");

        let roles: Vec<EntryRole> = result.entries.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![EntryRole::Main, EntryRole::Pre]);
        assert_eq!(
            result.get(EntryRole::Pre).map(|e| e.source_path.clone()),
            Some(dir.path().join("lib/setup.ts"))
        );
        assert_eq!(
            result.missing_explicit,
            vec![(EntryRole::Post, dir.path().join("lib/teardown.ts"))]
        );
    }
}
