//! Build outcome types.

use std::path::PathBuf;
use std::time::Duration;

use crate::entries::EntryRole;

/// Size and timing of one written bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleStats {
    /// Entry role
    pub role: EntryRole,
    /// Bundle size in bytes
    pub size: u64,
    /// Time spent bundling and writing this entry
    pub duration: Duration,
    /// Output path relative to the project root
    pub output_path: PathBuf,
}

/// Outcome of bundling one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleResult {
    pub role: EntryRole,
    pub success: bool,
    /// Present on success
    pub stats: Option<BundleStats>,
    /// Present on failure
    pub error: Option<String>,
}

impl BundleResult {
    pub(crate) fn succeeded(stats: BundleStats) -> Self {
        Self {
            role: stats.role,
            success: true,
            stats: Some(stats),
            error: None,
        }
    }

    pub(crate) fn failed(role: EntryRole, error: impl ToString) -> Self {
        Self {
            role,
            success: false,
            stats: None,
            error: Some(error.to_string()),
        }
    }
}

/// Outcome of a whole build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// True iff every entry succeeded
    pub success: bool,
    /// One result per detected entry, in detection order
    pub entries: Vec<BundleResult>,
    /// Wall-clock time of the build call
    pub duration: Duration,
    /// Summary of failed entries
    pub error: Option<String>,
    /// Advisories such as bundles over `validation.maxBundleSize`
    pub warnings: Vec<String>,
}

impl BuildResult {
    /// Total size of all written bundles.
    pub fn total_size(&self) -> u64 {
        self.entries
            .iter()
            .filter_map(|entry| entry.stats.as_ref())
            .map(|stats| stats.size)
            .sum()
    }

    /// Roles whose bundle failed.
    pub fn failed_roles(&self) -> Vec<EntryRole> {
        self.entries
            .iter()
            .filter(|entry| !entry.success)
            .map(|entry| entry.role)
            .collect()
    }
}

/// Human-readable byte count (`512 B`, `1.5 KB`, `2.00 MB`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let value = bytes as f64;
    if value >= MB {
        format!("{:.2} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} B")
    }
}
