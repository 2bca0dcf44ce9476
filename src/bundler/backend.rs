//! The bundler backend capability.
//!
//! A backend turns one entry source file into a single self-contained ES
//! module. The [`Builder`](super::Builder) owns everything around it: entry
//! detection, output layout and result aggregation.

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{BuildConfig, EsTarget};

/// Options forwarded to the backend for every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Minify output
    pub minify: bool,
    /// Emit an external source map
    pub source_map: bool,
    /// Language level
    pub target: EsTarget,
    /// Packages left out of the bundle
    pub externals: Vec<String>,
    /// Suppress backend diagnostics
    pub quiet: bool,
}

impl From<&BuildConfig> for BundleOptions {
    fn from(build: &BuildConfig) -> Self {
        Self {
            minify: build.minify,
            source_map: build.source_map,
            target: build.target,
            externals: build.externals.clone(),
            quiet: build.quiet,
        }
    }
}

/// Additional file emitted next to the bundle (e.g. a copied `.node` addon).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleAsset {
    /// Path relative to the bundle's directory
    pub path: PathBuf,
    /// File contents
    pub contents: Vec<u8>,
}

/// What a backend produced for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutput {
    /// Bundled JavaScript
    pub code: Vec<u8>,
    /// External source map, when requested and produced
    pub source_map: Option<Vec<u8>>,
    /// Other emitted files
    pub assets: Vec<BundleAsset>,
}

/// Backend failure for a single entry.
#[derive(Error, Debug)]
pub enum BundleFailure {
    /// The bundler executable is not installed
    #[error("{tool} not found (install it with `npm install --save-dev {tool}`)")]
    ToolMissing {
        /// Executable name
        tool: &'static str,
    },

    /// The bundler ran and rejected the entry
    #[error("{message}")]
    Rejected {
        /// First diagnostic reported by the bundler
        message: String,
    },

    /// The bundler reported success but wrote no bundle
    #[error("bundler produced no output for {}", .entry.display())]
    NoOutput {
        /// Entry source path
        entry: PathBuf,
    },

    /// I/O around the bundler process failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Bundles a single entry point.
pub trait BundleBackend {
    /// Bundles `entry` into a single ES module.
    fn bundle(
        &self,
        entry: &Path,
        options: &BundleOptions,
    ) -> impl Future<Output = Result<BundleOutput, BundleFailure>> + Send;

    /// Releases resources held across calls. The default does nothing.
    fn dispose(&self) {}
}
