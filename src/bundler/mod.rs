//! Bundling: the backend capability, the esbuild backend and the build
//! orchestrator.
//!
//! - [`backend`] - [`BundleBackend`] trait and its input/output types
//! - [`orchestrator`] - [`Builder`], which drives a whole build
//! - `esbuild` - [`EsbuildBackend`], the default backend
//! - `tool_detection` - cached lookup of the `esbuild` executable

pub mod backend;
mod esbuild;
pub mod orchestrator;
mod result;
mod tool_detection;

pub use backend::{BundleAsset, BundleBackend, BundleFailure, BundleOptions, BundleOutput};
pub use esbuild::EsbuildBackend;
pub use orchestrator::{BuildOptions, Builder, MODULE_MARKER};
pub use result::{BuildResult, BundleResult, BundleStats, format_size};
pub use tool_detection::find_esbuild;
