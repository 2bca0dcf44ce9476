//! Bundler for TypeScript GitHub JavaScript actions.
//!
//! This library packages an action's TypeScript entry points into single-file
//! ES modules for the `node24` runtime:
//! - configuration resolution (`action.config.*`, config-as-code or data files)
//! - entry point detection (`main`, `pre`, `post`)
//! - `action.yml` schema validation with advisory warnings
//! - sequential bundling into `dist/` through a pluggable backend
//!
//! It can be used both as a CLI tool and as a library dependency; the
//! [`ActionBundler`](facade::ActionBundler) facade is the simplest entry point.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod entries;
pub mod error;
pub mod facade;
pub mod manifest;
pub mod scaffold;
pub mod schema;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use error::{BuildError, BundlerError, CliError, ConfigError, Result, ValidationError};
pub use facade::{ActionBundler, BuildReport, ConfigSource, FacadeBuildOptions, Report};
