//! Command execution for `build`, `validate` and `init`.
//!
//! Each command returns the process exit code; typed failures are reported
//! through the [`OutputManager`](super::OutputManager).

pub mod build;
pub mod init;
pub mod validate;
