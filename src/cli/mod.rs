//! Command line interface for the action bundler.
//!
//! Parses arguments, dispatches to a command and turns its outcome into a
//! process exit code.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BuildArgs, Command, InitArgs, ProjectArgs, ValidateArgs};
pub use output::OutputManager;

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let output = OutputManager::new(args.quiet());
    match &args.command {
        Command::Build(build) => commands::build::execute(build, &output).await,
        Command::Validate(validate) => commands::validate::execute(validate, &output).await,
        Command::Init(init) => commands::init::execute(init, &output).await,
    }
}
