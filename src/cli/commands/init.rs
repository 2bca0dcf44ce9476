//! `init` command.

use crate::cli::args::InitArgs;
use crate::cli::output::OutputManager;
use crate::error::{BundlerError, CliError, Result};
use crate::scaffold::init_project;

/// Scaffolds a new project; an existing directory without `--force` exits 1.
pub async fn execute(args: &InitArgs, output: &OutputManager) -> Result<i32> {
    let scaffold = match init_project(&args.dir, &args.name, args.force).await {
        Ok(scaffold) => scaffold,
        Err(e @ BundlerError::Cli(CliError::TargetExists { .. })) => {
            output.error(&e.to_string())?;
            return Ok(1);
        }
        Err(e) => return Err(e),
    };

    output.success(&format!("Created {}", scaffold.root.display()))?;
    for file in &scaffold.files {
        output.indent(&file.display().to_string())?;
    }

    output.section("Next steps")?;
    output.indent(&format!("cd {}", scaffold.root.display()))?;
    output.indent("npm install")?;
    output.indent(&format!("{} build", env!("CARGO_PKG_NAME")))?;
    Ok(0)
}
