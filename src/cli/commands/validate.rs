//! `validate` command.

use crate::cli::args::ValidateArgs;
use crate::cli::output::OutputManager;
use crate::error::Result;
use crate::facade::ActionBundler;

/// Validates the project and prints every finding.
pub async fn execute(args: &ValidateArgs, output: &OutputManager) -> Result<i32> {
    let bundler = ActionBundler::new(&args.project.cwd, args.project.config_source());
    output.section(&format!("Validating {}", bundler.cwd().display()))?;

    let report = bundler.validate(args.strict_override()).await;
    if let Some(path) = bundler.config_file() {
        output.indent(&format!("config: {}", path.display()))?;
    }
    if let Some(result) = &report.value {
        output.validation(result)?;
    }

    let exit_code = if report.success {
        let warnings = report.value.as_ref().map_or(0, |r| r.warnings.len());
        output.success(&format!("Validation passed ({warnings} warning(s))"))?;
        0
    } else {
        output.error(report.error.as_deref().unwrap_or("Validation failed"))?;
        1
    };

    bundler.dispose();
    Ok(exit_code)
}
