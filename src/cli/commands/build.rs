//! `build` command.

use crate::bundler::format_size;
use crate::cli::args::BuildArgs;
use crate::cli::output::OutputManager;
use crate::error::Result;
use crate::facade::{ActionBundler, FacadeBuildOptions};

/// Validates (unless `--no-validate`) and bundles every entry.
pub async fn execute(args: &BuildArgs, output: &OutputManager) -> Result<i32> {
    let bundler = ActionBundler::new(&args.project.cwd, args.project.config_source());
    output.section(&format!("Building {}", bundler.cwd().display()))?;
    if args.no_validate {
        output.warn("Skipping validation (--no-validate)")?;
    } else {
        output.progress("Validating action.yml and entry points")?;
    }

    let report = bundler
        .build(FacadeBuildOptions {
            skip_validation: args.no_validate,
            ..Default::default()
        })
        .await;

    if let Some(path) = bundler.config_file() {
        output.indent(&format!("config: {}", path.display()))?;
    }
    if let Some(validation) = &report.validation {
        output.validation(validation)?;
    }

    if let Some(build) = &report.build {
        for entry in &build.entries {
            match (&entry.stats, &entry.error) {
                (Some(stats), _) => output.success(&format!(
                    "{} → {} ({}, {} ms)",
                    entry.role,
                    stats.output_path.display(),
                    format_size(stats.size),
                    stats.duration.as_millis()
                ))?,
                (None, error) => output.error(&format!(
                    "{}: {}",
                    entry.role,
                    error.as_deref().unwrap_or("failed")
                ))?,
            }
        }
        for warning in &build.warnings {
            output.warn(warning)?;
        }
    }

    let exit_code = if report.success {
        let (count, millis) = report
            .build
            .as_ref()
            .map_or((0, 0), |b| (b.entries.len(), b.duration.as_millis()));
        let noun = if count == 1 { "entry" } else { "entries" };
        output.success(&format!("Built {count} {noun} in {millis} ms"))?;
        0
    } else {
        output.error(report.error.as_deref().unwrap_or("Build failed"))?;
        1
    };

    bundler.dispose();
    Ok(exit_code)
}
