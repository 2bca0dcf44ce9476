//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap derive, with
//! consistency checks that clap cannot express.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::facade::ConfigSource;

/// TypeScript bundler for GitHub JavaScript actions
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_action",
    version,
    about = "TypeScript bundler for GitHub JavaScript actions",
    long_about = "Bundles a TypeScript GitHub Action into single-file ES modules for the node24 runtime.

Entry points are src/main.ts, src/pre.ts and src/post.ts (configurable); bundles are
written to dist/<role>.js next to a dist/package.json module marker. action.yml is
checked before building.

Usage:
  kodegen_bundler_action init my-action
  kodegen_bundler_action validate --strict
  kodegen_bundler_action build --cwd ./my-action

Exit code 0 = validation passed and every entry was bundled."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and bundle every entry point into dist/
    Build(BuildArgs),

    /// Check entry points and action.yml without building
    Validate(ValidateArgs),

    /// Scaffold a new TypeScript action project
    Init(InitArgs),
}

/// Options shared by commands that operate on a project
#[derive(clap::Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Configuration file (default: search for action.config.*)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl ProjectArgs {
    /// Configuration source selected by `--config`.
    pub fn config_source(&self) -> ConfigSource {
        match &self.config {
            Some(path) => ConfigSource::Path(path.clone()),
            None => ConfigSource::Auto,
        }
    }
}

/// `build` options
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Skip validation before building
    #[arg(long)]
    pub no_validate: bool,
}

/// `validate` options
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Treat warnings as errors
    #[arg(long, conflicts_with = "no_strict")]
    pub strict: bool,

    /// Never treat warnings as errors, even in CI
    #[arg(long)]
    pub no_strict: bool,
}

impl ValidateArgs {
    /// Strict mode override; `None` defers to configuration and CI detection.
    pub fn strict_override(&self) -> Option<bool> {
        match (self.strict, self.no_strict) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// `init` options
#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    /// Project name, also used as the directory name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Write into an existing directory
    #[arg(short, long)]
    pub force: bool,

    /// Parent directory for the new project
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether output should be limited to errors
    pub fn quiet(&self) -> bool {
        match &self.command {
            Command::Build(args) => args.project.quiet,
            Command::Validate(args) => args.project.quiet,
            Command::Init(_) => false,
        }
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let project = match &self.command {
            Command::Build(args) => &args.project,
            Command::Validate(args) => &args.project,
            Command::Init(args) => {
                if !args.dir.is_dir() {
                    return Err(format!("Directory does not exist: {}", args.dir.display()));
                }
                return Ok(());
            }
        };

        if !project.cwd.is_dir() {
            return Err(format!(
                "Project directory does not exist: {}",
                project.cwd.display()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("kodegen_bundler_action").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn build_flags() {
        let args = parse(&["build", "--config", "cfg.json", "--quiet", "--no-validate"]);
        match args.command {
            Command::Build(build) => {
                assert!(build.no_validate);
                assert!(build.project.quiet);
                assert_eq!(
                    build.project.config_source(),
                    ConfigSource::Path(PathBuf::from("cfg.json"))
                );
                assert_eq!(build.project.cwd, PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn strict_flags_are_tri_state() {
        let strict = |argv: &[&str]| match parse(argv).command {
            Command::Validate(validate) => validate.strict_override(),
            other => panic!("unexpected command: {other:?}"),
        };
        assert_eq!(strict(&["validate"]), None);
        assert_eq!(strict(&["validate", "--strict"]), Some(true));
        assert_eq!(strict(&["validate", "--no-strict"]), Some(false));

        let conflict = Args::try_parse_from(["kodegen_bundler_action", "validate", "--strict", "--no-strict"]);
        assert!(conflict.is_err());
    }

    #[test]
    fn init_requires_name() {
        assert!(Args::try_parse_from(["kodegen_bundler_action", "init"]).is_err());
        match parse(&["init", "my-action", "--force"]).command {
            Command::Init(init) => {
                assert_eq!(init.name, "my-action");
                assert!(init.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_cwd_is_rejected() {
        let args = parse(&["validate", "--cwd", "/definitely/not/here"]);
        assert!(args.validate().is_err());
    }
}
