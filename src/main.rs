//! Kodegen Bundler Action - TypeScript bundler for GitHub JavaScript actions.
//!
//! This binary validates an action project and bundles its entry points into
//! `dist/`, exiting non-zero on any validation or build failure.

use std::process;

use kodegen_bundler_action::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
