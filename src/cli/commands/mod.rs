//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod plan;
pub mod settings;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::AchillesError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), AchillesError> {
    let verbosity = cli.verbosity_level();
    match cli.command {
        Commands::Plan(args) => plan::run(&args, verbosity),
        Commands::Settings(args) => settings::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}
