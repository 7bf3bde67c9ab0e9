//! Version information display
//!
//! Prints the crate version and the engine it plans runs for.

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::AchillesError;
use crate::settings::ENGINE_BINARY;

/// Print version information.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), AchillesError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version} (engine: {ENGINE_BINARY})");
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "name": name,
                "version": version,
                "engine": ENGINE_BINARY,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
