//! `plan` command handler
//!
//! Validates engine flags, resolves them and prints the run the engine
//! would perform.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::config::Validator;
use crate::error::{AchillesError, ConfigError};
use crate::settings::{RunOptions, RunPlan};

/// JSON shape of a resolved run.
#[derive(Debug, Serialize)]
pub struct PlanReport<'a> {
    pub options: &'a RunOptions,
    pub args: Vec<String>,
    pub command_line: String,
}

impl<'a> PlanReport<'a> {
    /// # Errors
    ///
    /// Returns an error if the command line cannot be quoted.
    pub fn new(options: &'a RunOptions) -> Result<Self, AchillesError> {
        Ok(Self {
            options,
            args: options.to_args(),
            command_line: options.command_line()?,
        })
    }
}

/// Validate engine flags and print the resolved run.
///
/// # Errors
///
/// Returns a configuration error listing every contradiction if the flags
/// cannot be used together.
pub fn run(args: &PlanArgs, verbosity: u8) -> Result<(), AchillesError> {
    let mut launch = args.launch.clone();
    launch.verbosity = verbosity;

    tracing::debug!(flags = ?launch.set_flags(), "parsed engine flags");

    let result = Validator::new().validate(&launch);
    for warning in &result.warnings {
        tracing::warn!(option = %warning.path, "{}", warning.message);
    }
    if result.has_errors() {
        for error in &result.errors {
            tracing::error!(option = %error.path, "{}", error.message);
        }
        return Err(ConfigError::ValidationError {
            source_name: "command line".to_string(),
            errors: result.errors,
        }
        .into());
    }

    let options = launch.resolve();
    tracing::info!(mode = %options.mode(), "run resolved");

    let report = PlanReport::new(&options)?;
    match args.format {
        OutputFormat::Human => print!("{}", render_human(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Renders a resolved run as aligned `key: value` lines.
#[must_use]
pub fn render_human(report: &PlanReport<'_>) -> String {
    let options = report.options;
    let yes_no = |b: bool| if b { "yes" } else { "no" };

    let mut out = String::new();
    let _ = writeln!(out, "{:<16}{}", "mode:", options.mode());
    let _ = writeln!(out, "{:<16}{}", "verbosity:", options.verbosity.level());
    let _ = writeln!(out, "{:<16}{}", "debug:", yes_no(options.debug));
    let _ = writeln!(out, "{:<16}{}", "quick:", yes_no(options.quick));

    if let RunPlan::PongoOnly(boot) | RunPlan::Jailbreak(boot) = &options.plan {
        let _ = writeln!(out, "{:<16}{}", "boot mode:", boot.boot_mode);
        let _ = writeln!(out, "{:<16}{:?}", "boot arguments:", boot.boot_arguments);
    }

    let overrides = [
        ("pongo:", &options.overrides.pongo),
        ("kpf:", &options.overrides.kpf),
        ("ramdisk:", &options.overrides.ramdisk),
        ("overlay:", &options.overrides.overlay),
    ];
    for (label, path) in overrides {
        if let Some(path) = path {
            let _ = writeln!(out, "{label:<16}{}", path.display());
        }
    }

    let _ = writeln!(out, "{:<16}{}", "command:", report.command_line);
    out
}
