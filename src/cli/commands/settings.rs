//! `settings` command handler
//!
//! Opens the settings screen, applies the requested changes in order as if
//! the user had operated each control, dismisses the screen and prints the
//! form and the resolved run.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{OutputFormat, SettingsArgs};
use crate::cli::commands::plan::{PlanReport, render_human as render_plan};
use crate::config::load_preset;
use crate::error::{AchillesError, ConfigError};
use crate::settings::{
    Dismissed, Enablement, ExploitConfiguration, Row, SettingChange, SettingsScreen,
};

/// Screen index the settings screen is shown at.
pub const SETTINGS_SCREEN: usize = 1;

/// JSON shape of the `settings` output.
#[derive(Debug, Serialize)]
struct SettingsReport<'a> {
    rows: Vec<Row>,
    enablement: Enablement,
    rejected: Vec<String>,
    dismissed: Dismissed,
    run: PlanReport<'a>,
}

/// Apply changes to the settings screen and print the result.
///
/// # Errors
///
/// Returns an error if the preset cannot be loaded, or if `--strict` is set
/// and a change addresses a disabled field.
pub fn run(args: &SettingsArgs) -> Result<(), AchillesError> {
    let config = match &args.preset {
        Some(path) => {
            tracing::info!(preset = %path.display(), "loading preset");
            load_preset(path)?
        }
        None => ExploitConfiguration::default(),
    };

    let mut screen = SettingsScreen::open(SETTINGS_SCREEN, config);
    screen.subscribe(|change: &SettingChange, config: &ExploitConfiguration| {
        tracing::info!(%change, mode = ?config.run_mode(), "setting changed");
    });

    let rejected = apply_changes(&mut screen, &args.changes, args.strict)?;

    let rows = screen.rows();
    let enablement = screen.config().enablement();
    let options = screen.run_options();
    let dismissed = screen.dismiss();

    let run = PlanReport::new(&options)?;
    match args.format {
        OutputFormat::Human => {
            print!("{}", render_rows(&rows));
            println!();
            println!("dismissed: screen {} -> {}", dismissed.from, dismissed.to);
            println!();
            print!("{}", render_plan(&run));
        }
        OutputFormat::Json => {
            let report = SettingsReport {
                rows,
                enablement,
                rejected: rejected.iter().map(ToString::to_string).collect(),
                dismissed,
                run,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Applies `changes` in order, returning the ones that were rejected.
///
/// # Errors
///
/// With `strict`, the first rejected change is returned as
/// [`ConfigError::RejectedChange`].
pub fn apply_changes<'c>(
    screen: &mut SettingsScreen,
    changes: &'c [SettingChange],
    strict: bool,
) -> Result<Vec<&'c SettingChange>, ConfigError> {
    let mut rejected = Vec::new();
    for change in changes {
        let field = change.field();
        let reason = screen.config().disabled_reason(field);
        if screen.apply(change) {
            continue;
        }
        let reason = reason.unwrap_or_default();
        if strict {
            return Err(ConfigError::RejectedChange {
                field: field.to_string(),
                reason,
            });
        }
        tracing::warn!(%change, %reason, "change rejected, field is disabled");
        rejected.push(change);
    }
    Ok(rejected)
}

/// Renders the form grouped by section, marking disabled controls.
#[must_use]
pub fn render_rows(rows: &[Row]) -> String {
    let mut out = String::new();
    let mut section = None;
    for row in rows {
        if section != Some(row.section) {
            if section.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", row.section.title());
            section = Some(row.section);
        }
        let marker = if row.enabled { "" } else { "  (disabled)" };
        let _ = writeln!(out, "  {:<32}{}{marker}", row.label, row.value);
    }
    out
}
