//! CLI argument definitions
//!
//! All Clap derive structs for `achilles` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::LaunchOptions;
use crate::observability::LogFormat;
use crate::settings::{Field, SettingChange};

// ============================================================================
// Root CLI
// ============================================================================

/// Plan and check runs of the Achilles checkm8 utility.
///
/// `-V` belongs to the engine's `--verbose-boot`, so the version is only
/// available as the `version` subcommand.
#[derive(Parser, Debug)]
#[command(name = "achilles", author, about, disable_version_flag = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Also the engine
    /// verbosity for `plan`, capped at 2.
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Set verbosity as a number instead of repeating `-v`.
    #[arg(long, value_name = "LEVEL", global = true, conflicts_with = "verbose")]
    pub verbosity: Option<u8>,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "ACHILLES_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "ACHILLES_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Verbosity from `--verbosity LEVEL`, or the count of `-v`.
    #[must_use]
    pub fn verbosity_level(&self) -> u8 {
        self.verbosity.unwrap_or(self.verbose)
    }
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check engine flags for contradictions and print the resolved run.
    Plan(PlanArgs),

    /// Drive the settings screen and print the resulting run.
    Settings(SettingsArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Plan / Settings
// ============================================================================

/// Arguments for `plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Engine flags.
    #[command(flatten)]
    pub launch: LaunchOptions,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `settings`.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// YAML preset to start from instead of the defaults.
    #[arg(long, env = "ACHILLES_PRESET")]
    pub preset: Option<PathBuf>,

    /// Change a field, as `FIELD=VALUE` (e.g. `jailbreak=false`,
    /// `boot-arguments=serial=3`). Applied in order.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_change)]
    pub changes: Vec<SettingChange>,

    /// Fail if any change is rejected because its field is disabled.
    #[arg(long)]
    pub strict: bool,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Parses a `FIELD=VALUE` pair into a settings change.
///
/// # Errors
///
/// Returns a message if the field is unknown or a toggle value is not a
/// boolean.
pub fn parse_change(raw: &str) -> Result<SettingChange, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field: Field = name.parse().map_err(|e| format!("{e}"))?;

    match field {
        Field::BootArguments => Ok(SettingChange::BootArguments(value.to_string())),
        Field::Toggle(toggle) => {
            let value = match value.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => true,
                "false" | "off" | "no" | "0" => false,
                other => return Err(format!("expected a boolean for '{name}', got '{other}'")),
            };
            Ok(SettingChange::Toggle { toggle, value })
        }
    }
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: clap_complete::Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// JSON.
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::settings::Toggle;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_accepts_engine_short_flags() {
        let cli = Cli::try_parse_from([
            "achilles", "plan", "-vv", "-d", "-j", "-V", "-b", "serial=3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert!(args.launch.debug);
        assert!(args.launch.jailbreak);
        assert!(args.launch.verbose_boot);
        assert_eq!(args.launch.boot_args.as_deref(), Some("serial=3"));
    }

    #[test]
    fn verbosity_accepts_a_level() {
        let cli = Cli::try_parse_from(["achilles", "plan", "--verbosity", "2", "-e"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["achilles", "plan", "-v", "-e"]).unwrap();
        assert_eq!(cli.verbosity_level(), 1);

        let cli = Cli::try_parse_from(["achilles", "plan", "-e"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn verbosity_level_conflicts_with_count() {
        assert!(Cli::try_parse_from(["achilles", "plan", "-v", "--verbosity", "2"]).is_err());
    }

    #[test]
    fn settings_collects_changes_in_order() {
        let cli = Cli::try_parse_from([
            "achilles",
            "settings",
            "--set",
            "jailbreak=false",
            "--set",
            "exploit-only=on",
        ])
        .unwrap();
        let Commands::Settings(args) = cli.command else {
            panic!("expected settings");
        };
        assert_eq!(
            args.changes,
            vec![
                SettingChange::Toggle {
                    toggle: Toggle::Jailbreak,
                    value: false,
                },
                SettingChange::Toggle {
                    toggle: Toggle::ExploitOnly,
                    value: true,
                },
            ]
        );
    }

    #[test]
    fn parse_change_keeps_everything_after_first_equals() {
        assert_eq!(
            parse_change("boot-arguments=serial=3 rd=md0"),
            Ok(SettingChange::BootArguments("serial=3 rd=md0".to_string()))
        );
    }

    #[test]
    fn parse_change_rejects_bad_input() {
        assert!(parse_change("jailbreak").is_err());
        assert!(parse_change("jailbreak=maybe").is_err());
        assert!(parse_change("teleport=true").is_err());
    }
}
