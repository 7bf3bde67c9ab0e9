//! Run-option state behind the settings screen.
//!
//! The three run-mode switches are stored as a single `Option<RunMode>` and
//! the verbose-boot/serial pair as a single [`BootMode`], so the model can
//! never hold two modes at once. The boolean accessors are views over those
//! values, and every setter checks the enablement rules before touching
//! state. A rejected setter is a no-op that returns `false`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Value Types
// ============================================================================

/// Which operation the engine performs on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Exploit with checkm8 and leave the device in pwned DFU mode.
    ExploitOnly,
    /// Boot PongoOS and exit.
    PongoOnly,
    /// Boot PongoOS and jailbreak with the KPF, ramdisk and overlay.
    Jailbreak,
}

impl RunMode {
    /// Whether this mode boots PongoOS, which is what boot options apply to.
    #[must_use]
    pub const fn boots_device(self) -> bool {
        matches!(self, Self::PongoOnly | Self::Jailbreak)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExploitOnly => "exploit-only",
            Self::PongoOnly => "pongo-only",
            Self::Jailbreak => "jailbreak",
        })
    }
}

/// How the booted device reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootMode {
    /// Normal boot, no extra output.
    None,
    /// Boot with the verbose boot screen.
    #[default]
    VerboseBoot,
    /// Enable serial output from the device while booting.
    Serial,
}

impl fmt::Display for BootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::VerboseBoot => "verbose-boot",
            Self::Serial => "serial",
        })
    }
}

// ============================================================================
// Field Addressing
// ============================================================================

/// Boolean fields of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// Verbose logging.
    Verbosity,
    /// Debug logging.
    Debug,
    /// Skip confirmation prompts.
    Quick,
    /// Exploit-only run mode.
    ExploitOnly,
    /// PongoOS-only run mode.
    PongoOnly,
    /// Jailbreak run mode.
    Jailbreak,
    /// Verbose boot.
    VerboseBoot,
    /// Serial output.
    Serial,
    /// Show the log window in the front-end.
    ShowLogWindow,
}

impl Toggle {
    /// All toggles in screen order.
    pub const ALL: [Self; 9] = [
        Self::Verbosity,
        Self::Debug,
        Self::Quick,
        Self::ExploitOnly,
        Self::PongoOnly,
        Self::Jailbreak,
        Self::VerboseBoot,
        Self::Serial,
        Self::ShowLogWindow,
    ];

    /// The run mode this toggle selects, if it is a run-mode toggle.
    #[must_use]
    pub const fn run_mode(self) -> Option<RunMode> {
        match self {
            Self::ExploitOnly => Some(RunMode::ExploitOnly),
            Self::PongoOnly => Some(RunMode::PongoOnly),
            Self::Jailbreak => Some(RunMode::Jailbreak),
            _ => None,
        }
    }

    /// Kebab-case name used on the command line and in presets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Verbosity => "verbosity",
            Self::Debug => "debug",
            Self::Quick => "quick",
            Self::ExploitOnly => "exploit-only",
            Self::PongoOnly => "pongo-only",
            Self::Jailbreak => "jailbreak",
            Self::VerboseBoot => "verbose-boot",
            Self::Serial => "serial",
            Self::ShowLogWindow => "show-log-window",
        }
    }
}

/// Any field of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// A boolean field.
    Toggle(Toggle),
    /// The free-form boot arguments.
    BootArguments,
}

impl Field {
    /// All fields in screen order.
    pub const ALL: [Self; 10] = [
        Self::Toggle(Toggle::Verbosity),
        Self::Toggle(Toggle::Debug),
        Self::Toggle(Toggle::Quick),
        Self::Toggle(Toggle::ExploitOnly),
        Self::Toggle(Toggle::PongoOnly),
        Self::Toggle(Toggle::Jailbreak),
        Self::Toggle(Toggle::VerboseBoot),
        Self::Toggle(Toggle::Serial),
        Self::BootArguments,
        Self::Toggle(Toggle::ShowLogWindow),
    ];

    /// Kebab-case name used on the command line and in presets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toggle(toggle) => toggle.name(),
            Self::BootArguments => "boot-arguments",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Toggle> for Field {
    fn from(toggle: Toggle) -> Self {
        Self::Toggle(toggle)
    }
}

/// Error returned when a field name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown settings field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        if matches!(normalized.as_str(), "boot-arguments" | "boot-args") {
            return Ok(Self::BootArguments);
        }
        Toggle::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .map(Self::Toggle)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A single requested mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    /// Set a boolean field.
    Toggle {
        /// Field to set.
        toggle: Toggle,
        /// New value.
        value: bool,
    },
    /// Replace the boot arguments.
    BootArguments(String),
}

impl SettingChange {
    /// The field this change addresses.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Toggle { toggle, .. } => Field::Toggle(*toggle),
            Self::BootArguments(_) => Field::BootArguments,
        }
    }
}

impl fmt::Display for SettingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle { toggle, value } => write!(f, "{}={value}", toggle.name()),
            Self::BootArguments(args) => write!(f, "boot-arguments={args:?}"),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Run options selected on the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploitConfiguration {
    verbosity: bool,
    debug: bool,
    quick: bool,
    run_mode: Option<RunMode>,
    boot_mode: BootMode,
    boot_arguments: String,
    show_log_window: bool,
}

impl Default for ExploitConfiguration {
    fn default() -> Self {
        Self {
            verbosity: false,
            debug: false,
            quick: true,
            run_mode: Some(RunMode::Jailbreak),
            boot_mode: BootMode::VerboseBoot,
            boot_arguments: String::new(),
            show_log_window: false,
        }
    }
}

impl ExploitConfiguration {
    /// Creates a configuration with the session defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from already-typed values.
    ///
    /// Used when seeding the initial state from a preset; no gating applies
    /// because the sum types cannot express conflicting values.
    #[must_use]
    #[allow(clippy::fn_params_excessive_bools)]
    pub(crate) const fn from_parts(
        verbosity: bool,
        debug: bool,
        quick: bool,
        run_mode: Option<RunMode>,
        boot_mode: BootMode,
        boot_arguments: String,
        show_log_window: bool,
    ) -> Self {
        Self {
            verbosity,
            debug,
            quick,
            run_mode,
            boot_mode,
            boot_arguments,
            show_log_window,
        }
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    #[must_use]
    pub const fn verbosity(&self) -> bool {
        self.verbosity
    }

    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub const fn quick(&self) -> bool {
        self.quick
    }

    #[must_use]
    pub fn exploit_only(&self) -> bool {
        self.run_mode == Some(RunMode::ExploitOnly)
    }

    #[must_use]
    pub fn pongo_only(&self) -> bool {
        self.run_mode == Some(RunMode::PongoOnly)
    }

    #[must_use]
    pub fn jailbreak(&self) -> bool {
        self.run_mode == Some(RunMode::Jailbreak)
    }

    #[must_use]
    pub fn verbose_boot(&self) -> bool {
        self.boot_mode == BootMode::VerboseBoot
    }

    #[must_use]
    pub fn serial(&self) -> bool {
        self.boot_mode == BootMode::Serial
    }

    #[must_use]
    pub fn boot_arguments(&self) -> &str {
        &self.boot_arguments
    }

    #[must_use]
    pub const fn show_log_window(&self) -> bool {
        self.show_log_window
    }

    /// The selected run mode, or `None` once the user has cleared it.
    #[must_use]
    pub const fn run_mode(&self) -> Option<RunMode> {
        self.run_mode
    }

    /// The stored boot mode. Retained even while boot options are gated off.
    #[must_use]
    pub const fn boot_mode(&self) -> BootMode {
        self.boot_mode
    }

    /// Reads a boolean field.
    #[must_use]
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Verbosity => self.verbosity,
            Toggle::Debug => self.debug,
            Toggle::Quick => self.quick,
            Toggle::ExploitOnly | Toggle::PongoOnly | Toggle::Jailbreak => {
                self.run_mode == toggle.run_mode()
            }
            Toggle::VerboseBoot => self.verbose_boot(),
            Toggle::Serial => self.serial(),
            Toggle::ShowLogWindow => self.show_log_window,
        }
    }

    // ------------------------------------------------------------------------
    // Enablement
    // ------------------------------------------------------------------------

    /// Whether the selected mode boots PongoOS, which unlocks boot options.
    #[must_use]
    pub fn boot_options_enabled(&self) -> bool {
        self.run_mode.is_some_and(RunMode::boots_device)
    }

    /// Explains why `field` is currently disabled, or `None` if it is enabled.
    #[must_use]
    pub fn disabled_reason(&self, field: Field) -> Option<String> {
        let toggle = match field {
            Field::BootArguments => {
                return (!self.boot_options_enabled())
                    .then(|| "boot arguments require pongo-only or jailbreak".to_string());
            }
            Field::Toggle(toggle) => toggle,
        };

        if let Some(mode) = toggle.run_mode() {
            return match self.run_mode {
                Some(current) if current != mode => {
                    Some(format!("{current} is selected; clear it first"))
                }
                _ => None,
            };
        }

        match toggle {
            Toggle::VerboseBoot | Toggle::Serial => {
                if !self.boot_options_enabled() {
                    return Some("boot options require pongo-only or jailbreak".to_string());
                }
                let (other, other_name) = if toggle == Toggle::VerboseBoot {
                    (BootMode::Serial, "serial")
                } else {
                    (BootMode::VerboseBoot, "verbose-boot")
                };
                (self.boot_mode == other)
                    .then(|| format!("verbose-boot and serial are exclusive; {other_name} is on"))
            }
            _ => None,
        }
    }

    /// Whether `field` can currently be changed.
    #[must_use]
    pub fn is_enabled(&self, field: Field) -> bool {
        self.disabled_reason(field).is_none()
    }

    /// Enablement of every field, derived from the current state.
    #[must_use]
    pub fn enablement(&self) -> Enablement {
        Enablement {
            exploit_only: self.is_enabled(Toggle::ExploitOnly.into()),
            pongo_only: self.is_enabled(Toggle::PongoOnly.into()),
            jailbreak: self.is_enabled(Toggle::Jailbreak.into()),
            verbose_boot: self.is_enabled(Toggle::VerboseBoot.into()),
            serial: self.is_enabled(Toggle::Serial.into()),
            boot_arguments: self.is_enabled(Field::BootArguments),
        }
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Sets a boolean field.
    ///
    /// Returns `true` if the change was accepted. A rejected change leaves
    /// the configuration untouched.
    pub fn set(&mut self, toggle: Toggle, value: bool) -> bool {
        if let Some(reason) = self.disabled_reason(toggle.into()) {
            tracing::debug!(field = toggle.name(), value, %reason, "change rejected");
            return false;
        }

        match toggle {
            Toggle::Verbosity => self.verbosity = value,
            Toggle::Debug => self.debug = value,
            Toggle::Quick => self.quick = value,
            Toggle::ShowLogWindow => self.show_log_window = value,
            Toggle::ExploitOnly | Toggle::PongoOnly | Toggle::Jailbreak => {
                let mode = toggle.run_mode();
                if value {
                    self.run_mode = mode;
                } else if self.run_mode == mode {
                    self.run_mode = None;
                }
            }
            Toggle::VerboseBoot | Toggle::Serial => {
                let mode = if toggle == Toggle::VerboseBoot {
                    BootMode::VerboseBoot
                } else {
                    BootMode::Serial
                };
                if value {
                    self.boot_mode = mode;
                } else if self.boot_mode == mode {
                    self.boot_mode = BootMode::None;
                }
            }
        }

        tracing::trace!(field = toggle.name(), value, "change accepted");
        true
    }

    /// Replaces the boot arguments. Rejected unless boot options are enabled.
    pub fn set_boot_arguments(&mut self, arguments: impl Into<String>) -> bool {
        if !self.boot_options_enabled() {
            tracing::debug!(
                field = Field::BootArguments.name(),
                "change rejected: boot arguments require pongo-only or jailbreak"
            );
            return false;
        }
        self.boot_arguments = arguments.into();
        tracing::trace!(field = Field::BootArguments.name(), "change accepted");
        true
    }

    /// Applies a change addressed by field.
    pub fn apply(&mut self, change: &SettingChange) -> bool {
        match change {
            SettingChange::Toggle { toggle, value } => self.set(*toggle, *value),
            SettingChange::BootArguments(args) => self.set_boot_arguments(args.as_str()),
        }
    }

    pub fn set_verbosity(&mut self, value: bool) -> bool {
        self.set(Toggle::Verbosity, value)
    }

    pub fn set_debug(&mut self, value: bool) -> bool {
        self.set(Toggle::Debug, value)
    }

    pub fn set_quick(&mut self, value: bool) -> bool {
        self.set(Toggle::Quick, value)
    }

    pub fn set_exploit_only(&mut self, value: bool) -> bool {
        self.set(Toggle::ExploitOnly, value)
    }

    pub fn set_pongo_only(&mut self, value: bool) -> bool {
        self.set(Toggle::PongoOnly, value)
    }

    pub fn set_jailbreak(&mut self, value: bool) -> bool {
        self.set(Toggle::Jailbreak, value)
    }

    pub fn set_verbose_boot(&mut self, value: bool) -> bool {
        self.set(Toggle::VerboseBoot, value)
    }

    pub fn set_serial(&mut self, value: bool) -> bool {
        self.set(Toggle::Serial, value)
    }

    pub fn set_show_log_window(&mut self, value: bool) -> bool {
        self.set(Toggle::ShowLogWindow, value)
    }
}

/// Which gated fields are currently changeable.
///
/// The independent fields (verbosity, debug, quick, show-log-window) are
/// always enabled and not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Enablement {
    pub exploit_only: bool,
    pub pongo_only: bool,
    pub jailbreak: bool,
    pub verbose_boot: bool,
    pub serial: bool,
    pub boot_arguments: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_jailbreak_with_verbose_boot() {
        let config = ExploitConfiguration::default();
        assert_eq!(config.run_mode(), Some(RunMode::Jailbreak));
        assert!(config.jailbreak());
        assert!(!config.exploit_only());
        assert!(!config.pongo_only());
        assert!(config.verbose_boot());
        assert!(!config.serial());
        assert_eq!(config.boot_arguments(), "");
        assert!(config.quick());
        assert!(!config.verbosity());
        assert!(!config.debug());
        assert!(!config.show_log_window());
    }

    #[test]
    fn exploit_only_rejected_while_jailbreak_selected() {
        let mut config = ExploitConfiguration::default();
        let before = config.clone();
        assert!(!config.set_exploit_only(true));
        assert_eq!(config, before);
    }

    #[test]
    fn pongo_only_rejected_while_jailbreak_selected() {
        let mut config = ExploitConfiguration::default();
        assert!(!config.set_pongo_only(true));
        assert!(config.jailbreak());
        assert!(!config.pongo_only());
    }

    #[test]
    fn clearing_jailbreak_unlocks_exploit_only() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_jailbreak(false));
        assert_eq!(config.run_mode(), None);
        assert!(config.set_exploit_only(true));
        assert!(config.exploit_only());
        assert!(!config.jailbreak());
        assert!(!config.pongo_only());
    }

    #[test]
    fn serial_rejected_in_exploit_only_mode() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_verbose_boot(false));
        assert!(config.set_jailbreak(false));
        assert!(config.set_exploit_only(true));
        assert!(!config.set_serial(true));
        assert!(!config.serial());
    }

    #[test]
    fn boot_options_keep_their_value_while_gated() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_jailbreak(false));
        assert!(!config.set_verbose_boot(false));
        assert!(config.verbose_boot());
        assert_eq!(config.boot_mode(), BootMode::VerboseBoot);
    }

    #[test]
    fn serial_requires_verbose_boot_off() {
        let mut config = ExploitConfiguration::default();
        assert!(!config.set_serial(true));
        assert!(config.set_verbose_boot(false));
        assert!(config.set_serial(true));
        assert!(config.serial());
        assert!(!config.set_verbose_boot(true));
        assert_eq!(config.boot_mode(), BootMode::Serial);
    }

    #[test]
    fn boot_arguments_gated_on_booting_mode() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_boot_arguments("serial=3"));
        assert!(config.set_jailbreak(false));
        assert!(!config.set_boot_arguments("-v"));
        assert_eq!(config.boot_arguments(), "serial=3");
        assert!(config.set_pongo_only(true));
        assert!(config.set_boot_arguments("-v"));
        assert_eq!(config.boot_arguments(), "-v");
    }

    #[test]
    fn clearing_an_unselected_mode_is_accepted_noop() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_jailbreak(false));
        assert!(config.set_pongo_only(false));
        assert_eq!(config.run_mode(), None);
    }

    #[test]
    fn independent_fields_always_settable() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_verbosity(true));
        assert!(config.set_debug(true));
        assert!(config.set_quick(false));
        assert!(config.set_show_log_window(true));
        assert!(config.verbosity() && config.debug() && config.show_log_window());
        assert!(!config.quick());
    }

    #[test]
    fn enablement_for_defaults() {
        let config = ExploitConfiguration::default();
        assert_eq!(
            config.enablement(),
            Enablement {
                exploit_only: false,
                pongo_only: false,
                jailbreak: true,
                verbose_boot: true,
                serial: false,
                boot_arguments: true,
            }
        );
    }

    #[test]
    fn enablement_with_no_mode() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_jailbreak(false));
        let enabled = config.enablement();
        assert!(enabled.exploit_only && enabled.pongo_only && enabled.jailbreak);
        assert!(!enabled.verbose_boot && !enabled.serial && !enabled.boot_arguments);
    }

    #[test]
    fn disabled_reason_names_selected_mode() {
        let config = ExploitConfiguration::default();
        let reason = config
            .disabled_reason(Toggle::PongoOnly.into())
            .expect("pongo-only should be disabled");
        assert!(reason.contains("jailbreak"));
    }

    #[test]
    fn field_parses_kebab_and_snake_case() {
        assert_eq!(
            "pongo-only".parse::<Field>(),
            Ok(Field::Toggle(Toggle::PongoOnly))
        );
        assert_eq!(
            "show_log_window".parse::<Field>(),
            Ok(Field::Toggle(Toggle::ShowLogWindow))
        );
        assert_eq!("boot-args".parse::<Field>(), Ok(Field::BootArguments));
        assert!("warp-drive".parse::<Field>().is_err());
    }

    #[test]
    fn apply_routes_to_setters() {
        let mut config = ExploitConfiguration::default();
        assert!(config.apply(&SettingChange::BootArguments("rd=md0".into())));
        assert!(config.apply(&SettingChange::Toggle {
            toggle: Toggle::Jailbreak,
            value: false,
        }));
        assert!(!config.apply(&SettingChange::BootArguments("x".into())));
        assert_eq!(config.boot_arguments(), "rd=md0");
    }

    #[test]
    fn get_matches_named_getters() {
        let config = ExploitConfiguration::default();
        for toggle in Toggle::ALL {
            let named = match toggle {
                Toggle::Verbosity => config.verbosity(),
                Toggle::Debug => config.debug(),
                Toggle::Quick => config.quick(),
                Toggle::ExploitOnly => config.exploit_only(),
                Toggle::PongoOnly => config.pongo_only(),
                Toggle::Jailbreak => config.jailbreak(),
                Toggle::VerboseBoot => config.verbose_boot(),
                Toggle::Serial => config.serial(),
                Toggle::ShowLogWindow => config.show_log_window(),
            };
            assert_eq!(config.get(toggle), named, "{}", toggle.name());
        }
    }
}
