//! Presentation-neutral description of the settings screen.

use serde::Serialize;

use super::model::{ExploitConfiguration, Field, SettingChange, Toggle};
use super::observer::{ObservedConfiguration, SettingsObserver, SubscriptionId};
use super::snapshot::RunOptions;

/// Index of the screen the app returns to on dismiss.
pub const HOME_SCREEN: usize = 0;

/// Groups of fields as laid out on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    General,
    ExploitType,
    BootOptions,
    App,
}

impl Section {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::ExploitType => "Exploit type",
            Self::BootOptions => "PongoOS boot options",
            Self::App => "App settings",
        }
    }
}

impl Field {
    /// Section the field is shown in.
    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::Toggle(Toggle::Verbosity | Toggle::Debug | Toggle::Quick) => Section::General,
            Self::Toggle(Toggle::ExploitOnly | Toggle::PongoOnly | Toggle::Jailbreak) => {
                Section::ExploitType
            }
            Self::Toggle(Toggle::VerboseBoot | Toggle::Serial) | Self::BootArguments => {
                Section::BootOptions
            }
            Self::Toggle(Toggle::ShowLogWindow) => Section::App,
        }
    }

    /// Label shown next to the control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Toggle(Toggle::Verbosity) => "Verbose logging",
            Self::Toggle(Toggle::Debug) => "Debug logging",
            Self::Toggle(Toggle::Quick) => "Quick mode",
            Self::Toggle(Toggle::ExploitOnly) => "Exploit only (pwned DFU mode)",
            Self::Toggle(Toggle::PongoOnly) => "Boot to PongoOS and exit",
            Self::Toggle(Toggle::Jailbreak) => "Jailbreak device (iOS 15+)",
            Self::Toggle(Toggle::VerboseBoot) => "Verbose boot",
            Self::Toggle(Toggle::Serial) => "Serial output",
            Self::BootArguments => "Additional boot-args",
            Self::Toggle(Toggle::ShowLogWindow) => "Show log window",
        }
    }
}

/// Current value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// One control on the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub section: Section,
    #[serde(serialize_with = "serialize_field")]
    pub field: Field,
    pub label: &'static str,
    pub value: FieldValue,
    pub enabled: bool,
}

fn serialize_field<S: serde::Serializer>(field: &Field, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(field.name())
}

/// Signal sent to the presentation layer when the screen is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dismissed {
    /// Screen index that was showing before the dismiss.
    pub from: usize,
    /// Screen index now showing, always [`HOME_SCREEN`].
    pub to: usize,
}

/// The settings screen: an observed configuration plus the app's screen index.
#[derive(Debug)]
pub struct SettingsScreen {
    index: usize,
    settings: ObservedConfiguration,
}

impl SettingsScreen {
    /// Opens the screen at `index` over `config`.
    #[must_use]
    pub fn open(index: usize, config: ExploitConfiguration) -> Self {
        Self {
            index,
            settings: ObservedConfiguration::new(config),
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn config(&self) -> &ExploitConfiguration {
        self.settings.config()
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.settings.revision()
    }

    pub fn subscribe(&mut self, observer: impl SettingsObserver + 'static) -> SubscriptionId {
        self.settings.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.settings.unsubscribe(id)
    }

    /// Applies a change as if the user had operated the control.
    pub fn apply(&mut self, change: &SettingChange) -> bool {
        self.settings.apply(change)
    }

    /// Every control in screen order with its value and enablement.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let config = self.settings.config();
        Field::ALL
            .into_iter()
            .map(|field| Row {
                section: field.section(),
                field,
                label: field.label(),
                value: match field {
                    Field::Toggle(toggle) => FieldValue::Bool(config.get(toggle)),
                    Field::BootArguments => FieldValue::Text(config.boot_arguments().to_string()),
                },
                enabled: config.is_enabled(field),
            })
            .collect()
    }

    /// Resets the screen index to [`HOME_SCREEN`].
    pub fn dismiss(&mut self) -> Dismissed {
        let from = std::mem::replace(&mut self.index, HOME_SCREEN);
        tracing::debug!(from, to = HOME_SCREEN, "settings dismissed");
        Dismissed {
            from,
            to: HOME_SCREEN,
        }
    }

    /// Finalized options for the current state.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions::from_configuration(self.settings.config())
    }

    /// Closes the screen, returning the final configuration.
    #[must_use]
    pub fn into_config(self) -> ExploitConfiguration {
        self.settings.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_screen_order_and_sections() {
        let screen = SettingsScreen::open(1, ExploitConfiguration::default());
        let rows = screen.rows();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].label, "Verbose logging");
        assert_eq!(rows[0].section, Section::General);
        assert_eq!(rows[5].label, "Jailbreak device (iOS 15+)");
        assert_eq!(rows[8].field, Field::BootArguments);
        assert_eq!(rows[8].section.title(), "PongoOS boot options");
        assert_eq!(rows[9].section, Section::App);
    }

    #[test]
    fn rows_reflect_enablement() {
        let screen = SettingsScreen::open(1, ExploitConfiguration::default());
        let disabled: Vec<_> = screen
            .rows()
            .into_iter()
            .filter(|row| !row.enabled)
            .map(|row| row.field)
            .collect();
        assert_eq!(
            disabled,
            vec![
                Field::Toggle(Toggle::ExploitOnly),
                Field::Toggle(Toggle::PongoOnly),
                Field::Toggle(Toggle::Serial),
            ]
        );
    }

    #[test]
    fn dismiss_resets_index_to_home() {
        let mut screen = SettingsScreen::open(2, ExploitConfiguration::default());
        assert_eq!(
            screen.dismiss(),
            Dismissed {
                from: 2,
                to: HOME_SCREEN
            }
        );
        assert_eq!(screen.index(), HOME_SCREEN);
        assert_eq!(
            screen.dismiss(),
            Dismissed {
                from: HOME_SCREEN,
                to: HOME_SCREEN
            }
        );
    }

    #[test]
    fn apply_goes_through_gating() {
        let mut screen = SettingsScreen::open(1, ExploitConfiguration::default());
        assert!(!screen.apply(&SettingChange::Toggle {
            toggle: Toggle::ExploitOnly,
            value: true,
        }));
        assert_eq!(screen.revision(), 0);
        assert!(screen.apply(&SettingChange::Toggle {
            toggle: Toggle::ShowLogWindow,
            value: true,
        }));
        assert_eq!(screen.revision(), 1);
        assert!(screen.into_config().show_log_window());
    }

    #[test]
    fn field_value_display() {
        assert_eq!(FieldValue::Bool(true).to_string(), "on");
        assert_eq!(FieldValue::Bool(false).to_string(), "off");
        assert_eq!(FieldValue::Text("rd=md0".into()).to_string(), "\"rd=md0\"");
    }
}
