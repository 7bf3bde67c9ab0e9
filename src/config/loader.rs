//! Preset loading
//!
//! A preset is a small YAML file that seeds the settings screen instead of
//! the built-in defaults:
//!
//! ```yaml
//! verbosity: true
//! mode: pongo-only
//! boot:
//!   mode: serial
//!   arguments: "serial=3"
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::settings::{BootMode, ExploitConfiguration, RunMode};

/// Presets larger than this are rejected before parsing.
pub const MAX_PRESET_SIZE: u64 = 64 * 1024;

/// Boot option keys of a preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetBoot {
    pub mode: Option<BootMode>,
    pub arguments: Option<String>,
}

/// Deserialized preset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub verbosity: Option<bool>,
    pub debug: Option<bool>,
    pub quick: Option<bool>,
    pub mode: Option<RunMode>,
    #[serde(default)]
    pub boot: PresetBoot,
    pub show_log_window: Option<bool>,
}

impl Preset {
    /// Overlays the preset on the session defaults.
    #[must_use]
    pub fn into_configuration(self) -> ExploitConfiguration {
        let defaults = ExploitConfiguration::default();
        ExploitConfiguration::from_parts(
            self.verbosity.unwrap_or(defaults.verbosity()),
            self.debug.unwrap_or(defaults.debug()),
            self.quick.unwrap_or(defaults.quick()),
            self.mode.or(defaults.run_mode()),
            self.boot.mode.unwrap_or(defaults.boot_mode()),
            self.boot
                .arguments
                .unwrap_or_else(|| defaults.boot_arguments().to_string()),
            self.show_log_window.unwrap_or(defaults.show_log_window()),
        )
    }
}

/// Parses preset text. `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the text is empty, not YAML, or
/// contains unknown keys or values.
pub fn parse_preset(text: &str, path: &Path) -> Result<Preset, ConfigError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "Preset file is empty".to_string(),
        });
    }

    serde_yaml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })
}

/// Loads a preset file and builds the initial configuration from it.
///
/// # Errors
///
/// Returns an error if the file is missing, too large, or fails to parse.
pub fn load_preset(path: &Path) -> Result<ExploitConfiguration, ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;

    if metadata.len() > MAX_PRESET_SIZE {
        return Err(ConfigError::InvalidValue {
            field: "file_size".to_string(),
            value: format!("{} bytes", metadata.len()),
            expected: format!("at most {MAX_PRESET_SIZE} bytes"),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;

    let preset = parse_preset(&text, path)?;
    tracing::debug!(path = %path.display(), ?preset, "loaded preset");
    Ok(preset.into_configuration())
}
