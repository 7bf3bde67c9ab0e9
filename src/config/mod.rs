//! Configuration module
//!
//! Engine launch flags and their contradiction checks, and YAML presets that
//! seed the settings screen.

pub mod loader;
pub mod options;
pub mod validation;

pub use loader::{Preset, load_preset, parse_preset};
pub use options::LaunchOptions;
pub use validation::{MAX_PONGO_SIZE, ValidationResult, Validator};
