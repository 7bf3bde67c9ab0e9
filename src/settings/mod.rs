//! Settings model
//!
//! The run options a user picks before handing a device to the engine, the
//! rules that gate them, and the snapshot the engine consumes.

pub mod model;
pub mod observer;
pub mod screen;
pub mod snapshot;

pub use model::{
    BootMode, Enablement, ExploitConfiguration, Field, RunMode, SettingChange, Toggle,
    UnknownField,
};
pub use observer::{ObservedConfiguration, SettingsObserver, SubscriptionId};
pub use screen::{Dismissed, FieldValue, HOME_SCREEN, Row, Section, SettingsScreen};
pub use snapshot::{ArtifactOverrides, BootOptions, ENGINE_BINARY, RunOptions, RunPlan, Verbosity};
