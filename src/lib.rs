//! `achilles` - run configuration for the Achilles checkm8 utility
//!
//! This library models the options a user picks before running the
//! exploitation engine: the settings screen's gated toggles, the engine's
//! own command-line flags and their contradiction checks, and the
//! finalized run snapshot handed to the engine.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod settings;
