//! Observability module
//!
//! Logging setup shared by every subcommand.

pub mod logging;

pub use logging::{LogFormat, effective_verbosity, init_logging};
