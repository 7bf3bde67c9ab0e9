//! Error types for `achilles`
//!
//! The settings model itself never fails: gated mutations are rejected by
//! returning `false`. Everything around it (preset loading, launch option
//! validation, command-line rendering) reports through the types below.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `achilles` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid preset, contradictory options)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `achilles` operations.
#[derive(Debug, Error)]
pub enum AchillesError {
    /// Preset loading or option validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An argument could not be shell-quoted (contains a NUL byte)
    #[error("cannot quote engine arguments: {0}")]
    Quote(#[from] shlex::QuoteError),
}

impl AchillesError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Quote(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Preset loading and launch option validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the preset file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Option validation failed
    #[error("validation failed for {source_name}: {}", summarize(.errors))]
    ValidationError {
        /// What was validated (a preset path or "command line")
        source_name: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// A settings change was rejected because its field is disabled
    #[error("change to '{field}' rejected: {reason}")]
    RejectedChange {
        /// Field the change addressed
        field: String,
        /// Why the field is currently disabled
        reason: String,
    },
}

fn summarize(errors: &[ValidationIssue]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Option or key the issue refers to (e.g. "--serial", "boot.mode")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the options cannot be used
    Error,
    /// Warning - the options are adjusted or defaulted
    Warning,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `achilles` operations.
pub type Result<T> = std::result::Result<T, AchillesError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: AchillesError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_rejected_change_exit_code() {
        let err: AchillesError = ConfigError::RejectedChange {
            field: "serial".to_string(),
            reason: "disabled".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: AchillesError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "--serial".to_string(),
            message: "cannot use --verbose-boot and --serial together".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: cannot use --verbose-boot and --serial together at --serial"
        );
    }

    #[test]
    fn test_validation_error_lists_every_message() {
        let err = ConfigError::ValidationError {
            source_name: "command line".to_string(),
            errors: vec![
                ValidationIssue {
                    path: "--pongo".to_string(),
                    message: "first".to_string(),
                    severity: Severity::Error,
                },
                ValidationIssue {
                    path: "--serial".to_string(),
                    message: "second".to_string(),
                    severity: Severity::Error,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "validation failed for command line: first; second"
        );
    }

    #[test]
    fn test_rejected_change_display() {
        let err = ConfigError::RejectedChange {
            field: "serial".to_string(),
            reason: "boot options require pongo-only or jailbreak".to_string(),
        };
        assert!(err.to_string().contains("serial"));
        assert!(err.to_string().contains("pongo-only or jailbreak"));
    }
}
