//! Launch option validation
//!
//! Checks engine flags for contradictions before they are resolved into run
//! options. Validation collects ALL issues rather than stopping at the
//! first, so a user fixing a command line sees everything at once.

use std::path::Path;

use crate::config::options::LaunchOptions;
use crate::error::{Severity, ValidationIssue};
use crate::settings::Verbosity;

/// A PongoOS image must be smaller than this to fit the device's load area.
pub const MAX_PONGO_SIZE: u64 = 0x7fe00;

// ============================================================================
// Public API
// ============================================================================

/// Result of launch option validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (the options cannot be used).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (the options are adjusted or defaulted).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Launch option validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates launch options and returns the result.
    pub fn validate(&mut self, options: &LaunchOptions) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_run_mode(options);
        self.validate_boot_options(options);
        self.validate_overrides(options);
        self.validate_verbosity(options);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn validate_run_mode(&mut self, options: &LaunchOptions) {
        if options.pongo && options.jailbreak {
            self.add_error("--pongo", "cannot use both --pongo and --jailbreak");
        }
        if options.exploit && (options.pongo || options.jailbreak) {
            self.add_error("--exploit", "cannot use --exploit with --pongo or --jailbreak");
        }
        if !options.any_mode() {
            self.add_warning(
                "--exploit",
                "neither --exploit, --pongo nor --jailbreak given, defaulting to exploit only",
            );
        }
    }

    fn validate_boot_options(&mut self, options: &LaunchOptions) {
        let boots = options.pongo || options.jailbreak;

        if options.boot_args.is_some() && !boots {
            self.add_error(
                "--boot-args",
                "cannot use --boot-args without --pongo or --jailbreak",
            );
        }
        if (options.verbose_boot || options.serial) && !boots {
            let path = if options.verbose_boot {
                "--verbose-boot"
            } else {
                "--serial"
            };
            self.add_error(
                path,
                "cannot use --verbose-boot or --serial without --pongo or --jailbreak",
            );
        }
        if options.verbose_boot && options.serial {
            self.add_error("--serial", "cannot use --verbose-boot and --serial together");
        }
    }

    fn validate_overrides(&mut self, options: &LaunchOptions) {
        let jailbreak_only = [
            ("--custom-kpf", &options.custom_kpf),
            ("--custom-ramdisk", &options.custom_ramdisk),
            ("--custom-overlay", &options.custom_overlay),
        ];

        if !options.jailbreak {
            for (flag, path) in &jailbreak_only {
                if path.is_some() {
                    self.add_error(flag, &format!("cannot use {flag} without --jailbreak"));
                }
            }
        }
        if options.override_pongo.is_some() && !(options.pongo || options.jailbreak) {
            self.add_error(
                "--override-pongo",
                "cannot use --override-pongo without --pongo or --jailbreak",
            );
        }

        let all = std::iter::once(("--override-pongo", &options.override_pongo))
            .chain(jailbreak_only);
        for (flag, path) in all {
            if let Some(path) = path {
                self.check_file_exists(flag, path);
            }
        }

        if let Some(path) = &options.override_pongo {
            self.check_pongo_size(path);
        }
    }

    fn validate_verbosity(&mut self, options: &LaunchOptions) {
        if options.verbosity > Verbosity::MAX.level() {
            self.add_warning(
                "--verbosity",
                &format!(
                    "verbosity {} above maximum of {}, lowering to {}",
                    options.verbosity,
                    Verbosity::MAX.level(),
                    Verbosity::MAX.level()
                ),
            );
        }
    }

    fn check_file_exists(&mut self, flag: &str, path: &Path) {
        if !path.is_file() {
            self.add_error(flag, &format!("file not found: {}", path.display()));
        }
    }

    fn check_pongo_size(&mut self, path: &Path) {
        let Ok(metadata) = std::fs::metadata(path) else {
            return;
        };
        if metadata.is_file() && metadata.len() >= MAX_PONGO_SIZE {
            self.add_error(
                "--override-pongo",
                &format!(
                    "PongoOS image is too large, must be less than {MAX_PONGO_SIZE:#x} bytes but is {:#x} bytes",
                    metadata.len()
                ),
            );
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
