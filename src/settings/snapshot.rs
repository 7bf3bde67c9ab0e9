//! Finalized run options handed to the execution engine.
//!
//! A [`RunOptions`] is built once, either from the settings screen or from
//! validated launch options, and is immutable afterwards. Boot options only
//! exist inside the booting [`RunPlan`] variants.

use std::path::PathBuf;

use serde::Serialize;

use super::model::{BootMode, ExploitConfiguration, RunMode};
use crate::error::Result;

/// Name of the engine executable used when rendering a command line.
pub const ENGINE_BINARY: &str = "Achilles";

/// Engine log verbosity, `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Highest level the engine understands.
    pub const MAX: Self = Self(2);

    /// Creates a level, clamping anything above [`Verbosity::MAX`].
    #[must_use]
    pub const fn saturating(level: u8) -> Self {
        if level > Self::MAX.0 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    /// Derives the level from the two logging switches on the settings screen.
    #[must_use]
    pub const fn from_flags(verbose: bool, debug: bool) -> Self {
        match (verbose, debug) {
            (_, true) => Self(2),
            (true, false) => Self(1),
            (false, false) => Self(0),
        }
    }

    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Options that only apply when the engine boots PongoOS.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BootOptions {
    pub boot_mode: BootMode,
    pub boot_arguments: String,
}

/// What the engine should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RunPlan {
    /// Exploit and leave the device in pwned DFU mode.
    ExploitOnly,
    /// Boot PongoOS and exit.
    PongoOnly(BootOptions),
    /// Boot PongoOS and jailbreak.
    Jailbreak(BootOptions),
}

impl RunPlan {
    /// Builds a plan for `mode`, discarding `boot` for exploit-only runs.
    #[must_use]
    pub fn new(mode: RunMode, boot: BootOptions) -> Self {
        match mode {
            RunMode::ExploitOnly => Self::ExploitOnly,
            RunMode::PongoOnly => Self::PongoOnly(boot),
            RunMode::Jailbreak => Self::Jailbreak(boot),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> RunMode {
        match self {
            Self::ExploitOnly => RunMode::ExploitOnly,
            Self::PongoOnly(_) => RunMode::PongoOnly,
            Self::Jailbreak(_) => RunMode::Jailbreak,
        }
    }

    #[must_use]
    pub const fn boot_options(&self) -> Option<&BootOptions> {
        match self {
            Self::ExploitOnly => None,
            Self::PongoOnly(boot) | Self::Jailbreak(boot) => Some(boot),
        }
    }
}

/// Custom artifacts replacing the engine's bundled ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ArtifactOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pongo: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpf: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramdisk: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<PathBuf>,
}

impl ArtifactOverrides {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pongo.is_none()
            && self.kpf.is_none()
            && self.ramdisk.is_none()
            && self.overlay.is_none()
    }
}

/// Snapshot of everything the engine needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOptions {
    pub plan: RunPlan,
    pub verbosity: Verbosity,
    pub debug: bool,
    pub quick: bool,
    pub show_log_window: bool,
    #[serde(skip_serializing_if = "ArtifactOverrides::is_empty")]
    pub overrides: ArtifactOverrides,
}

impl RunOptions {
    /// Finalizes the settings screen state.
    ///
    /// A configuration with no run mode selected falls back to exploit-only,
    /// which is what the engine does when it is given no mode.
    #[must_use]
    pub fn from_configuration(config: &ExploitConfiguration) -> Self {
        let mode = config.run_mode().unwrap_or_else(|| {
            tracing::warn!("no run mode selected, defaulting to exploit only");
            RunMode::ExploitOnly
        });
        let boot = BootOptions {
            boot_mode: config.boot_mode(),
            boot_arguments: config.boot_arguments().to_string(),
        };
        Self {
            plan: RunPlan::new(mode, boot),
            verbosity: Verbosity::from_flags(config.verbosity(), config.debug()),
            debug: config.debug(),
            quick: config.quick(),
            show_log_window: config.show_log_window(),
            overrides: ArtifactOverrides::default(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.plan.mode()
    }

    /// Renders the engine argument vector (without the program name).
    ///
    /// The log window is a front-end concern and has no engine flag.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.verbosity.level() > 0 {
            args.push(format!("-{}", "v".repeat(usize::from(self.verbosity.level()))));
        }
        if self.debug {
            args.push("-d".to_string());
        }
        if self.quick {
            args.push("-q".to_string());
        }

        args.push(
            match self.plan.mode() {
                RunMode::ExploitOnly => "-e",
                RunMode::PongoOnly => "-p",
                RunMode::Jailbreak => "-j",
            }
            .to_string(),
        );

        if let Some(boot) = self.plan.boot_options() {
            match boot.boot_mode {
                BootMode::None => {}
                BootMode::VerboseBoot => args.push("-V".to_string()),
                BootMode::Serial => args.push("-s".to_string()),
            }
            if !boot.boot_arguments.is_empty() {
                args.push("-b".to_string());
                args.push(boot.boot_arguments.clone());
            }
        }

        let overrides = [
            ("-k", &self.overrides.pongo),
            ("-K", &self.overrides.kpf),
            ("-R", &self.overrides.ramdisk),
            ("-O", &self.overrides.overlay),
        ];
        for (flag, path) in overrides {
            if let Some(path) = path {
                args.push(flag.to_string());
                args.push(path.display().to_string());
            }
        }

        args
    }

    /// Renders a shell-quoted engine invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument contains a NUL byte.
    pub fn command_line(&self) -> Result<String> {
        let args = self.to_args();
        let words = std::iter::once(ENGINE_BINARY).chain(args.iter().map(String::as_str));
        Ok(shlex::try_join(words)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false).level(), 0);
        assert_eq!(Verbosity::from_flags(true, false).level(), 1);
        assert_eq!(Verbosity::from_flags(false, true).level(), 2);
        assert_eq!(Verbosity::from_flags(true, true).level(), 2);
    }

    #[test]
    fn verbosity_saturates_at_two() {
        assert_eq!(Verbosity::saturating(1).level(), 1);
        assert_eq!(Verbosity::saturating(7), Verbosity::MAX);
    }

    #[test]
    fn default_configuration_snapshot() {
        let options = RunOptions::from_configuration(&ExploitConfiguration::default());
        assert_eq!(
            options.plan,
            RunPlan::Jailbreak(BootOptions {
                boot_mode: BootMode::VerboseBoot,
                boot_arguments: String::new(),
            })
        );
        assert_eq!(options.verbosity.level(), 0);
        assert!(options.quick);
        assert!(!options.show_log_window);
        assert_eq!(options.to_args(), vec!["-q", "-j", "-V"]);
    }

    #[test]
    fn cleared_mode_defaults_to_exploit_only() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_jailbreak(false));
        let options = RunOptions::from_configuration(&config);
        assert_eq!(options.plan, RunPlan::ExploitOnly);
        assert!(options.plan.boot_options().is_none());
    }

    #[test]
    fn exploit_only_drops_boot_options() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_boot_arguments("serial=3"));
        assert!(config.set_jailbreak(false));
        assert!(config.set_exploit_only(true));
        let options = RunOptions::from_configuration(&config);
        assert_eq!(options.to_args(), vec!["-q", "-e"]);
    }

    #[test]
    fn pongo_with_serial_and_boot_args() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_jailbreak(false));
        assert!(config.set_pongo_only(true));
        assert!(config.set_verbose_boot(false));
        assert!(config.set_serial(true));
        assert!(config.set_boot_arguments("serial=3 rd=md0"));
        assert!(config.set_debug(true));
        assert!(config.set_quick(false));

        let options = RunOptions::from_configuration(&config);
        assert_eq!(
            options.to_args(),
            vec!["-vv", "-d", "-p", "-s", "-b", "serial=3 rd=md0"]
        );
        let line = options.command_line().unwrap();
        assert!(line.starts_with("Achilles -vv -d -p -s -b "));
        assert_eq!(
            shlex::split(&line).unwrap(),
            vec!["Achilles", "-vv", "-d", "-p", "-s", "-b", "serial=3 rd=md0"]
        );
    }

    #[test]
    fn overrides_rendered_after_mode() {
        let mut options = RunOptions::from_configuration(&ExploitConfiguration::default());
        options.overrides.kpf = Some(PathBuf::from("/tmp/kpf"));
        options.overrides.pongo = Some(PathBuf::from("/tmp/Pongo.bin"));
        assert_eq!(
            options.to_args(),
            vec!["-q", "-j", "-V", "-k", "/tmp/Pongo.bin", "-K", "/tmp/kpf"]
        );
    }

    #[test]
    fn command_line_rejects_nul() {
        let mut config = ExploitConfiguration::default();
        assert!(config.set_boot_arguments("bad\0arg"));
        let options = RunOptions::from_configuration(&config);
        assert!(options.command_line().is_err());
    }

    #[test]
    fn json_shape() {
        let options = RunOptions::from_configuration(&ExploitConfiguration::default());
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["plan"]["mode"], "jailbreak");
        assert_eq!(value["plan"]["boot_mode"], "verbose-boot");
        assert_eq!(value["verbosity"], 0);
        assert!(value.get("overrides").is_none());
    }
}
