//! The engine's command-line option table.
//!
//! These are the flags the execution engine itself accepts. `achilles plan`
//! takes the same flags, checks them for contradictions and resolves them
//! into a [`RunOptions`] the same way the engine would.

use std::path::PathBuf;

use clap::Args;

use crate::settings::{
    ArtifactOverrides, BootMode, BootOptions, RunMode, RunOptions, RunPlan, Verbosity,
};

/// Engine launch flags.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LaunchOptions {
    /// Verbosity count, taken from the global `-v` flag.
    #[arg(skip)]
    pub verbosity: u8,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Don't ask for confirmation during the program.
    #[arg(short, long)]
    pub quick: bool,

    /// Exploit with checkm8 and exit.
    #[arg(short, long)]
    pub exploit: bool,

    /// Boot to PongoOS and exit.
    #[arg(short, long)]
    pub pongo: bool,

    /// Jailbreak rootless using the kernel patchfinder, ramdisk and overlay.
    #[arg(short, long)]
    pub jailbreak: bool,

    /// Boot device with verbose boot.
    #[arg(short = 'V', long)]
    pub verbose_boot: bool,

    /// Enable serial output from the device when booting.
    #[arg(short, long)]
    pub serial: bool,

    /// Boot arguments to pass to PongoOS.
    #[arg(short, long, env = "ACHILLES_BOOT_ARGS")]
    pub boot_args: Option<String>,

    /// Use a custom Pongo.bin file.
    #[arg(short = 'k', long, env = "ACHILLES_OVERRIDE_PONGO")]
    pub override_pongo: Option<PathBuf>,

    /// Use a custom kernel patchfinder file.
    #[arg(short = 'K', long, env = "ACHILLES_CUSTOM_KPF")]
    pub custom_kpf: Option<PathBuf>,

    /// Use a custom ramdisk file.
    #[arg(short = 'R', long, env = "ACHILLES_CUSTOM_RAMDISK")]
    pub custom_ramdisk: Option<PathBuf>,

    /// Use a custom overlay file.
    #[arg(short = 'O', long, env = "ACHILLES_CUSTOM_OVERLAY")]
    pub custom_overlay: Option<PathBuf>,
}

impl LaunchOptions {
    /// The run mode selected by the flags, if exactly one was given.
    ///
    /// Returns `None` both when no mode flag is present and when several
    /// are; the validator reports the latter.
    #[must_use]
    pub fn selected_mode(&self) -> Option<RunMode> {
        match (self.exploit, self.pongo, self.jailbreak) {
            (true, false, false) => Some(RunMode::ExploitOnly),
            (false, true, false) => Some(RunMode::PongoOnly),
            (false, false, true) => Some(RunMode::Jailbreak),
            _ => None,
        }
    }

    /// Whether any mode flag was given.
    #[must_use]
    pub const fn any_mode(&self) -> bool {
        self.exploit || self.pongo || self.jailbreak
    }

    /// Flags that were set, as `(name, value)` pairs, for debug logging.
    #[must_use]
    pub fn set_flags(&self) -> Vec<(&'static str, String)> {
        let mut flags = Vec::new();
        if self.verbosity > 0 {
            flags.push(("verbosity", self.verbosity.to_string()));
        }
        let bools = [
            ("debug", self.debug),
            ("quick", self.quick),
            ("exploit", self.exploit),
            ("pongo", self.pongo),
            ("jailbreak", self.jailbreak),
            ("verbose-boot", self.verbose_boot),
            ("serial", self.serial),
        ];
        flags.extend(
            bools
                .into_iter()
                .filter(|(_, set)| *set)
                .map(|(name, _)| (name, "true".to_string())),
        );
        if let Some(args) = &self.boot_args {
            flags.push(("boot-args", args.clone()));
        }
        let paths = [
            ("override-pongo", &self.override_pongo),
            ("custom-kpf", &self.custom_kpf),
            ("custom-ramdisk", &self.custom_ramdisk),
            ("custom-overlay", &self.custom_overlay),
        ];
        for (name, path) in paths {
            if let Some(path) = path {
                flags.push((name, path.display().to_string()));
            }
        }
        flags
    }

    /// Resolves validated flags into run options.
    ///
    /// Callers must run the validator first; contradictory flags resolve
    /// to exploit-only here rather than failing.
    #[must_use]
    pub fn resolve(&self) -> RunOptions {
        let mode = self.selected_mode().unwrap_or_else(|| {
            tracing::debug!("neither -e, -p nor -j was passed, defaulting to exploit only");
            RunMode::ExploitOnly
        });

        if self.verbosity > Verbosity::MAX.level() {
            tracing::debug!(
                requested = self.verbosity,
                max = Verbosity::MAX.level(),
                "verbosity above maximum, lowering"
            );
        }

        let boot_mode = if self.verbose_boot {
            BootMode::VerboseBoot
        } else if self.serial {
            BootMode::Serial
        } else {
            BootMode::None
        };
        let boot = BootOptions {
            boot_mode,
            boot_arguments: self.boot_args.clone().unwrap_or_default(),
        };

        RunOptions {
            plan: RunPlan::new(mode, boot),
            verbosity: Verbosity::saturating(self.verbosity),
            debug: self.debug,
            quick: self.quick,
            show_log_window: false,
            overrides: ArtifactOverrides {
                pongo: self.override_pongo.clone(),
                kpf: self.custom_kpf.clone(),
                ramdisk: self.custom_ramdisk.clone(),
                overlay: self.custom_overlay.clone(),
            },
        }
    }
}
