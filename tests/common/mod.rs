//! Shared integration-test harness for running the `achilles` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Helpers for invoking the built `achilles` binary.
pub struct AchillesProcess;

impl AchillesProcess {
    /// Runs the binary with `args` and a clean `ACHILLES_*` environment.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::spawn_with_env(args, &[])
    }

    /// Runs the binary with `args` and extra environment variables.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
        let bin = env!("CARGO_BIN_EXE_achilles");
        let mut command = Command::new(bin);
        for (key, _) in std::env::vars() {
            if key.starts_with("ACHILLES_") {
                command.env_remove(key);
            }
        }
        command
            .env("NO_COLOR", "1")
            .envs(env.iter().copied())
            .args(args)
            .output()
            .expect("failed to run achilles")
    }

    /// Path to a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Stdout parsed as JSON.
    #[allow(clippy::missing_panics_doc)]
    pub fn stdout_json(output: &Output) -> serde_json::Value {
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).expect("stdout should be valid JSON")
    }
}
