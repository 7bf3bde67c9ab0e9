//! Shell completion generation

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};

/// Generate and print a shell completion script to stdout.
pub fn run(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "achilles", &mut std::io::stdout());
}
