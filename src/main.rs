//! `achilles` - run configuration for the Achilles checkm8 utility

use clap::Parser;

use achilles::cli::args::{Cli, Commands};
use achilles::cli::commands;
use achilles::error::ExitCode;
use achilles::observability::{effective_verbosity, init_logging};

fn main() {
    let cli = Cli::parse();

    let debug = matches!(&cli.command, Commands::Plan(args) if args.launch.debug);
    init_logging(cli.log_format, effective_verbosity(cli.verbosity_level(), debug), cli.color);

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
