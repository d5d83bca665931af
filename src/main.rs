//! World Bank Indicator Dashboard CLI.

use std::io::{self, IsTerminal};

use clap::Parser;
use wbdash::logging::{init_logging, LogConfig, LogFormat};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg};

fn main() {
    let cli = Cli::parse();

    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    init_logging(
        &LogConfig::from_verbosity(cli.verbose, cli.quiet)
            .with_format(format)
            .with_ansi(io::stderr().is_terminal()),
    );

    if let Err(error) = run(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = commands::resolve_config(cli)?;
    match &cli.command {
        Command::Summary(args) => commands::run_summary(&config, args),
        Command::Deltas(args) => commands::run_deltas(&config, args),
        Command::Years => commands::run_years(&config),
        Command::Indicators => commands::run_indicators(&config),
        Command::Series(args) => commands::run_series(&config, args),
        Command::Export(args) => commands::run_export(&config, args),
    }
}
