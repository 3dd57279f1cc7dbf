use crate::cli::Cli;
use crate::config::Config;
use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod command;
mod config;
mod environment;
mod output;

/// Environment variable holding the log filter, e.g. `SHTG_LOG=debug`.
const LOG_ENV: &str = "SHTG_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        eprintln!("Failed to initialize tracing: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load()?;
    command::run(cli, &config)
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
}
