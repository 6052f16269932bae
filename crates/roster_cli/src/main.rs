//! `roster` command-line entry point.
//!
//! # Responsibility
//! - Bootstrap logging and the store once per process.
//! - Dispatch one subcommand and map failures to a non-zero exit code.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use roster_core::{default_log_level, init_logging, RosterService, Store};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let global = cli.global;
    if let Some(log_dir) = &global.log_dir {
        let level = global.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, absolute(log_dir)?)?;
    }

    let store = Store::open(&global.db)?;
    let service = RosterService::new(store);
    commands::run(&service, cli.command)
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
