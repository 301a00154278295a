//! cbuild CLI - build orchestrator for csolution projects

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cbuild::core::errors::{exit_code_of, hint_of};

mod cli;
mod commands;

use cli::{Cli, Commands, GlobalArgs};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
    let log_to_file = cli.global.log.is_some();

    if let Err(e) = run(cli) {
        if log_to_file {
            tracing::error!("{:#}", e);
        }
        eprintln!("error: {:#}", e);
        if let Some(hint) = hint_of(&e) {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(exit_code_of(&e));
    }
}

fn init_logging(global: &GlobalArgs) -> Result<()> {
    let default = if global.debug {
        "cbuild=debug"
    } else if global.quiet {
        "cbuild=error"
    } else {
        "cbuild=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    match global.log {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => commands::build::execute(&cli.global, cli.build),
        Some(Commands::Setup(args)) => commands::setup::execute(&cli.global, args),
        Some(Commands::List(args)) => commands::list::execute(&cli.global, args),
        Some(Commands::Completions(args)) => commands::completions::execute(args),
    }
}
