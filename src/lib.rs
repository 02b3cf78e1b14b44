use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

pub mod broadcast;
pub mod cli;
mod commands;
pub mod config;
pub mod controls;
pub mod error;
pub mod filters;
pub mod gameplay;
pub mod notify;
pub mod panel;
pub mod roster;
pub mod transport;
pub mod util;

use cli::{Cli, Command};
use commands::{Console, Output};
use notify::StderrNotifier;
use transport::{HttpStore, Transport};

pub fn run() -> ExitCode {
    match try_run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    let out = Output { json: cli.json };
    let config_path = commands::config::config_path(cli.config.as_deref())?;

    if let Command::Config { action } = cli.command {
        commands::config::run(action, cli.api_url.as_deref(), &config_path, out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let api_url = commands::config::api_url(cli.api_url.as_deref(), &config_path);
    let store = HttpStore::new(api_url).context("Failed to build HTTP client")?;
    log::info!("Using API at {}", store.base_url());
    let console: Console = Transport::new(store, StderrNotifier::default());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let outcome = runtime.block_on(commands::dispatch(cli.command, &console, out));

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            if out.json {
                out.emit(&serde_json::json!({ "error": e, "kind": e.kind() }), String::new);
            } else if console.notifier().shown() == 0 {
                // Failures that never went through a notification still need a line
                eprintln!("error: {e}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
