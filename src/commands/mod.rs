use serde::Serialize;

use crate::cli::Command;
use crate::error::Result;
use crate::notify::StderrNotifier;
use crate::transport::{HttpStore, Transport};

pub mod broadcast;
pub mod config;
pub mod gameplay;
pub mod history;
pub mod roster;

/// The command-line renderer's transport.
pub type Console = Transport<HttpStore, StderrNotifier>;

/// How results are printed.
#[derive(Clone, Copy, Debug)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as JSON, or the human rendering otherwise.
    pub fn emit<T: Serialize>(self, value: &T, human: impl FnOnce() -> String) {
        if self.json {
            match serde_json::to_string_pretty(value) {
                Ok(text) => println!("{text}"),
                Err(e) => log::error!("Cannot encode output: {e}"),
            }
        } else {
            let text = human();
            if !text.is_empty() {
                println!("{text}");
            }
        }
    }
}

pub async fn dispatch(command: Command, console: &Console, out: Output) -> Result<()> {
    match command {
        Command::Broadcast { action } => broadcast::run(action, console, out).await,
        Command::Vip { action } => roster::run_vip(action, console, out).await,
        Command::Admin { action } => roster::run_admin(action, console, out).await,
        Command::Gameplay { action } => gameplay::run(action, console, out).await,
        Command::History(args) => history::run(args, console, out).await,
        // Handled before a console exists
        Command::Config { .. } => Ok(()),
    }
}
