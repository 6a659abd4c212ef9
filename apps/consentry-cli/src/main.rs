//! # consentry-cli
//!
//! Terminal demo for the consentry consent engine. Each process
//! invocation is one "visit": constructing the engine replays startup
//! events exactly as a page load would, then the subcommand stands in for
//! the control the visitor activated:
//! - `consentry status` — show the persisted record and live choices
//! - `consentry accept [--grant NAME]... [--deny NAME]...` — toggle
//!   inputs, then run the accept pass
//! - `consentry reject` — reject everything back to defaults
//! - `consentry reopen` — reopen the banner from the notice
//! - `consentry clear` — delete the stored record outright
//!
//! State persists in a JSON file (`--state`); `RUST_LOG` controls the
//! diagnostics filter and `--debug` enables the engine's own dispatch
//! logs.

mod commands;
mod demo;
mod surface;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Consentry demo — a consent banner in your terminal.
#[derive(Parser)]
#[command(name = "consentry", version, about)]
struct Cli {
    /// Path to the JSON state file (the demo's cookie jar).
    #[arg(long, default_value = ".consentry/state.json")]
    state: PathBuf,

    /// Enable the engine's per-hook dispatch diagnostics.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the persisted record, engine state, and live choices.
    Status,
    /// Run the accept pass, optionally toggling inputs first.
    Accept {
        /// Check a capability's input before accepting.
        #[arg(long)]
        grant: Vec<String>,
        /// Uncheck a capability's input before accepting.
        #[arg(long)]
        deny: Vec<String>,
    },
    /// Run the reject pass: reset everything to defaults.
    Reject,
    /// Reopen the banner from the notice.
    Reopen,
    /// Delete the stored consent record.
    Clear,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Status => commands::status::execute(&cli.state, cli.debug),
        Commands::Accept { grant, deny } => {
            commands::accept::execute(&cli.state, cli.debug, grant, deny)
        }
        Commands::Reject => commands::reject::execute(&cli.state, cli.debug),
        Commands::Reopen => commands::reopen::execute(&cli.state, cli.debug),
        Commands::Clear => commands::clear::execute(&cli.state),
    }
}
