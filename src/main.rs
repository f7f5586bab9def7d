// SPDX-License-Identifier: PMPL-1.0-or-later

//! subtag-registry: keep i18n language tables in sync with the IANA
//! Language Subtag Registry.

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use subtag_registry::commands::{Context, Dispatcher, COMMANDS};
use subtag_registry::config::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "subtag-registry")]
#[command(version)]
#[command(about = "IANA Language Subtag Registry parser and V/JSON table generator")]
#[command(long_about = None)]
struct Cli {
    /// Command to run (`help` lists them)
    #[arg(value_name = "COMMAND")]
    command: Option<String>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the cached registry and JSON output
    #[arg(long)]
    registry_dir: Option<PathBuf>,

    /// Output directory for V modules
    #[arg(long)]
    i18n_dir: Option<PathBuf>,

    /// Registry download URL
    #[arg(long)]
    url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.registry_dir {
        settings.registry_dir = dir;
    }
    if let Some(dir) = cli.i18n_dir {
        settings.i18n_dir = dir;
    }
    if let Some(url) = cli.url {
        settings.registry_url = url;
    }
    tracing::debug!(?settings, "settings resolved");

    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "subtag-registry".to_string());
    let ctx = Context { program, settings };

    let dispatcher = Dispatcher::new(COMMANDS);
    dispatcher.dispatch(cli.command.as_deref(), &ctx)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
