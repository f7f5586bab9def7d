// SPDX-License-Identifier: PMPL-1.0-or-later

//! Command table and dispatcher
//!
//! Commands live in one static table of (name, description, handler). The
//! dispatcher is built from that table once at startup; the first entry for
//! a name wins. Running without a command, or with an unknown one, prints the
//! usage text and is not an error.

use crate::config::Settings;
use crate::emit::{self, FormatterOutcome};
use crate::error::RegistryError;
use crate::fetch::{self, DownloadProgress, FetchOutcome, HttpSource};
use crate::{registry, tags};
use anyhow::{Context as _, Result};
use colored::*;
use indexmap::IndexMap;
use std::io::Write;
use std::path::PathBuf;

/// Everything a handler needs
#[derive(Debug, Clone)]
pub struct Context {
    /// argv[0], for usage text
    pub program: String,
    pub settings: Settings,
}

pub type Handler = fn(&Context, &Dispatcher) -> Result<()>;

pub struct Command {
    pub name: &'static str,
    /// One line, shown in the command list
    pub description: &'static str,
    pub handler: Handler,
}

pub const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        description: "Show usage and the list of commands.",
        handler: help,
    },
    Command {
        name: "dl-registry",
        description: "Download the language subtag registry and update the local copy.",
        handler: dl_registry,
    },
    Command {
        name: "registry-to-json",
        description: "Parse the local language subtag registry into per-type JSON files.",
        handler: registry_to_json,
    },
    Command {
        name: "registry-to-v",
        description: "Parse the local language subtag registry into V constant modules.",
        handler: registry_to_v,
    },
];

/// How a dispatch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ran(&'static str),
    /// No command given; usage was printed
    Usage,
    /// Unrecognised command; usage was printed
    Unknown(String),
}

pub struct Dispatcher {
    commands: IndexMap<&'static str, &'static Command>,
}

impl Dispatcher {
    pub fn new(table: &'static [Command]) -> Self {
        let mut commands = IndexMap::new();
        for command in table {
            commands.entry(command.name).or_insert(command);
        }
        Self { commands }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn usage(&self, program: &str) -> String {
        let width = self.commands.keys().map(|name| name.len()).max().unwrap_or(0);
        let mut out = format!("Usage: {program} <command>\n\nCommands:\n");
        for (name, command) in &self.commands {
            out.push_str(&format!("  {name:width$}  {}\n", command.description));
        }
        out
    }

    pub fn dispatch(&self, name: Option<&str>, ctx: &Context) -> Result<Dispatch> {
        let Some(name) = name else {
            print!("{}", self.usage(&ctx.program));
            return Ok(Dispatch::Usage);
        };
        match self.commands.get(name) {
            Some(command) => {
                (command.handler)(ctx, self)?;
                Ok(Dispatch::Ran(command.name))
            }
            None => {
                println!("{} unknown command `{}`", "warning:".yellow().bold(), name);
                print!("{}", self.usage(&ctx.program));
                Ok(Dispatch::Unknown(name.to_string()))
            }
        }
    }
}

fn help(ctx: &Context, dispatcher: &Dispatcher) -> Result<()> {
    print!("{}", dispatcher.usage(&ctx.program));
    Ok(())
}

fn dl_registry(ctx: &Context, _: &Dispatcher) -> Result<()> {
    let cache = ctx.settings.cache_path();
    println!("Downloading {}", ctx.settings.registry_url);
    let mut show_progress = |progress: DownloadProgress| {
        match progress.total {
            Some(total) => print!("  {}/{}\r", progress.bytes, total),
            None => print!("  {}\r", progress.bytes),
        }
        let _ = std::io::stdout().flush();
    };
    let outcome = download_registry(&ctx.settings, &mut show_progress)?;
    println!();

    match outcome {
        FetchOutcome::UpToDate { date } => {
            println!("The local file is the latest version ({}).", date);
        }
        FetchOutcome::Created { date } => {
            println!("{} {} (File-Date {})", "Saved".green(), cache.display(), date);
        }
        FetchOutcome::Updated { previous, current } => {
            let previous = previous
                .map(|date| date.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "{} {} ({} -> {})",
                "Updated".green(),
                cache.display(),
                previous,
                current
            );
        }
    }
    Ok(())
}

fn registry_to_json(ctx: &Context, _: &Dispatcher) -> Result<()> {
    for path in export_json(&ctx.settings)? {
        println!("Export {}", display_absolute(&path));
    }
    Ok(())
}

fn registry_to_v(ctx: &Context, _: &Dispatcher) -> Result<()> {
    let export = export_v(&ctx.settings)?;
    for path in &export.files {
        println!("Export {}", display_absolute(path));
    }
    match &export.formatter {
        FormatterOutcome::Formatted => {}
        FormatterOutcome::Skipped { reason } => {
            println!("{} formatter skipped: {}", "note:".cyan(), reason);
        }
        FormatterOutcome::Failed { code, stderr } => {
            println!(
                "{} formatter exited with {:?}: {}",
                "warning:".yellow().bold(),
                code,
                stderr
            );
        }
    }
    Ok(())
}

fn display_absolute(path: &std::path::Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Refresh the local registry cache from the configured URL.
pub fn download_registry(
    settings: &Settings,
    progress: &mut dyn FnMut(DownloadProgress),
) -> Result<FetchOutcome> {
    let source = HttpSource::new(settings.registry_url.clone());
    let cache = settings.cache_path();
    fetch::update_cache(&source, &cache, progress)
        .with_context(|| format!("updating {}", cache.display()))
}

fn load_cached(settings: &Settings) -> Result<registry::Registry> {
    let cache = settings.cache_path();
    registry::load(&cache).map_err(|err| match err {
        RegistryError::MissingCache { .. } => anyhow::Error::new(err),
        other => anyhow::Error::new(other).context(format!("parsing {}", cache.display())),
    })
}

/// Dump every record type to `<registry_dir>/<type>.json`.
pub fn export_json(settings: &Settings) -> Result<Vec<PathBuf>> {
    let registry = load_cached(settings)?;
    Ok(emit::write_json_groups(
        &registry.records,
        &settings.registry_dir,
    )?)
}

/// Files written by [`export_v`] and what the formatter did with them
#[derive(Debug, Clone)]
pub struct VExport {
    pub files: Vec<PathBuf>,
    pub formatter: FormatterOutcome,
}

/// Derive the tag tables and write `<i18n_dir>/<type>.v`, then format them.
pub fn export_v(settings: &Settings) -> Result<VExport> {
    let registry = load_cached(settings)?;
    let derived = tags::derive_tags(&registry.records);
    let files = emit::write_v_modules(&derived, &settings.i18n_dir, &settings.module_name)?;
    let formatter = emit::run_formatter(&settings.formatter, &settings.i18n_dir);
    Ok(VExport { files, formatter })
}
