// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime settings
//!
//! Layered as: built-in defaults, then an optional JSON config file, then
//! `SUBTAG_*` environment variables, then command-line flags (applied by the
//! binary).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_REGISTRY_URL: &str =
    "http://www.iana.org/assignments/language-subtag-registry/language-subtag-registry";
pub const REGISTRY_FILE_NAME: &str = "language-subtag-registry";

const URL_ENV: &str = "SUBTAG_REGISTRY_URL";
const REGISTRY_DIR_ENV: &str = "SUBTAG_REGISTRY_DIR";
const I18N_DIR_ENV: &str = "SUBTAG_I18N_DIR";
const MODULE_ENV: &str = "SUBTAG_MODULE";
const FORMATTER_ENV: &str = "SUBTAG_FORMATTER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where `dl-registry` downloads from
    pub registry_url: String,
    /// Holds the cached registry and the JSON dumps
    pub registry_dir: PathBuf,
    /// Output directory for the V modules
    pub i18n_dir: PathBuf,
    /// `module` line written at the top of every V file
    pub module_name: String,
    /// Formatter command; the output directory is appended. Empty disables it.
    pub formatter: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            registry_dir: PathBuf::from("language_registry"),
            i18n_dir: PathBuf::from("i18n/language"),
            module_name: "language".to_string(),
            formatter: vec!["v".to_string(), "-w".to_string(), "fmt".to_string()],
        }
    }
}

impl Settings {
    /// Defaults, overlaid with `config_file` when given, then the process
    /// environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let base = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env(|key| env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply overrides from an environment lookup. Blank values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = get(URL_ENV) {
            self.registry_url = url;
        }
        if let Some(dir) = get(REGISTRY_DIR_ENV) {
            self.registry_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(I18N_DIR_ENV) {
            self.i18n_dir = PathBuf::from(dir);
        }
        if let Some(module) = get(MODULE_ENV) {
            self.module_name = module;
        }
        if let Some(command) = get(FORMATTER_ENV) {
            self.formatter = command.split_whitespace().map(str::to_string).collect();
        }
        self
    }

    /// The locally cached registry text.
    pub fn cache_path(&self) -> PathBuf {
        self.registry_dir.join(REGISTRY_FILE_NAME)
    }
}
