// SPDX-License-Identifier: PMPL-1.0-or-later

//! Artifact emitters: per-type JSON dumps and V constant modules

pub mod formatter;
pub mod json;
pub mod vlang;

use crate::error::{RegistryError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub use formatter::{run_formatter, FormatterOutcome};
pub use json::write_json_groups;
pub use vlang::{render_module, write_v_modules};

/// Write a whole file through a temporary sibling that is renamed on success.
///
/// The parent directory is created when missing. On failure the target is
/// left as it was and the temporary file is removed.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| RegistryError::io(parent, e))?;
    temp.write_all(content)
        .map_err(|e| RegistryError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| RegistryError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| RegistryError::io(path, e.error))?;
    Ok(())
}
