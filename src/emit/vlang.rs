// SPDX-License-Identifier: PMPL-1.0-or-later

//! V source modules holding the derived tag tables
//!
//! Each record type becomes `<type>.v`:
//!
//! ```text
//! module language
//!
//! pub const suppress_scripts = {'ab': 'Cyrl', 'af': 'Latn'}
//!
//! pub const languages = ['aa', 'ab', 'af']
//! ```
//!
//! The `suppress_scripts` map is only written for the `language` module.

use super::write_atomic;
use crate::error::Result;
use crate::tags::{DerivedTags, SuppressScripts, TagSet, LANGUAGE};
use std::path::{Path, PathBuf};
use tracing::info;

/// Render one module. `suppress_scripts` is written before the tag list when
/// given.
pub fn render_module(
    module: &str,
    kind: &str,
    tags: &TagSet,
    suppress_scripts: Option<&SuppressScripts>,
) -> String {
    let mut out = format!("module {module}\n\n");
    if let Some(map) = suppress_scripts {
        out.push_str(&format!(
            "pub const suppress_scripts = {}\n\n",
            map_literal(map)
        ));
    }
    out.push_str(&format!(
        "pub const {}s = {}\n",
        const_ident(kind),
        array_literal(tags)
    ));
    out
}

/// Write one `<type>.v` per derived table into `dir`.
pub fn write_v_modules(derived: &DerivedTags, dir: &Path, module: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (kind, tags) in &derived.tables {
        let suppress = (kind == LANGUAGE).then_some(&derived.suppress_scripts);
        let source = render_module(module, kind, tags, suppress);
        let path = dir.join(format!("{kind}.v"));
        write_atomic(&path, source.as_bytes())?;
        info!(path = %path.display(), tags = tags.len(), "wrote V module");
        written.push(path);
    }
    Ok(written)
}

fn array_literal(tags: &TagSet) -> String {
    if tags.is_empty() {
        return "[]string{}".to_string();
    }
    let items: Vec<String> = tags.iter().map(|tag| string_literal(tag)).collect();
    format!("[{}]", items.join(", "))
}

fn map_literal(map: &SuppressScripts) -> String {
    if map.is_empty() {
        return "map[string]string{}".to_string();
    }
    let entries: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("{}: {}", string_literal(key), string_literal(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Single-quoted V string literal. `$` is escaped too, since V interpolates
/// it inside string literals.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' | '\'' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Record types are plain words; anything else is folded to `_`.
fn const_ident(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
