// SPDX-License-Identifier: PMPL-1.0-or-later

//! Raw per-type JSON dumps of registry records
//!
//! No filtering happens here: deprecated and private-use records are written
//! like any other. Keys use the registry's external field names.

use super::write_atomic;
use crate::error::{RegistryError, Result};
use crate::tags::group_by_type;
use crate::types::Record;
use std::path::{Path, PathBuf};
use tracing::info;

/// Pretty-printed JSON array (2-space indent) for one group of records.
pub fn render_json(records: &[&Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Write `<type>.json` into `dir` for every record type, in first-appearance
/// order. Returns the written paths.
pub fn write_json_groups(records: &[Record], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (kind, group) in group_by_type(records) {
        let path = dir.join(format!("{kind}.json"));
        let json = render_json(&group).map_err(|source| RegistryError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, json.as_bytes())?;
        info!(path = %path.display(), records = group.len(), "wrote JSON group");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;
    use tempfile::TempDir;

    #[test]
    fn render_uses_two_space_indent() {
        let record = Record::new("script").with(Field::Subtag, "Latn");
        let json = render_json(&[&record]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"Type\": \"script\",\n    \"Subtag\": \"Latn\"\n  }\n]"
        );
    }

    #[test]
    fn non_ascii_text_is_written_verbatim() {
        let record = Record::new("language")
            .with(Field::Subtag, "pro")
            .with(Field::Description, "Old Provençal (to 1500)");
        let json = render_json(&[&record]).unwrap();
        assert!(json.contains("\"Description\": \"Old Provençal (to 1500)\""));
        assert!(!json.contains("\\u00e7"));
    }

    #[test]
    fn writes_one_file_per_type() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            Record::new("language").with(Field::Subtag, "en"),
            Record::new("script").with(Field::Subtag, "Latn"),
            Record::new("language")
                .with(Field::Subtag, "in")
                .with(Field::Deprecated, "1989-01-01"),
        ];
        let written = write_json_groups(&records, dir.path()).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("language.json"), dir.path().join("script.json")]
        );

        let language: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        let entries = language.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["Deprecated"], "1989-01-01");
        assert!(entries[0].get("Deprecated").is_none());
    }
}
