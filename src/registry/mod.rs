// SPDX-License-Identifier: PMPL-1.0-or-later

//! IANA Language Subtag Registry reader

mod parser;

pub use parser::parse;

use crate::error::{RegistryError, Result};
use crate::types::Record;
use chrono::NaiveDate;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A parsed registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    /// `File-Date` from the header segment, if the header has one
    pub file_date: Option<String>,
    /// Records in source order
    pub records: Vec<Record>,
}

/// Read and parse the locally cached registry.
pub fn load(path: &Path) -> Result<Registry> {
    if !path.is_file() {
        return Err(RegistryError::MissingCache {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
    parse(&content)
}

/// Parse a `File-Date: YYYY-MM-DD` header line.
pub fn parse_file_date(line: &str) -> Result<NaiveDate> {
    let invalid = || RegistryError::InvalidFileDate {
        found: line.trim().to_string(),
    };
    let value = line
        .trim()
        .strip_prefix("File-Date:")
        .map(str::trim)
        .ok_or_else(invalid)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Read the `File-Date` from the first line of a registry file.
pub fn read_file_date(path: &Path) -> Result<NaiveDate> {
    let file = fs::File::open(path).map_err(|e| RegistryError::io(path, e))?;
    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(|e| RegistryError::io(path, e))?;
    parse_file_date(&first_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_date_header_parses() {
        let date = parse_file_date("File-Date: 2024-03-07\n").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn file_date_rejects_other_headers() {
        assert!(matches!(
            parse_file_date("Type: language"),
            Err(RegistryError::InvalidFileDate { .. })
        ));
        assert!(matches!(
            parse_file_date("File-Date: yesterday"),
            Err(RegistryError::InvalidFileDate { .. })
        ));
    }

    #[test]
    fn load_reports_missing_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("language-subtag-registry");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, RegistryError::MissingCache { .. }));
        assert!(err.to_string().contains("dl-registry"));
    }
}
