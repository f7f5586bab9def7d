// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for registry parsing, derivation and artifact output

use std::path::PathBuf;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while reading, fetching or exporting the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("line {line}: expected `Name: value`, found {content:?}")]
    MissingColon { line: usize, content: String },

    #[error("line {line}: continuation line has no field to extend")]
    OrphanContinuation { line: usize },

    #[error("record starting at line {line} has no Type field")]
    MissingType { line: usize },

    #[error("line {line}: unknown field {name:?}")]
    UnknownField { line: usize, name: String },

    #[error("line {line}: field {name} may only appear once per record")]
    RepeatedField { line: usize, name: String },

    #[error("invalid File-Date header: {found:?}")]
    InvalidFileDate { found: String },

    #[error("no local registry at {path} (run `dl-registry` first)")]
    MissingCache { path: PathBuf },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the malformed-input family (the parse as a whole is rejected).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MissingColon { .. }
                | Self::OrphanContinuation { .. }
                | Self::MissingType { .. }
                | Self::UnknownField { .. }
                | Self::RepeatedField { .. }
                | Self::InvalidFileDate { .. }
        )
    }
}
