// SPDX-License-Identifier: PMPL-1.0-or-later

//! subtag-registry: IANA Language Subtag Registry tooling.
//!
//! Keeps an i18n library's compile-time language tables in sync with the
//! canonical IANA registry.
//!
//! PIPELINE:
//! 1. **Fetch**: download the registry, replacing the local copy only when
//!    its `File-Date` changed.
//! 2. **Parse**: split the registry text into [`types::Record`]s, joining
//!    continuation lines and folding repeated fields.
//! 3. **Derive**: group records by `Type` and compose the language, extlang
//!    and variant tag tables, honouring suppress-scripts and the variant
//!    blacklist.
//! 4. **Emit**: write raw per-type JSON dumps, or V constant modules that are
//!    then run through the V formatter.

pub mod commands;
pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod tags;
pub mod types;

pub use error::{RegistryError, Result};
