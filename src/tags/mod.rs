// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tag derivation
//!
//! Turns registry records into the tag lists exported to the i18n tables.
//! Records are grouped by `Type`; deprecated and private-use records are
//! dropped, and each remaining record contributes a canonical tag composed
//! according to its type:
//!
//! | Type       | Contribution                                          |
//! |------------|-------------------------------------------------------|
//! | `language` | bare tag; `Suppress-Script` goes to a side table      |
//! | `extlang`  | `{prefix}-{tag}` when exactly one `Prefix` is present |
//! | `variant`  | `{prefix}-{tag}` per prefix, minus blacklist and      |
//! |            | prefixes that carry a suppressed script               |
//! | otherwise  | bare tag                                              |

use crate::types::Record;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const LANGUAGE: &str = "language";
pub const EXTLANG: &str = "extlang";
pub const VARIANT: &str = "variant";

/// Variant subtags left out of the variant table.
///
/// These are the registry's prefix-less transcription variants plus
/// `simple`; composing them with a language would produce tags nobody uses.
pub const VARIANT_BLACKLIST: [&str; 7] = [
    "alalc97", "fonipa", "fonkirsh", "fonnapa", "fonupa", "fonxsamp", "simple",
];

/// Deduplicated tags for one record type, sorted lexicographically.
pub type TagSet = BTreeSet<String>;

/// Language tag -> default script that is omitted when composing tags.
pub type SuppressScripts = BTreeMap<String, String>;

/// Derived tables for a whole registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedTags {
    /// Per-type tag sets, in first-appearance order of each type
    pub tables: IndexMap<String, TagSet>,
    /// Suppress-script exceptions collected from `language` records
    pub suppress_scripts: SuppressScripts,
}

impl DerivedTags {
    pub fn get(&self, kind: &str) -> Option<&TagSet> {
        self.tables.get(kind)
    }
}

/// Group records by `Type`, keeping first-appearance order of the types and
/// source order inside each group.
pub fn group_by_type(records: &[Record]) -> IndexMap<&str, Vec<&Record>> {
    let mut groups: IndexMap<&str, Vec<&Record>> = IndexMap::new();
    for record in records {
        groups.entry(record.kind.as_str()).or_default().push(record);
    }
    groups
}

/// Derive every tag table.
///
/// The `language` group is processed first whatever its position in the
/// registry, since variant filtering reads its suppress-script table.
pub fn derive_tags(records: &[Record]) -> DerivedTags {
    let groups = group_by_type(records);
    let mut suppress_scripts = SuppressScripts::new();

    let mut language = groups
        .get(LANGUAGE)
        .map(|group| derive_language(group, &mut suppress_scripts));
    let suppressed = suppressed_prefixes(&suppress_scripts);

    let mut tables = IndexMap::new();
    for (kind, group) in &groups {
        let tags = match *kind {
            LANGUAGE => language.take().unwrap_or_default(),
            EXTLANG => derive_extlang(group),
            VARIANT => derive_variant(group, &suppressed),
            _ => derive_bare(group),
        };
        debug!(kind = *kind, records = group.len(), tags = tags.len(), "derived tag table");
        tables.insert(kind.to_string(), tags);
    }

    DerivedTags {
        tables,
        suppress_scripts,
    }
}

/// Active records paired with their canonical tag.
fn active<'a>(group: &'a [&'a Record]) -> impl Iterator<Item = (&'a Record, &'a str)> + 'a {
    group.iter().copied().filter_map(|record| {
        if record.is_deprecated() || record.is_private_use() {
            return None;
        }
        let tag = record.canonical_tag();
        if tag.is_none() {
            debug!(kind = %record.kind, "record has no Tag, Subtag or Preferred-Value; skipped");
        }
        tag.map(|tag| (record, tag))
    })
}

fn derive_language(group: &[&Record], suppress_scripts: &mut SuppressScripts) -> TagSet {
    let mut tags = TagSet::new();
    for (record, tag) in active(group) {
        if let Some(script) = &record.suppress_script {
            suppress_scripts.insert(tag.to_string(), script.clone());
        }
        tags.insert(tag.to_string());
    }
    tags
}

fn derive_extlang(group: &[&Record]) -> TagSet {
    active(group)
        .filter_map(|(record, tag)| {
            let prefix = record.prefix.as_ref()?.single()?;
            Some(format!("{prefix}-{tag}"))
        })
        .collect()
}

fn derive_variant(group: &[&Record], suppressed: &BTreeSet<String>) -> TagSet {
    let mut tags = TagSet::new();
    for (record, tag) in active(group) {
        if VARIANT_BLACKLIST.contains(&tag) {
            continue;
        }
        let Some(prefixes) = &record.prefix else {
            continue;
        };
        for prefix in prefixes.iter() {
            if !suppressed.contains(prefix) {
                tags.insert(format!("{prefix}-{tag}"));
            }
        }
    }
    tags
}

fn derive_bare(group: &[&Record]) -> TagSet {
    active(group).map(|(_, tag)| tag.to_string()).collect()
}

/// `{language}-{script}` for every suppress-script entry. A variant prefix
/// spelled this way names a script that tags are supposed to omit.
fn suppressed_prefixes(suppress_scripts: &SuppressScripts) -> BTreeSet<String> {
    suppress_scripts
        .iter()
        .map(|(language, script)| format!("{language}-{script}"))
        .collect()
}
