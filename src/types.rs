// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for registry records
//!
//! A [`Record`] mirrors one `%%`-delimited entry of the IANA Language Subtag
//! Registry. Registry field names such as `Preferred-Value` are not valid
//! Rust identifiers, so every field goes through the [`Field`] alias table:
//! the parser maps external names to fields, the JSON emitter maps them back.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Registry fields, in the order they are written back out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Type,
    Tag,
    Subtag,
    Description,
    Added,
    Deprecated,
    PreferredValue,
    Prefix,
    SuppressScript,
    Macrolanguage,
    Scope,
    Comments,
}

/// Bidirectional alias table: field <-> external registry name
const FIELD_ALIASES: [(Field, &str); 12] = [
    (Field::Type, "Type"),
    (Field::Tag, "Tag"),
    (Field::Subtag, "Subtag"),
    (Field::Description, "Description"),
    (Field::Added, "Added"),
    (Field::Deprecated, "Deprecated"),
    (Field::PreferredValue, "Preferred-Value"),
    (Field::Prefix, "Prefix"),
    (Field::SuppressScript, "Suppress-Script"),
    (Field::Macrolanguage, "Macrolanguage"),
    (Field::Scope, "Scope"),
    (Field::Comments, "Comments"),
];

impl Field {
    pub fn all() -> impl Iterator<Item = Field> {
        FIELD_ALIASES.iter().map(|(field, _)| *field)
    }

    /// Name used in the registry text and in exported JSON.
    pub fn external_name(self) -> &'static str {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    /// Look up a registry field name. Case-sensitive, like the registry itself.
    pub fn from_external(name: &str) -> Option<Field> {
        FIELD_ALIASES
            .iter()
            .find(|(_, external)| *external == name)
            .map(|(field, _)| *field)
    }

    /// Fields allowed to repeat within one record.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Field::Description | Field::Prefix | Field::Comments)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.external_name())
    }
}

/// Ordered, non-empty sequence of values for a multi-valued field.
///
/// A field seen once holds one value; every repeat is appended in source
/// order. Serializes as a plain string when it holds a single value and as
/// an array otherwise, which is the shape the registry data takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values(Vec<String>);

impl Values {
    pub fn one(value: impl Into<String>) -> Self {
        Values(vec![value.into()])
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value when exactly one is present.
    pub fn single(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Serialize for Values {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(only) = self.single() {
            return serializer.serialize_str(only);
        }
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for value in &self.0 {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Borrowed view of one field's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Scalar(&'a str),
    Multi(&'a Values),
}

impl Serialize for FieldValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(value) => serializer.serialize_str(value),
            FieldValue::Multi(values) => values.serialize(serializer),
        }
    }
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The `Type` field: `language`, `extlang`, `script`, `region`,
    /// `variant`, `grandfathered`, `redundant`, or anything else.
    pub kind: String,
    pub tag: Option<String>,
    pub subtag: Option<String>,
    pub description: Option<Values>,
    pub added: Option<String>,
    pub deprecated: Option<String>,
    pub preferred_value: Option<String>,
    pub prefix: Option<Values>,
    pub suppress_script: Option<String>,
    pub macrolanguage: Option<String>,
    pub scope: Option<String>,
    pub comments: Option<Values>,
}

impl Record {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            tag: None,
            subtag: None,
            description: None,
            added: None,
            deprecated: None,
            preferred_value: None,
            prefix: None,
            suppress_script: None,
            macrolanguage: None,
            scope: None,
            comments: None,
        }
    }

    /// Builder-style setter. Multi-valued fields append, scalar fields
    /// overwrite.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.multi_slot(field) {
            Some(Some(values)) => values.push(value),
            Some(slot) => *slot = Some(Values::one(value)),
            None => self.set_scalar(field, value),
        }
        self
    }

    /// Store a folded field. Scalar fields take the first value.
    pub(crate) fn assign(&mut self, field: Field, values: Values) {
        match self.multi_slot(field) {
            Some(slot) => *slot = Some(values),
            None => {
                let value = values.first().to_string();
                self.set_scalar(field, value);
            }
        }
    }

    fn multi_slot(&mut self, field: Field) -> Option<&mut Option<Values>> {
        match field {
            Field::Description => Some(&mut self.description),
            Field::Prefix => Some(&mut self.prefix),
            Field::Comments => Some(&mut self.comments),
            _ => None,
        }
    }

    fn set_scalar(&mut self, field: Field, value: String) {
        match field {
            Field::Type => self.kind = value,
            Field::Tag => self.tag = Some(value),
            Field::Subtag => self.subtag = Some(value),
            Field::Added => self.added = Some(value),
            Field::Deprecated => self.deprecated = Some(value),
            Field::PreferredValue => self.preferred_value = Some(value),
            Field::SuppressScript => self.suppress_script = Some(value),
            Field::Macrolanguage => self.macrolanguage = Some(value),
            Field::Scope => self.scope = Some(value),
            Field::Description | Field::Prefix | Field::Comments => {}
        }
    }

    pub fn get(&self, field: Field) -> Option<FieldValue<'_>> {
        fn scalar(value: &Option<String>) -> Option<FieldValue<'_>> {
            value.as_deref().map(FieldValue::Scalar)
        }
        match field {
            Field::Type => Some(FieldValue::Scalar(&self.kind)),
            Field::Tag => scalar(&self.tag),
            Field::Subtag => scalar(&self.subtag),
            Field::Description => self.description.as_ref().map(FieldValue::Multi),
            Field::Added => scalar(&self.added),
            Field::Deprecated => scalar(&self.deprecated),
            Field::PreferredValue => scalar(&self.preferred_value),
            Field::Prefix => self.prefix.as_ref().map(FieldValue::Multi),
            Field::SuppressScript => scalar(&self.suppress_script),
            Field::Macrolanguage => scalar(&self.macrolanguage),
            Field::Scope => scalar(&self.scope),
            Field::Comments => self.comments.as_ref().map(FieldValue::Multi),
        }
    }

    /// Canonical tag: `Preferred-Value`, else `Subtag`, else `Tag`.
    ///
    /// Empty values fall through to the next candidate.
    pub fn canonical_tag(&self) -> Option<&str> {
        [&self.preferred_value, &self.subtag, &self.tag]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .find(|value| !value.is_empty())
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.as_deref().is_some_and(|date| !date.is_empty())
    }

    pub fn is_private_use(&self) -> bool {
        self.description
            .as_ref()
            .and_then(Values::single)
            .is_some_and(|text| text == "Private use")
    }
}

impl Serialize for Record {
    /// Writes external field names in alias-table order, omitting absent fields.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(Field, FieldValue<'_>)> = Field::all()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
            .collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (field, value) in present {
            map.serialize_entry(field.external_name(), &value)?;
        }
        map.end()
    }
}
