// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registry text parser
//!
//! The registry is a flat text file: a header segment carrying `File-Date`,
//! then records separated by lines containing exactly `%%`. Each record is a
//! run of `Name: value` lines; a line starting with one space continues the
//! previous value.

use super::Registry;
use crate::error::{RegistryError, Result};
use crate::types::{Field, Record, Values};
use indexmap::IndexMap;
use tracing::debug;

const RECORD_SEPARATOR: &str = "%%";
const FILE_DATE_FIELD: &str = "File-Date";

/// A source line paired with its 1-based line number.
type NumberedLine<'a> = (usize, &'a str);

/// Parse the complete registry text.
///
/// Any malformed record fails the whole parse.
pub fn parse(content: &str) -> Result<Registry> {
    let mut segments = split_segments(content);
    let header = if segments.is_empty() {
        Vec::new()
    } else {
        segments.remove(0)
    };

    let file_date = header
        .iter()
        .filter_map(|(_, line)| split_field(line))
        .find(|(name, _)| *name == FILE_DATE_FIELD)
        .map(|(_, value)| value.to_string());

    let records = segments
        .iter()
        .zip(separator_lines(content))
        .map(|(segment, separator_line)| parse_record(segment, separator_line + 1))
        .collect::<Result<Vec<_>>>()?;

    debug!(records = records.len(), ?file_date, "parsed registry");
    Ok(Registry { file_date, records })
}

/// Split into `%%`-separated segments; the first one is the header.
fn split_segments(content: &str) -> Vec<Vec<NumberedLine<'_>>> {
    let mut segments = vec![Vec::new()];
    for (index, line) in content.lines().enumerate() {
        if line == RECORD_SEPARATOR {
            segments.push(Vec::new());
        } else if let Some(current) = segments.last_mut() {
            current.push((index + 1, line));
        }
    }
    segments
}

fn separator_lines(content: &str) -> impl Iterator<Item = usize> + '_ {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| *line == RECORD_SEPARATOR)
        .map(|(index, _)| index + 1)
}

/// Join continuation lines onto the line they continue.
///
/// Exactly one leading space is removed and no separator is inserted.
/// Blank lines are dropped.
fn join_continuations(lines: &[NumberedLine<'_>]) -> Result<Vec<(usize, String)>> {
    let mut logical: Vec<(usize, String)> = Vec::new();
    for &(number, line) in lines {
        if let Some(rest) = line.strip_prefix(' ') {
            if line.trim().is_empty() {
                continue;
            }
            match logical.last_mut() {
                Some((_, previous)) => previous.push_str(rest),
                None => return Err(RegistryError::OrphanContinuation { line: number }),
            }
        } else if !line.trim().is_empty() {
            logical.push((number, line.to_string()));
        }
    }
    Ok(logical)
}

/// Split `Name: value` at the first colon, trimming both halves.
fn split_field(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
}

/// Parse one record segment. `start_line` is used for errors about the
/// record as a whole.
fn parse_record(lines: &[NumberedLine<'_>], start_line: usize) -> Result<Record> {
    let mut folded: IndexMap<String, (usize, Values)> = IndexMap::new();

    for (number, line) in join_continuations(lines)? {
        let (name, value) = split_field(&line).ok_or_else(|| RegistryError::MissingColon {
            line: number,
            content: line.clone(),
        })?;
        match folded.get_mut(name) {
            Some((_, values)) => values.push(value),
            None => {
                folded.insert(name.to_string(), (number, Values::one(value)));
            }
        }
    }

    let kind = match folded.shift_remove("Type") {
        Some((line, values)) if values.len() > 1 => {
            return Err(RegistryError::RepeatedField {
                line,
                name: Field::Type.to_string(),
            })
        }
        Some((_, values)) => values.first().to_string(),
        None => return Err(RegistryError::MissingType { line: start_line }),
    };

    let mut record = Record::new(kind);
    for (name, (line, values)) in folded {
        let field = Field::from_external(&name)
            .ok_or_else(|| RegistryError::UnknownField { line, name: name.clone() })?;
        if values.len() > 1 && !field.is_multi_valued() {
            return Err(RegistryError::RepeatedField { line, name });
        }
        record.assign(field, values);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_drops_exactly_one_space() {
        let lines = [
            (1, "Comments: first part"),
            (2, "  second part"),
            (3, " third"),
        ];
        let joined = join_continuations(&lines).unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].1, "Comments: first part second partthird");
    }

    #[test]
    fn continuation_without_field_is_rejected() {
        let lines = [(4, " dangling")];
        let err = join_continuations(&lines).unwrap_err();
        assert!(matches!(err, RegistryError::OrphanContinuation { line: 4 }));
    }

    #[test]
    fn split_field_uses_first_colon() {
        assert_eq!(
            split_field("Comments: see: other"),
            Some(("Comments", "see: other"))
        );
        assert_eq!(split_field("Scope:"), Some(("Scope", "")));
        assert_eq!(split_field("no colon here"), None);
    }

    #[test]
    fn segments_track_line_numbers() {
        let segments = split_segments("File-Date: 2024-01-01\n%%\nType: language\n%%\nType: script\n");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], vec![(1, "File-Date: 2024-01-01")]);
        assert_eq!(segments[1], vec![(3, "Type: language")]);
        assert_eq!(segments[2], vec![(5, "Type: script")]);
    }

    #[test]
    fn separator_needs_whole_line() {
        let segments = split_segments("%%\nComments: 100%%\n%% \n");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn repeated_scalar_field_is_rejected() {
        let lines = [(2, "Type: language"), (3, "Subtag: en"), (4, "Subtag: eng")];
        let err = parse_record(&lines, 1).unwrap_err();
        assert!(matches!(err, RegistryError::RepeatedField { line: 3, .. }));
    }

    #[test]
    fn repeated_comments_are_kept_in_order() {
        let lines = [
            (2, "Type: variant"),
            (3, "Subtag: rozaj"),
            (4, "Comments: first"),
            (5, "Comments: second"),
        ];
        let record = parse_record(&lines, 1).unwrap();
        let comments = record.comments.expect("comments folded");
        assert_eq!(comments.as_slice(), ["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn empty_record_has_no_type() {
        let err = parse_record(&[], 7).unwrap_err();
        assert!(matches!(err, RegistryError::MissingType { line: 7 }));
    }
}
