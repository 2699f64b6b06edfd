//! Column filters in the shareable `<field>.<op>.<value>` form.
//!
//! Links carry a comma separated list such as
//! `"Activity Name".ilike.%25cafe%25,Group.eq.4711`.

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::filters::{ColumnSearch, MatchOp};
use crate::models::Column;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error("`{0}` is not of the form <field>.<op>.<value>")]
    Malformed(String),
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("empty value for `{0}`")]
    EmptyValue(String),
}

const OPERATORS: [(&str, MatchOp); 2] = [(".ilike.", MatchOp::Pattern), (".eq.", MatchOp::Exact)];

pub fn parse_fragment(raw: &str) -> Result<(Column, ColumnSearch), FragmentError> {
    let fragment = raw.trim();
    let (field, op, value) = OPERATORS
        .iter()
        .filter_map(|(token, op)| {
            fragment
                .find(token)
                .map(|at| (at, &fragment[..at], *op, &fragment[at + token.len()..]))
        })
        .min_by_key(|(at, ..)| *at)
        .map(|(_, field, op, value)| (field, op, value))
        .ok_or_else(|| FragmentError::Malformed(fragment.to_string()))?;

    if field.trim().is_empty() {
        return Err(FragmentError::Malformed(fragment.to_string()));
    }
    let column =
        Column::from_db_name(field).ok_or_else(|| FragmentError::UnknownColumn(field.to_string()))?;

    let value = match op {
        MatchOp::Pattern => decode_once(value),
        _ => value.to_string(),
    };
    if value.trim().trim_matches('%').is_empty() {
        return Err(FragmentError::EmptyValue(field.to_string()));
    }

    Ok((column, ColumnSearch { op, value }))
}

/// Parses every fragment, skipping the ones that do not parse.
pub fn parse_fragments(raw: &str) -> Vec<(Column, ColumnSearch)> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| match parse_fragment(part) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!("skipping column filter: {err}");
                None
            }
        })
        .collect()
}

/// A `%25` means the value was encoded twice on its way here.
fn decode_once(value: &str) -> String {
    if !value.contains("%25") {
        return value.to_string();
    }
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_bare_fields() {
        let (column, search) = parse_fragment("\"Activity Name\".ilike.%cafe%").unwrap();
        assert_eq!(column, Column::Name);
        assert_eq!(search.op, MatchOp::Pattern);
        assert_eq!(search.value, "%cafe%");

        let (column, search) = parse_fragment("Third Party.ilike.%health%").unwrap();
        assert_eq!(column, Column::ThirdParty);
        assert_eq!(search.value, "%health%");

        let (column, search) = parse_fragment("Group.eq.4711").unwrap();
        assert_eq!(column, Column::Group);
        assert_eq!(search.op, MatchOp::Exact);
        assert_eq!(search.value, "4711");
    }

    #[test]
    fn decodes_double_encoded_patterns_once() {
        let (_, search) = parse_fragment("Notes.ilike.%25license%2520fee%25").unwrap();
        assert_eq!(search.value, "%license%20fee%");
    }

    #[test]
    fn keeps_value_when_decoding_fails() {
        let (_, search) = parse_fragment("Notes.ilike.%25%FF%25").unwrap();
        assert_eq!(search.value, "%25%FF%25");
    }

    #[test]
    fn rejects_malformed_fragments() {
        assert!(matches!(
            parse_fragment("Code=4711"),
            Err(FragmentError::Malformed(_))
        ));
        assert!(matches!(
            parse_fragment(".eq.4711"),
            Err(FragmentError::Malformed(_))
        ));
        assert!(matches!(
            parse_fragment("Colour.eq.red"),
            Err(FragmentError::UnknownColumn(_))
        ));
        assert!(matches!(
            parse_fragment("Code.ilike.%%"),
            Err(FragmentError::EmptyValue(_))
        ));
    }

    #[test]
    fn skips_bad_fragments_and_keeps_the_rest() {
        let parsed = parse_fragments("Code.ilike.%47%,garbage,,Group.eq.12,Nope.eq.1");
        let columns: Vec<Column> = parsed.iter().map(|(column, _)| *column).collect();
        assert_eq!(columns, vec![Column::Code, Column::Group]);
    }
}
