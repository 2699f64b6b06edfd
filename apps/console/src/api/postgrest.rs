//! PostgREST rendering of [`ActivityQuery`].

use std::borrow::Cow;

use crate::models::Column;
use crate::query::{ActivityQuery, Predicate};

const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\', ' '];

/// Query-string pairs for a page request, in the order PostgREST expects them.
pub fn query_pairs(query: &ActivityQuery) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];

    for predicate in &query.filters {
        pairs.push(top_level(predicate));
    }

    let direction = if query.order.ascending { "asc" } else { "desc" };
    pairs.push((
        "order".to_string(),
        format!("{}.{direction}", quote_ident(query.order.column.db_name())),
    ));
    pairs.push(("offset".to_string(), query.window.offset.to_string()));
    pairs.push(("limit".to_string(), query.window.limit.to_string()));
    pairs
}

/// Pairs selecting the distinct non-null values of one column.
pub fn distinct_pairs(column: Column) -> Vec<(String, String)> {
    let name = quote_ident(column.db_name()).into_owned();
    vec![
        ("select".to_string(), name.clone()),
        (column.db_name().to_string(), "not.is.null".to_string()),
        ("order".to_string(), format!("{name}.asc")),
    ]
}

fn top_level(predicate: &Predicate) -> (String, String) {
    match predicate {
        Predicate::Equals(column, value) => (column.db_name().to_string(), format!("eq.{value}")),
        Predicate::ILike(column, pattern) => {
            (column.db_name().to_string(), format!("ilike.{pattern}"))
        }
        Predicate::In(column, values) => (column.db_name().to_string(), in_list(values)),
        Predicate::IsNull(column) => (column.db_name().to_string(), "is.null".to_string()),
        Predicate::NotNull(column) => (column.db_name().to_string(), "not.is.null".to_string()),
        Predicate::Or(branches) => ("or".to_string(), format!("({})", join_inline(branches))),
    }
}

/// Rendering inside a logic group, where identifiers and values share the
/// `,.()` grammar and must be quoted when they contain it.
fn inline(predicate: &Predicate) -> String {
    match predicate {
        Predicate::Equals(column, value) => {
            format!("{}.eq.{}", quote_ident(column.db_name()), quote_value(value))
        }
        Predicate::ILike(column, pattern) => {
            format!("{}.ilike.{}", quote_ident(column.db_name()), quote_value(pattern))
        }
        Predicate::In(column, values) => {
            format!("{}.{}", quote_ident(column.db_name()), in_list(values))
        }
        Predicate::IsNull(column) => format!("{}.is.null", quote_ident(column.db_name())),
        Predicate::NotNull(column) => format!("{}.not.is.null", quote_ident(column.db_name())),
        Predicate::Or(branches) => format!("or({})", join_inline(branches)),
    }
}

fn join_inline(branches: &[Predicate]) -> String {
    branches.iter().map(inline).collect::<Vec<_>>().join(",")
}

fn in_list(values: &[String]) -> String {
    let items: Vec<Cow<'_, str>> = values.iter().map(|value| quote_value(value)).collect();
    format!("in.({})", items.join(","))
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty() || text.contains(RESERVED)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

pub(crate) fn quote_ident(name: &str) -> Cow<'_, str> {
    if needs_quotes(name) {
        Cow::Owned(quote(name))
    } else {
        Cow::Borrowed(name)
    }
}

fn quote_value(value: &str) -> Cow<'_, str> {
    if needs_quotes(value) {
        Cow::Owned(quote(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Total row count from a `Content-Range` header such as `0-19/347` or `*/0`.
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterState;
    use crate::models::ApprovalStage;
    use crate::query::build_query;

    fn value_of<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
        pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    #[test]
    fn renders_search_group_with_quoted_identifiers() {
        let mut state = FilterState::default();
        state.set_search("shop");
        let pairs = query_pairs(&build_query(&state, 1));

        assert_eq!(
            value_of(&pairs, "or"),
            vec!["(\"Activity Name\".ilike.%shop%,Code.ilike.%shop%,النشاط.ilike.%shop%)"]
        );
        assert_eq!(value_of(&pairs, "order"), vec!["Code.asc"]);
        assert_eq!(value_of(&pairs, "offset"), vec!["0"]);
        assert_eq!(value_of(&pairs, "limit"), vec!["20"]);
    }

    #[test]
    fn renders_membership_and_null_forms() {
        let mut state = FilterState::default();
        state.toggle_third_party("Ministry of Health");
        state.toggle_third_party("DED");
        state.toggle_approval_stage(ApprovalStage::Post);
        state.toggle_approval_stage(ApprovalStage::NotRequired);
        state.set_third_party_only(true);
        state.toggle_sort();
        let pairs = query_pairs(&build_query(&state, 2));

        assert_eq!(
            value_of(&pairs, "Third Party"),
            vec!["in.(DED,\"Ministry of Health\")", "not.is.null"]
        );
        assert_eq!(value_of(&pairs, "or"), vec!["(When.in.(Post),When.is.null)"]);
        assert_eq!(value_of(&pairs, "order"), vec!["Code.desc"]);
        assert_eq!(value_of(&pairs, "offset"), vec!["20"]);
    }

    #[test]
    fn quotes_values_containing_group_syntax() {
        let mut state = FilterState::default();
        state.set_search("a,b");
        let pairs = query_pairs(&build_query(&state, 1));
        assert!(value_of(&pairs, "or")[0].contains("Code.ilike.\"%a,b%\""));
    }

    #[test]
    fn escapes_wildcards_in_search_terms() {
        let mut state = FilterState::default();
        state.set_search("50%");
        let pairs = query_pairs(&build_query(&state, 1));
        assert!(value_of(&pairs, "or")[0].contains("Code.ilike.\"%50\\\\%%\""));

        let mut state = FilterState::default();
        state.set_column_search(Column::Name, "gold_");
        let pairs = query_pairs(&build_query(&state, 1));
        assert_eq!(value_of(&pairs, "Activity Name"), vec!["ilike.%gold\\_%"]);
    }

    #[test]
    fn distinct_selects_non_null_values() {
        let pairs = distinct_pairs(Column::ThirdParty);
        assert_eq!(value_of(&pairs, "select"), vec!["\"Third Party\""]);
        assert_eq!(value_of(&pairs, "Third Party"), vec!["not.is.null"]);
    }

    #[test]
    fn reads_total_from_content_range() {
        assert_eq!(parse_content_range("0-19/347"), Some(347));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-19/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }
}
