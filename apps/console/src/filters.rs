use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ApprovalStage, Column, RiskRating};

/// How a per-column search term is matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOp {
    /// Exact equality.
    Exact,
    /// Case-insensitive substring.
    Contains,
    /// Case-insensitive pattern carrying its own `%` wildcards.
    Pattern,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSearch {
    pub op: MatchOp,
    pub value: String,
}

impl ColumnSearch {
    /// A term typed into a column header.
    pub fn for_term(column: Column, term: &str) -> Self {
        let op = if column.is_exact_match() {
            MatchOp::Exact
        } else {
            MatchOp::Contains
        };
        Self {
            op,
            value: term.trim().to_string(),
        }
    }

    pub fn display_value(&self) -> &str {
        match self.op {
            MatchOp::Pattern => self.value.trim_matches('%'),
            _ => &self.value,
        }
    }
}

/// Cache key for a (filter state, page) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every filter dimension of the activity table.
///
/// Mutators return whether the query changed so callers know when to drop
/// cached pages and reload from the first page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    category: String,
    group: String,
    pub groups: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub codes: BTreeSet<String>,
    pub third_parties: BTreeSet<String>,
    pub approval_stages: BTreeSet<ApprovalStage>,
    pub risk_ratings: BTreeSet<RiskRating>,
    pub fast_track: bool,
    pub third_party_only: bool,
    pub column_search: BTreeMap<Column, ColumnSearch>,
    pub sort_ascending: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            group: String::new(),
            groups: BTreeSet::new(),
            categories: BTreeSet::new(),
            codes: BTreeSet::new(),
            third_parties: BTreeSet::new(),
            approval_stages: BTreeSet::new(),
            risk_ratings: BTreeSet::new(),
            fast_track: false,
            third_party_only: false,
            column_search: BTreeMap::new(),
            sort_ascending: true,
        }
    }
}

impl FilterState {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.trim();
        if self.search == term {
            return false;
        }
        self.search = term.to_string();
        true
    }

    /// Selecting a category clears the group; an empty value means "all".
    pub fn select_category(&mut self, category: &str) -> bool {
        let category = category.trim();
        if self.category == category {
            return false;
        }
        self.category = category.to_string();
        self.group.clear();
        true
    }

    /// Selecting a group clears the category; an empty value means "all".
    pub fn select_group(&mut self, group: &str) -> bool {
        let group = group.trim();
        if self.group == group {
            return false;
        }
        self.group = group.to_string();
        self.category.clear();
        true
    }

    pub fn toggle_group(&mut self, group: &str) -> bool {
        toggle_value(&mut self.groups, group)
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle_value(&mut self.categories, category)
    }

    pub fn toggle_code(&mut self, code: &str) -> bool {
        toggle_value(&mut self.codes, code)
    }

    /// Adds a code without removing it when already selected.
    pub fn add_code(&mut self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && self.codes.insert(code.to_string())
    }

    pub fn toggle_third_party(&mut self, name: &str) -> bool {
        toggle_value(&mut self.third_parties, name)
    }

    pub fn clear_third_parties(&mut self) -> bool {
        if self.third_parties.is_empty() {
            return false;
        }
        self.third_parties.clear();
        true
    }

    pub fn toggle_approval_stage(&mut self, stage: ApprovalStage) -> bool {
        if !self.approval_stages.insert(stage) {
            self.approval_stages.remove(&stage);
        }
        true
    }

    pub fn toggle_risk_rating(&mut self, rating: RiskRating) -> bool {
        if !self.risk_ratings.insert(rating) {
            self.risk_ratings.remove(&rating);
        }
        true
    }

    pub fn set_fast_track(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.fast_track, enabled) != enabled
    }

    pub fn set_third_party_only(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.third_party_only, enabled) != enabled
    }

    /// An empty term removes the column's search.
    pub fn set_column_search(&mut self, column: Column, term: &str) -> bool {
        if term.trim().is_empty() {
            return self.column_search.remove(&column).is_some();
        }
        self.put_column_search(column, ColumnSearch::for_term(column, term))
    }

    pub fn put_column_search(&mut self, column: Column, search: ColumnSearch) -> bool {
        if self.column_search.get(&column) == Some(&search) {
            return false;
        }
        self.column_search.insert(column, search);
        true
    }

    pub fn toggle_sort(&mut self) -> bool {
        self.sort_ascending = !self.sort_ascending;
        true
    }

    /// Clears every filter dimension; the sort direction is kept.
    pub fn reset(&mut self) -> bool {
        let reset = Self {
            sort_ascending: self.sort_ascending,
            ..Self::default()
        };
        if reset == *self {
            return false;
        }
        *self = reset;
        true
    }

    pub fn is_unfiltered(&self) -> bool {
        *self
            == Self {
                sort_ascending: self.sort_ascending,
                ..Self::default()
            }
    }

    /// Stable encoding of every filter field plus the requested page.
    ///
    /// Sets and maps are ordered, so equal states always encode equally and
    /// distinct states never share a key the way joined strings can.
    pub fn fingerprint(&self, page: u32) -> Option<Fingerprint> {
        match serde_json::to_string(&(self, page)) {
            Ok(encoded) => Some(Fingerprint(encoded)),
            Err(err) => {
                tracing::warn!("filter fingerprint unavailable: {err}");
                None
            }
        }
    }
}

fn toggle_value(set: &mut BTreeSet<String>, value: &str) -> bool {
    let key = value.trim();
    if key.is_empty() {
        return false;
    }
    if !set.remove(key) {
        set.insert(key.to_string());
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_and_group_are_mutually_exclusive() {
        let mut state = FilterState::default();
        assert!(state.select_group("4711"));
        assert!(state.select_category("Retail"));
        assert_eq!(state.group(), "");
        assert_eq!(state.category(), "Retail");

        assert!(state.select_group("4711"));
        assert_eq!(state.category(), "");
        assert_eq!(state.group(), "4711");

        assert!(!state.select_group("4711"));
        assert!(state.select_category(""));
        assert_eq!(state.group(), "");
    }

    #[test]
    fn multi_select_axes_do_not_touch_single_select() {
        let mut state = FilterState::default();
        state.select_category("Retail");
        state.toggle_group("4711");
        state.toggle_third_party("Ministry of Health");
        state.toggle_risk_rating(RiskRating::High);
        assert_eq!(state.category(), "Retail");
        assert!(state.groups.contains("4711"));

        state.toggle_third_party("Ministry of Health");
        assert!(state.third_parties.is_empty());
        assert!(!state.toggle_code("   "));
    }

    #[test]
    fn adding_a_code_twice_is_not_a_change() {
        let mut state = FilterState::default();
        assert!(state.add_code(" 3011001 "));
        assert!(!state.add_code("3011001"));
        assert!(!state.add_code(""));
        assert!(state.toggle_code("3011001"));
        assert!(state.codes.is_empty());
    }

    #[test]
    fn column_search_uses_exact_match_for_group_only() {
        let mut state = FilterState::default();
        state.set_column_search(Column::Group, " 4711 ");
        state.set_column_search(Column::ThirdParty, "health");
        assert_eq!(state.column_search[&Column::Group].op, MatchOp::Exact);
        assert_eq!(state.column_search[&Column::Group].value, "4711");
        assert_eq!(state.column_search[&Column::ThirdParty].op, MatchOp::Contains);

        assert!(state.set_column_search(Column::Group, ""));
        assert!(!state.column_search.contains_key(&Column::Group));
        assert!(!state.set_column_search(Column::ThirdParty, "health"));
    }

    #[test]
    fn fingerprint_distinguishes_states_that_join_to_the_same_text() {
        let mut left = FilterState::default();
        left.toggle_third_party("a,b");
        let mut right = FilterState::default();
        right.toggle_third_party("a");
        right.toggle_third_party("b");
        assert_ne!(left.fingerprint(1), right.fingerprint(1));
    }

    #[test]
    fn fingerprint_is_stable_and_page_sensitive() {
        let mut left = FilterState::default();
        left.toggle_group("2");
        left.toggle_group("1");
        let mut right = FilterState::default();
        right.toggle_group("1");
        right.toggle_group("2");
        assert_eq!(left.fingerprint(1), right.fingerprint(1));
        assert_ne!(left.fingerprint(1), left.fingerprint(2));
    }

    #[test]
    fn reset_keeps_sort_direction() {
        let mut state = FilterState::default();
        state.toggle_sort();
        state.set_search("shop");
        state.set_fast_track(true);
        assert!(state.reset());
        assert!(state.is_unfiltered());
        assert!(!state.sort_ascending);
        assert!(!state.reset());
    }
}
