//! Translation of [`FilterState`] into a backend-agnostic query.
//!
//! The builder only produces a predicate tree; each backend owns the single
//! step that turns it into its own syntax.

pub mod fragment;

use serde::Serialize;

use crate::filters::{FilterState, MatchOp};
use crate::models::{Activity, ApprovalStage, Column, RiskRating};

pub const PAGE_SIZE: u32 = 20;

/// Columns matched by the global search box.
pub const GLOBAL_SEARCH_COLUMNS: [Column; 3] = [Column::Name, Column::Code, Column::AlternateName];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Predicate {
    Equals(Column, String),
    /// Case-insensitive match against a `%` wildcard pattern.
    ILike(Column, String),
    In(Column, Vec<String>),
    IsNull(Column),
    NotNull(Column),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Case-insensitive substring match; wildcards in `term` are literal.
    pub fn contains(column: Column, term: &str) -> Self {
        Self::ILike(column, format!("%{}%", escape_like(term)))
    }

    /// Reference semantics, used by the in-memory backend.
    ///
    /// Cells are read as text, so an empty cell stands in for null.
    pub fn matches(&self, activity: &Activity) -> bool {
        match self {
            Self::Equals(column, value) => activity.field(*column) == value,
            Self::ILike(column, pattern) => like_matches(pattern, activity.field(*column)),
            Self::In(column, values) => {
                let cell = activity.field(*column);
                values.iter().any(|value| value == cell)
            }
            Self::IsNull(column) => activity.field(*column).is_empty(),
            Self::NotNull(column) => !activity.field(*column).is_empty(),
            Self::Or(branches) => branches.iter().any(|branch| branch.matches(activity)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub column: Column,
    pub ascending: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn for_page(page: u32) -> Self {
        let page = u64::from(page.max(1));
        let limit = u64::from(PAGE_SIZE);
        Self {
            offset: (page - 1) * limit,
            limit,
        }
    }

    /// Inclusive upper bound of the window.
    pub fn last(&self) -> u64 {
        self.offset + self.limit - 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityQuery {
    /// Conjunction of every active constraint.
    pub filters: Vec<Predicate>,
    pub order: SortOrder,
    pub window: PageWindow,
}

impl ActivityQuery {
    pub fn matches(&self, activity: &Activity) -> bool {
        self.filters.iter().all(|predicate| predicate.matches(activity))
    }
}

#[cfg(test)]
impl ActivityQuery {
    pub fn has_constraints(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn equalities(&self) -> impl Iterator<Item = &Predicate> {
        self.filters
            .iter()
            .filter(|predicate| matches!(predicate, Predicate::Equals(..)))
    }

    pub fn memberships(&self) -> impl Iterator<Item = &Predicate> {
        self.filters
            .iter()
            .filter(|predicate| matches!(predicate, Predicate::In(..)))
    }
}

pub fn build_query(state: &FilterState, page: u32) -> ActivityQuery {
    let mut filters = Vec::new();

    let search = state.search.trim();
    if !search.is_empty() {
        filters.push(Predicate::Or(
            GLOBAL_SEARCH_COLUMNS
                .into_iter()
                .map(|column| Predicate::contains(column, search))
                .collect(),
        ));
    }

    if !state.category().is_empty() {
        filters.push(Predicate::Equals(
            Column::Category,
            state.category().to_string(),
        ));
    }
    if !state.group().is_empty() {
        filters.push(Predicate::Equals(Column::Group, state.group().to_string()));
    }

    push_membership(&mut filters, Column::Group, state.groups.iter().cloned());
    push_membership(
        &mut filters,
        Column::Category,
        state.categories.iter().cloned(),
    );
    push_membership(&mut filters, Column::Code, state.codes.iter().cloned());
    push_membership(
        &mut filters,
        Column::ThirdParty,
        state.third_parties.iter().cloned(),
    );

    if state.third_party_only {
        filters.push(Predicate::NotNull(Column::ThirdParty));
    }

    if state.fast_track {
        push_membership(
            &mut filters,
            Column::RiskRating,
            RiskRating::FAST_TRACK
                .into_iter()
                .map(|rating| rating.backend_value().to_string()),
        );
    }

    push_membership(
        &mut filters,
        Column::RiskRating,
        state
            .risk_ratings
            .iter()
            .map(|rating| rating.backend_value().to_string()),
    );

    if let Some(predicate) = approval_stage_predicate(state.approval_stages.iter().copied()) {
        filters.push(predicate);
    }

    for (column, search) in &state.column_search {
        let value = search.value.trim();
        if value.is_empty() {
            continue;
        }
        filters.push(match search.op {
            MatchOp::Exact => Predicate::Equals(*column, value.to_string()),
            MatchOp::Contains => Predicate::contains(*column, value),
            MatchOp::Pattern => Predicate::ILike(*column, value.to_string()),
        });
    }

    ActivityQuery {
        filters,
        order: SortOrder {
            column: Column::Code,
            ascending: state.sort_ascending,
        },
        window: PageWindow::for_page(page),
    }
}

fn push_membership(
    filters: &mut Vec<Predicate>,
    column: Column,
    values: impl Iterator<Item = String>,
) {
    let values: Vec<String> = values.collect();
    if !values.is_empty() {
        filters.push(Predicate::In(column, values));
    }
}

/// A selection mixing concrete stages with "not required" must keep both
/// branches: `When IN (...) OR When IS NULL`.
fn approval_stage_predicate(stages: impl Iterator<Item = ApprovalStage>) -> Option<Predicate> {
    let mut concrete = Vec::new();
    let mut absent = false;
    for stage in stages {
        match stage.backend_value() {
            Some(value) => concrete.push(value.to_string()),
            None => absent = true,
        }
    }

    match (concrete.is_empty(), absent) {
        (true, false) => None,
        (true, true) => Some(Predicate::IsNull(Column::When)),
        (false, false) => Some(Predicate::In(Column::When, concrete)),
        (false, true) => Some(Predicate::Or(vec![
            Predicate::In(Column::When, concrete),
            Predicate::IsNull(Column::When),
        ])),
    }
}

/// Backslash-escapes the characters `ILIKE` (and PostgREST, for `*`)
/// would read as wildcards.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_' | '*') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    AnyRun,
    AnyChar,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        tokens.push(match ch {
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyChar,
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// SQL `ILIKE` semantics: `%` matches any run, `_` a single character,
/// `\` makes the next character literal.
fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern = like_tokens(&pattern.to_lowercase());
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        let step = match pattern.get(p) {
            Some(LikeToken::AnyChar) => true,
            Some(LikeToken::Literal(ch)) => *ch == text[t],
            _ => false,
        };
        if step {
            p += 1;
            t += 1;
        } else if pattern.get(p) == Some(&LikeToken::AnyRun) {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, resume)) = backtrack {
            p = star + 1;
            t = resume + 1;
            backtrack = Some((star, resume + 1));
        } else {
            return false;
        }
    }

    while pattern.get(p) == Some(&LikeToken::AnyRun) {
        p += 1;
    }
    p == pattern.len()
}
