use std::sync::Arc;

use super::{distinct_column, ActivityBackend, ClientResult};
use crate::models::{Activity, ActivityPage, Column};
use crate::query::ActivityQuery;

/// Evaluates queries against rows held in memory.
///
/// Used when no backend endpoint is configured and as a test double.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    rows: Arc<Vec<Activity>>,
}

impl MemoryBackend {
    pub fn new(rows: Vec<Activity>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(crate::fixtures::activities::sample_activities())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl ActivityBackend for MemoryBackend {
    async fn fetch_page(&self, query: &ActivityQuery) -> ClientResult<ActivityPage> {
        let mut matched: Vec<&Activity> = self.rows.iter().filter(|row| query.matches(row)).collect();

        let column = query.order.column;
        matched.sort_by(|left, right| left.field(column).cmp(right.field(column)));
        if !query.order.ascending {
            matched.reverse();
        }

        let total_count = matched.len() as u64;
        let rows = matched
            .into_iter()
            .skip(query.window.offset as usize)
            .take(query.window.limit as usize)
            .cloned()
            .collect();

        Ok(ActivityPage { rows, total_count })
    }

    async fn distinct_values(&self, column: Column) -> ClientResult<Vec<String>> {
        Ok(distinct_column(&self.rows, column))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::filters::FilterState;
    use crate::query::build_query;

    fn row(code: &str, name: &str) -> Activity {
        Activity {
            code: code.into(),
            name: name.into(),
            ..Activity::default()
        }
    }

    #[test]
    fn pages_sorted_matches() {
        let backend = MemoryBackend::new(
            (0..45)
                .rev()
                .map(|i| row(&format!("{i:04}"), "Trading"))
                .collect(),
        );
        let page = block_on(backend.fetch_page(&build_query(&FilterState::default(), 3))).unwrap();
        assert_eq!(page.total_count, 45);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].code, "0040");
    }

    #[test]
    fn descending_sort_reverses_order() {
        let backend = MemoryBackend::new(vec![row("A", "x"), row("C", "x"), row("B", "x")]);
        let mut state = FilterState::default();
        state.toggle_sort();
        let page = block_on(backend.fetch_page(&build_query(&state, 1))).unwrap();
        let codes: Vec<&str> = page.rows.iter().map(|row| row.code.as_str()).collect();
        assert_eq!(codes, vec!["C", "B", "A"]);
    }

    #[test]
    fn search_matches_name_or_code() {
        let backend = MemoryBackend::new(vec![
            row("SHOP-1", "Bakery"),
            row("B-2", "Coffee Shop"),
            row("C-3", "Trading"),
        ]);
        let mut state = FilterState::default();
        state.set_search("shop");
        let page = block_on(backend.fetch_page(&build_query(&state, 1))).unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn search_treats_underscore_literally() {
        let backend = MemoryBackend::new(vec![row("A", "Coffee shop"), row("B", "Gold_trading")]);
        let mut state = FilterState::default();
        state.set_search("_");
        let page = block_on(backend.fetch_page(&build_query(&state, 1))).unwrap();
        let codes: Vec<&str> = page.rows.iter().map(|row| row.code.as_str()).collect();
        assert_eq!(codes, vec!["B"]);
    }

    #[test]
    fn fixtures_are_available() {
        assert!(MemoryBackend::with_fixtures().len() > crate::query::PAGE_SIZE as usize);
    }
}
