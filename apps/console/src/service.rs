use std::cell::RefCell;

use tracing::{debug, error, warn};

use crate::api::ActivityBackend;
use crate::cache::{Clock, ResultCache, SystemClock};
use crate::filters::FilterState;
use crate::models::{Activity, Column};
use crate::normalize::normalize_rows;
use crate::query::build_query;

/// Result of loading one page. Failures are values, never panics.
#[derive(Clone, Debug, PartialEq)]
pub enum PageOutcome {
    Rows {
        rows: Vec<Activity>,
        total_count: u64,
        from_cache: bool,
    },
    Empty,
    Failed(String),
}

/// Values offered by the filter lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    pub groups: Vec<String>,
    pub categories: Vec<String>,
    pub third_parties: Vec<String>,
}

pub struct ActivityService<B, C = SystemClock> {
    backend: B,
    cache: RefCell<ResultCache<C>>,
}

impl<B: ActivityBackend, C: Clock> ActivityService<B, C> {
    pub fn new(backend: B, clock: C) -> Self {
        Self {
            backend,
            cache: RefCell::new(ResultCache::new(clock)),
        }
    }

    /// Applies `mutate` to `filters`; cached pages are dropped only when
    /// the mutation reports a change.
    pub fn apply_filter_change(
        &self,
        filters: &mut FilterState,
        mutate: impl FnOnce(&mut FilterState) -> bool,
    ) -> bool {
        let changed = mutate(filters);
        if changed {
            let mut cache = self.cache.borrow_mut();
            debug!(entries = cache.len(), "filters changed, dropping cached pages");
            cache.clear();
        }
        changed
    }

    pub async fn load_page(&self, state: &FilterState, page: u32) -> PageOutcome {
        let page = page.max(1);
        let fingerprint = state.fingerprint(page);

        if let Some(key) = fingerprint.as_ref() {
            let cached = self.cache.borrow_mut().get(key);
            if let Some(cached) = cached {
                debug!(page, rows = cached.rows.len(), "page served from cache");
                return if cached.rows.is_empty() {
                    PageOutcome::Empty
                } else {
                    PageOutcome::Rows {
                        rows: cached.rows,
                        total_count: cached.total_count,
                        from_cache: true,
                    }
                };
            }
        }

        let query = build_query(state, page);
        debug!(
            page,
            constraints = query.filters.len(),
            from = query.window.offset,
            to = query.window.last(),
            "fetching activity page"
        );

        match self.backend.fetch_page(&query).await {
            Ok(mut result) => {
                normalize_rows(&mut result.rows);
                if let Some(key) = fingerprint {
                    self.cache
                        .borrow_mut()
                        .set(key, result.rows.clone(), result.total_count);
                }
                if result.rows.is_empty() {
                    PageOutcome::Empty
                } else {
                    PageOutcome::Rows {
                        rows: result.rows,
                        total_count: result.total_count,
                        from_cache: false,
                    }
                }
            }
            Err(err) => {
                error!(?err, status = ?err.status(), page, "activity fetch failed");
                PageOutcome::Failed(err.to_string())
            }
        }
    }

    /// Filter list values; a failing column yields an empty list.
    pub async fn load_facets(&self) -> Facets {
        Facets {
            groups: self.distinct(Column::Group).await,
            categories: self.distinct(Column::Category).await,
            third_parties: self.distinct(Column::ThirdParty).await,
        }
    }

    async fn distinct(&self, column: Column) -> Vec<String> {
        match self.backend.distinct_values(column).await {
            Ok(values) => values
                .into_iter()
                .filter(|value| !crate::normalize::is_not_applicable(value))
                .collect(),
            Err(err) => {
                warn!("failed to load {} values: {err}", column.db_name());
                Vec::new()
            }
        }
    }

    #[cfg(test)]
    fn cached(&self, state: &FilterState, page: u32) -> Option<crate::cache::CachedPage> {
        let key = state.fingerprint(page)?;
        self.cache.borrow_mut().get(&key)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;
    use reqwest::StatusCode;

    use super::*;
    use crate::api::{ApiErrorBody, ClientError, ClientResult, MemoryBackend};
    use crate::cache::ManualClock;
    use crate::models::ActivityPage;
    use crate::query::ActivityQuery;

    /// Counts calls and delegates to the in-memory backend.
    struct CountingBackend {
        inner: MemoryBackend,
        calls: Cell<usize>,
    }

    impl ActivityBackend for CountingBackend {
        async fn fetch_page(&self, query: &ActivityQuery) -> ClientResult<ActivityPage> {
            self.calls.set(self.calls.get() + 1);
            self.inner.fetch_page(query).await
        }

        async fn distinct_values(&self, column: Column) -> ClientResult<Vec<String>> {
            self.inner.distinct_values(column).await
        }
    }

    struct FailingBackend;

    impl ActivityBackend for FailingBackend {
        async fn fetch_page(&self, _query: &ActivityQuery) -> ClientResult<ActivityPage> {
            Err(ClientError::Api(ApiErrorBody {
                code: Some("PGRST100".into()),
                message: "failed to parse filter".into(),
                details: None,
                hint: None,
                status: Some(StatusCode::BAD_REQUEST),
            }))
        }

        async fn distinct_values(&self, _column: Column) -> ClientResult<Vec<String>> {
            Err(ClientError::MissingEndpoint)
        }
    }

    fn counting() -> CountingBackend {
        CountingBackend {
            inner: MemoryBackend::with_fixtures(),
            calls: Cell::new(0),
        }
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let service = ActivityService::new(counting(), ManualClock::new());
        let state = FilterState::default();

        let first = block_on(service.load_page(&state, 1));
        let second = block_on(service.load_page(&state, 1));

        assert!(matches!(first, PageOutcome::Rows { from_cache: false, .. }));
        assert!(matches!(second, PageOutcome::Rows { from_cache: true, .. }));
        assert_eq!(service.backend.calls.get(), 1);
    }

    #[test]
    fn expired_entry_triggers_a_new_fetch() {
        let clock = ManualClock::new();
        let service = ActivityService::new(counting(), clock.clone());
        let state = FilterState::default();

        block_on(service.load_page(&state, 1));
        clock.advance(time::Duration::minutes(6));
        block_on(service.load_page(&state, 1));
        assert_eq!(service.backend.calls.get(), 2);
    }

    #[test]
    fn rows_are_normalized_before_caching() {
        let service = ActivityService::new(counting(), ManualClock::new());
        let mut state = FilterState::default();
        state.toggle_code("1012002");

        let PageOutcome::Rows { rows, .. } = block_on(service.load_page(&state, 1)) else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].third_party, "");
        assert_eq!(rows[0].notes, "");
        let cached = service.cached(&state, 1).unwrap();
        assert_eq!(cached.rows, rows);
    }

    #[test]
    fn zero_rows_is_empty_not_an_error() {
        let service = ActivityService::new(counting(), ManualClock::new());
        let mut state = FilterState::default();
        state.set_search("no such activity");
        assert_eq!(block_on(service.load_page(&state, 1)), PageOutcome::Empty);
    }

    #[test]
    fn backend_error_leaves_cache_unpopulated() {
        let service = ActivityService::new(FailingBackend, ManualClock::new());
        let state = FilterState::default();

        let outcome = block_on(service.load_page(&state, 1));
        assert!(matches!(outcome, PageOutcome::Failed(ref message) if message.contains("PGRST100")));
        assert!(service.cached(&state, 1).is_none());
    }

    #[test]
    fn changed_filters_drop_cached_pages() {
        let service = ActivityService::new(counting(), ManualClock::new());
        let mut state = FilterState::default();
        block_on(service.load_page(&state, 1));
        let before = state.clone();

        assert!(service.apply_filter_change(&mut state, |filters| filters.select_group("3011")));
        assert!(service.cached(&before, 1).is_none());
        assert_eq!(service.cache.borrow().len(), 0);
    }

    #[test]
    fn unchanged_filters_keep_cached_pages() {
        let service = ActivityService::new(counting(), ManualClock::new());
        let mut state = FilterState::default();
        state.select_group("3011");
        block_on(service.load_page(&state, 1));

        assert!(!service.apply_filter_change(&mut state, |filters| filters.select_group("3011")));
        assert!(service.cached(&state, 1).is_some());
        block_on(service.load_page(&state, 1));
        assert_eq!(service.backend.calls.get(), 1);
    }

    #[test]
    fn facets_come_from_distinct_values() {
        let service = ActivityService::new(counting(), ManualClock::new());
        let facets = block_on(service.load_facets());
        assert!(facets.categories.contains(&"Retail".to_string()));
        assert!(facets.third_parties.contains(&"Municipality".to_string()));
        assert!(!facets.third_parties.iter().any(|value| value == "N/A"));
        assert!(facets.groups.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn failing_facets_degrade_to_empty_lists() {
        let service = ActivityService::new(FailingBackend, ManualClock::new());
        assert_eq!(block_on(service.load_facets()), Facets::default());
    }
}
