use std::rc::Rc;

use dioxus::prelude::*;
use tracing::{debug, info};

use crate::api::Backend;
use crate::bookmarks::{Bookmark, BookmarkStore, LocalStorageBackend};
use crate::cache::SystemClock;
use crate::filters::FilterState;
use crate::models::{Activity, ApprovalStage, Column, RiskRating};
use crate::query::fragment::parse_fragments;
use crate::service::{ActivityService, Facets};
use crate::view::{ColumnVisibility, RenderMode, ResultsView, CARD_BREAKPOINT_PX};

pub type AppSignal = Signal<AppState>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationState {
    pub last_message: Option<String>,
    pub error: Option<String>,
    pub context: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub filters: FilterState,
    pub results: ResultsView,
    pub columns: ColumnVisibility,
    pub bookmarks: Vec<Bookmark>,
    pub facets: Facets,
    pub viewport_width: f64,
    pub selected: Option<Activity>,
    pub operation: OperationState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            results: ResultsView::default(),
            columns: ColumnVisibility::default(),
            bookmarks: Vec::new(),
            facets: Facets::default(),
            viewport_width: CARD_BREAKPOINT_PX,
            selected: None,
            operation: OperationState::default(),
        }
    }
}

impl AppState {
    pub fn render_mode(&self) -> RenderMode {
        RenderMode::for_width(self.viewport_width)
    }

    pub fn is_saved(&self, code: &str) -> bool {
        self.bookmarks.iter().any(|bookmark| bookmark.code == code)
    }
}

/// Long-lived services shared through context.
#[derive(Clone)]
pub struct Services {
    pub activities: Rc<ActivityService<Backend, SystemClock>>,
    pub bookmarks: Rc<BookmarkStore<LocalStorageBackend>>,
}

impl Services {
    pub fn new(backend: Backend) -> Self {
        info!(backend = backend.label(), "activity service ready");
        Self {
            activities: Rc::new(ActivityService::new(backend, SystemClock)),
            bookmarks: Rc::new(BookmarkStore::new(LocalStorageBackend)),
        }
    }
}

#[derive(Clone)]
pub struct TableActions {
    state: AppSignal,
    services: Services,
}

impl TableActions {
    /// Loads `page` and applies it to the results view, replacing or
    /// appending rows. Only the most recent call's result is applied.
    pub fn render_page(&self, page: u32, append: bool) {
        let mut state = self.state;
        let filters = state.read().filters.clone();
        let ticket = state.write().results.begin(page, append);
        let service = Rc::clone(&self.services.activities);

        spawn(async move {
            let outcome = service.load_page(&filters, ticket.page).await;
            if !state.write().results.finish(&ticket, outcome) {
                debug!(page = ticket.page, "discarded stale page result");
            }
        });
    }

    /// Next page for infinite scroll; no-op while loading or when done.
    pub fn load_more(&self) {
        let (busy, more, page) = {
            let state = self.state.read();
            (
                state.results.is_loading(),
                state.results.has_more(),
                state.results.page,
            )
        };
        if busy || !more {
            return;
        }
        self.render_page(page + 1, true);
    }

    /// Runs `mutate` through the service and reloads from page one when the
    /// filters changed.
    fn update_filters(&self, mutate: impl FnOnce(&mut FilterState) -> bool) -> bool {
        let mut state = self.state;
        let changed = self
            .services
            .activities
            .apply_filter_change(&mut state.write().filters, mutate);
        if changed {
            self.render_page(1, false);
        }
        changed
    }

    pub fn set_search(&self, term: &str) {
        self.update_filters(|filters| filters.set_search(term));
    }

    pub fn select_category(&self, category: &str) {
        self.update_filters(|filters| filters.select_category(category));
    }

    pub fn select_group(&self, group: &str) {
        self.update_filters(|filters| filters.select_group(group));
    }

    pub fn toggle_group(&self, group: &str) {
        self.update_filters(|filters| filters.toggle_group(group));
    }

    pub fn toggle_category(&self, category: &str) {
        self.update_filters(|filters| filters.toggle_category(category));
    }

    pub fn add_code(&self, code: &str) {
        self.update_filters(|filters| filters.add_code(code));
    }

    pub fn toggle_code(&self, code: &str) {
        self.update_filters(|filters| filters.toggle_code(code));
    }

    pub fn toggle_third_party(&self, name: &str) {
        self.update_filters(|filters| filters.toggle_third_party(name));
    }

    pub fn clear_third_parties(&self) {
        self.update_filters(FilterState::clear_third_parties);
    }

    pub fn toggle_approval_stage(&self, stage: ApprovalStage) {
        self.update_filters(|filters| filters.toggle_approval_stage(stage));
    }

    pub fn toggle_risk_rating(&self, rating: RiskRating) {
        self.update_filters(|filters| filters.toggle_risk_rating(rating));
    }

    pub fn set_fast_track(&self, enabled: bool) {
        self.update_filters(|filters| filters.set_fast_track(enabled));
    }

    pub fn set_third_party_only(&self, enabled: bool) {
        self.update_filters(|filters| filters.set_third_party_only(enabled));
    }

    pub fn set_column_search(&self, column: Column, term: &str) {
        self.update_filters(|filters| filters.set_column_search(column, term));
    }

    pub fn toggle_sort(&self) {
        self.update_filters(FilterState::toggle_sort);
    }

    pub fn reset_filters(&self) {
        self.update_filters(FilterState::reset);
    }

    /// Applies shared column filters such as `Group.eq.3011,Notes.ilike.%25fee%25`.
    pub fn apply_fragments(&self, raw: &str) -> bool {
        let fragments = parse_fragments(raw);
        info!(count = fragments.len(), "applying column filters from link");
        self.update_filters(|filters| {
            fragments
                .into_iter()
                .fold(false, |changed, (column, search)| {
                    filters.put_column_search(column, search) || changed
                })
        })
    }

    /// First load: shared filters when present, otherwise page one.
    pub fn bootstrap(&self, shared_filters: Option<String>) {
        self.load_bookmarks();
        self.load_facets();

        let applied = shared_filters
            .filter(|raw| !raw.trim().is_empty())
            .is_some_and(|raw| self.apply_fragments(&raw));
        if !applied {
            self.render_page(1, false);
        }
    }

    pub fn load_facets(&self) {
        let mut state = self.state;
        let service = Rc::clone(&self.services.activities);
        spawn(async move {
            let facets = service.load_facets().await;
            state.write().facets = facets;
        });
    }

    /// Shows or hides a table column. Rows already loaded are redrawn, not
    /// refetched.
    pub fn toggle_column(&self, column: Column) {
        let mut state = self.state;
        if !state.write().columns.toggle(column) {
            debug!(column = column.db_name(), "kept the last visible column");
        }
    }

    pub fn show_all_columns(&self) {
        let mut state = self.state;
        state.write().columns = ColumnVisibility::all();
    }

    pub fn set_viewport_width(&self, width: f64) {
        let mut state = self.state;
        if state.read().viewport_width != width {
            state.write().viewport_width = width;
        }
    }

    pub fn select(&self, activity: Option<Activity>) {
        let mut state = self.state;
        state.write().selected = activity;
    }

    pub fn load_bookmarks(&self) {
        let mut state = self.state;
        state.write().bookmarks = self.services.bookmarks.load();
    }

    pub fn toggle_bookmark(&self, activity: &Activity) {
        let (bookmarks, saved) = self.services.bookmarks.toggle(activity);
        let mut state = self.state;
        state.write().bookmarks = bookmarks;
        let message = if saved {
            format!("{} saved", activity.code)
        } else {
            format!("{} removed", activity.code)
        };
        self.set_operation_success(message);
    }

    pub fn remove_bookmark(&self, code: &str) {
        let bookmarks = self.services.bookmarks.remove(code);
        let mut state = self.state;
        state.write().bookmarks = bookmarks;
    }

    pub fn copy_name(&self, name: String) {
        crate::ui::clipboard::copy_text(self.clone(), name);
    }

    pub fn set_operation_success(&self, message: String) {
        let mut state = self.state;
        let mut state = state.write();
        state.operation.last_message = Some(message);
        state.operation.error = None;
        state.operation.context = None;
    }

    pub fn set_operation_error(&self, context: impl Into<String>, message: String) {
        let mut state = self.state;
        let mut state = state.write();
        state.operation.error = Some(message);
        state.operation.last_message = None;
        state.operation.context = Some(context.into());
    }

    pub fn clear_operation_status(&self) {
        let mut state = self.state;
        state.write().operation = OperationState::default();
    }
}

pub fn use_app_state() -> AppSignal {
    use_context::<AppSignal>()
}

pub fn use_table_actions() -> TableActions {
    TableActions {
        state: use_app_state(),
        services: use_context::<Services>(),
    }
}
