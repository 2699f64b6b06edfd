//! Results view model: loader placement, request fencing and the choice
//! between table rows and cards.

use std::collections::BTreeSet;

use crate::models::{Activity, Column};
use crate::normalize::display_cell;
use crate::service::PageOutcome;

/// Viewports narrower than this render cards.
pub const CARD_BREAKPOINT_PX: f64 = 768.0;

pub const ERROR_MESSAGE: &str = "Error loading data. Please try again later.";
pub const NO_RESULTS_MESSAGE: &str = "No activities found matching your criteria.";

pub const TABLE_COLUMNS: [Column; 9] = [
    Column::Code,
    Column::Group,
    Column::Category,
    Column::Name,
    Column::ThirdParty,
    Column::When,
    Column::Notes,
    Column::RiskRating,
    Column::Flag,
];

/// Table columns hidden until the user switches them on.
pub const DEFAULT_HIDDEN_COLUMNS: [Column; 4] =
    [Column::When, Column::Notes, Column::RiskRating, Column::Flag];

/// Card body fields; code and name are the card header.
pub const CARD_COLUMNS: [Column; 4] = [
    Column::Category,
    Column::Group,
    Column::ThirdParty,
    Column::RiskRating,
];

/// Which table columns are drawn. Cards always show their fixed fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: BTreeSet<Column>,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            hidden: DEFAULT_HIDDEN_COLUMNS.into_iter().collect(),
        }
    }
}

impl ColumnVisibility {
    pub fn all() -> Self {
        Self {
            hidden: BTreeSet::new(),
        }
    }

    pub fn is_visible(&self, column: Column) -> bool {
        !self.hidden.contains(&column)
    }

    /// Visible columns in table order.
    pub fn visible(&self) -> Vec<Column> {
        TABLE_COLUMNS
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }

    /// Flips `column`. The last visible column cannot be hidden.
    pub fn toggle(&mut self, column: Column) -> bool {
        if self.hidden.remove(&column) {
            return true;
        }
        if self.visible() == [column] {
            return false;
        }
        self.hidden.insert(column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Table,
    Cards,
}

impl RenderMode {
    pub fn for_width(width: f64) -> Self {
        if width < CARD_BREAKPOINT_PX {
            Self::Cards
        } else {
            Self::Table
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderPlacement {
    /// Replaces the whole body while page one loads.
    Full,
    /// Trails existing rows while the next page loads.
    Trailing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderPhase {
    #[default]
    Idle,
    Loading,
    Rows,
    Empty,
    Error,
}

/// Identifies one `render_page` cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    pub page: u32,
    pub append: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub code: String,
    pub cells: Vec<(Column, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardItem {
    pub code: String,
    pub title: String,
    pub fields: Vec<(Column, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderItem {
    TableRow(TableRow),
    Card(CardItem),
    NoResults,
    Error(String),
    Loader(LoaderPlacement),
}

impl RenderItem {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::TableRow(row) => Some(&row.code),
            Self::Card(card) => Some(&card.code),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResultsView {
    pub rows: Vec<Activity>,
    pub total_count: u64,
    pub page: u32,
    pub phase: RenderPhase,
    pub loader: Option<LoaderPlacement>,
    pub error: Option<String>,
    latest_seq: u64,
}

impl ResultsView {
    /// Enters the loading state and issues the ticket for this cycle.
    ///
    /// Every earlier ticket becomes stale.
    pub fn begin(&mut self, page: u32, append: bool) -> FetchTicket {
        self.latest_seq += 1;
        self.phase = RenderPhase::Loading;
        self.error = None;
        if append {
            self.loader = Some(LoaderPlacement::Trailing);
        } else {
            self.rows.clear();
            self.total_count = 0;
            self.loader = Some(LoaderPlacement::Full);
        }
        FetchTicket {
            seq: self.latest_seq,
            page,
            append,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.latest_seq
    }

    /// Applies a finished load. Returns `false` and changes nothing when a
    /// newer cycle has started since `ticket` was issued.
    pub fn finish(&mut self, ticket: &FetchTicket, outcome: PageOutcome) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.loader = None;

        match outcome {
            PageOutcome::Rows {
                rows, total_count, ..
            } => {
                if ticket.append {
                    self.rows.extend(rows);
                } else {
                    self.rows = rows;
                }
                self.total_count = total_count.max(self.rows.len() as u64);
                self.page = ticket.page;
                self.phase = RenderPhase::Rows;
            }
            PageOutcome::Empty => {
                if ticket.append && !self.rows.is_empty() {
                    self.total_count = self.rows.len() as u64;
                    self.phase = RenderPhase::Rows;
                } else {
                    self.rows.clear();
                    self.total_count = 0;
                    self.phase = RenderPhase::Empty;
                }
                self.page = ticket.page;
            }
            PageOutcome::Failed(detail) => {
                tracing::warn!(page = ticket.page, append = ticket.append, "showing load error: {detail}");
                if !ticket.append {
                    self.rows.clear();
                    self.total_count = 0;
                }
                self.error = Some(ERROR_MESSAGE.to_string());
                self.phase = RenderPhase::Error;
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RenderPhase::Loading
    }

    pub fn has_more(&self) -> bool {
        self.phase == RenderPhase::Rows && (self.rows.len() as u64) < self.total_count
    }

    /// Everything the current mode draws, in order.
    pub fn items(&self, mode: RenderMode, columns: &ColumnVisibility) -> Vec<RenderItem> {
        if self.loader == Some(LoaderPlacement::Full) {
            return vec![RenderItem::Loader(LoaderPlacement::Full)];
        }

        let mut items: Vec<RenderItem> = self
            .rows
            .iter()
            .map(|row| match mode {
                RenderMode::Table => RenderItem::TableRow(table_row(row, columns)),
                RenderMode::Cards => RenderItem::Card(card_item(row)),
            })
            .collect();

        match self.phase {
            RenderPhase::Empty => items.push(RenderItem::NoResults),
            RenderPhase::Error => items.push(RenderItem::Error(
                self.error.clone().unwrap_or_else(|| ERROR_MESSAGE.to_string()),
            )),
            _ => {}
        }

        if let Some(loader) = self.loader {
            items.push(RenderItem::Loader(loader));
        }
        items
    }
}

fn table_row(activity: &Activity, columns: &ColumnVisibility) -> TableRow {
    TableRow {
        code: activity.code.clone(),
        cells: columns
            .visible()
            .into_iter()
            .map(|column| (column, display_cell(column, activity.field(column))))
            .collect(),
    }
}

fn card_item(activity: &Activity) -> CardItem {
    CardItem {
        code: activity.code.clone(),
        title: activity.name.clone(),
        fields: CARD_COLUMNS
            .into_iter()
            .map(|column| (column, display_cell(column, activity.field(column))))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::activities::sample_activities;

    fn page_of(count: usize) -> PageOutcome {
        PageOutcome::Rows {
            rows: sample_activities().into_iter().take(count).collect(),
            total_count: 32,
            from_cache: false,
        }
    }

    fn codes(items: &[RenderItem]) -> Vec<&str> {
        items.iter().filter_map(RenderItem::code).collect()
    }

    #[test]
    fn breakpoint_selects_mode() {
        assert_eq!(RenderMode::for_width(375.0), RenderMode::Cards);
        assert_eq!(RenderMode::for_width(767.9), RenderMode::Cards);
        assert_eq!(RenderMode::for_width(768.0), RenderMode::Table);
        assert_eq!(RenderMode::for_width(1440.0), RenderMode::Table);
    }

    #[test]
    fn cards_and_rows_carry_the_same_codes_in_order() {
        let mut view = ResultsView::default();
        let ticket = view.begin(1, false);
        assert!(view.finish(&ticket, page_of(20)));

        let table = view.items(RenderMode::for_width(1280.0), &ColumnVisibility::default());
        let cards = view.items(RenderMode::for_width(390.0), &ColumnVisibility::default());
        assert_eq!(table.len(), 20);
        assert!(table.iter().all(|item| matches!(item, RenderItem::TableRow(_))));
        assert!(cards.iter().all(|item| matches!(item, RenderItem::Card(_))));
        assert_eq!(codes(&table), codes(&cards));
    }

    #[test]
    fn table_rows_follow_fixed_column_order() {
        let mut view = ResultsView::default();
        let ticket = view.begin(1, false);
        view.finish(&ticket, page_of(1));
        let RenderItem::TableRow(row) = &view.items(RenderMode::Table, &ColumnVisibility::all())[0] else {
            panic!("expected a table row");
        };
        let columns: Vec<Column> = row.cells.iter().map(|(column, _)| *column).collect();
        assert_eq!(columns, TABLE_COLUMNS.to_vec());
        assert_eq!(row.cells[4].1, "N/A");
    }

    #[test]
    fn hidden_columns_are_left_out_of_every_row() {
        let mut view = ResultsView::default();
        let ticket = view.begin(1, false);
        view.finish(&ticket, page_of(20));

        let mut columns = ColumnVisibility::all();
        assert!(columns.toggle(Column::ThirdParty));
        assert!(!columns.is_visible(Column::ThirdParty));

        let items = view.items(RenderMode::Table, &columns);
        assert_eq!(items.len(), 20);
        for item in &items {
            let RenderItem::TableRow(row) = item else {
                panic!("expected a table row");
            };
            assert_eq!(row.cells.len(), TABLE_COLUMNS.len() - 1);
            assert!(row.cells.iter().all(|(column, _)| *column != Column::ThirdParty));
        }
    }

    #[test]
    fn default_visibility_shows_identifying_columns() {
        let mut columns = ColumnVisibility::default();
        assert_eq!(
            columns.visible(),
            vec![
                Column::Code,
                Column::Group,
                Column::Category,
                Column::Name,
                Column::ThirdParty,
            ]
        );
        assert!(columns.toggle(Column::Notes));
        assert!(columns.is_visible(Column::Notes));
    }

    #[test]
    fn last_visible_column_stays_visible() {
        let mut columns = ColumnVisibility::all();
        for column in TABLE_COLUMNS.into_iter().skip(1) {
            assert!(columns.toggle(column));
        }
        assert!(!columns.toggle(Column::Code));
        assert_eq!(columns.visible(), vec![Column::Code]);
    }

    #[test]
    fn replace_shows_full_loader_then_rows() {
        let mut view = ResultsView::default();
        let ticket = view.begin(1, false);
        view.finish(&ticket, page_of(20));

        let ticket = view.begin(1, false);
        assert!(view.rows.is_empty());
        assert_eq!(
            view.items(RenderMode::Table, &ColumnVisibility::default()),
            vec![RenderItem::Loader(LoaderPlacement::Full)]
        );
        view.finish(&ticket, page_of(3));
        assert_eq!(view.loader, None);
        assert_eq!(view.rows.len(), 3);
    }

    #[test]
    fn append_keeps_rows_and_trails_the_loader() {
        let mut view = ResultsView::default();
        let first = view.begin(1, false);
        view.finish(&first, page_of(20));
        assert!(view.has_more());

        let next = view.begin(2, true);
        let items = view.items(RenderMode::Table, &ColumnVisibility::default());
        assert_eq!(items.len(), 21);
        assert_eq!(items.last(), Some(&RenderItem::Loader(LoaderPlacement::Trailing)));

        view.finish(
            &next,
            PageOutcome::Rows {
                rows: sample_activities().into_iter().skip(20).collect(),
                total_count: 32,
                from_cache: false,
            },
        );
        assert_eq!(view.rows.len(), 32);
        assert_eq!(view.page, 2);
        assert!(!view.has_more());
    }

    #[test]
    fn empty_result_is_a_single_placeholder() {
        let mut view = ResultsView::default();
        let ticket = view.begin(1, false);
        view.finish(&ticket, PageOutcome::Empty);
        assert_eq!(view.phase, RenderPhase::Empty);
        assert_eq!(view.items(RenderMode::Cards, &ColumnVisibility::default()), vec![RenderItem::NoResults]);
    }

    #[test]
    fn error_removes_loader_and_shows_placeholder() {
        let mut view = ResultsView::default();
        let ticket = view.begin(1, false);
        view.finish(&ticket, PageOutcome::Failed("timeout".into()));
        assert_eq!(view.loader, None);
        assert_eq!(
            view.items(RenderMode::Table, &ColumnVisibility::default()),
            vec![RenderItem::Error(ERROR_MESSAGE.to_string())]
        );
    }

    #[test]
    fn append_error_keeps_existing_rows() {
        let mut view = ResultsView::default();
        let first = view.begin(1, false);
        view.finish(&first, page_of(20));
        let next = view.begin(2, true);
        view.finish(&next, PageOutcome::Failed("offline".into()));

        let items = view.items(RenderMode::Table, &ColumnVisibility::default());
        assert_eq!(items.len(), 21);
        assert!(matches!(items.last(), Some(RenderItem::Error(_))));
        assert!(!view.has_more());
    }

    #[test]
    fn stale_tickets_are_discarded() {
        let mut view = ResultsView::default();
        let stale = view.begin(1, false);
        let latest = view.begin(1, false);

        assert!(!view.finish(&stale, page_of(5)));
        assert!(view.is_loading());
        assert!(view.rows.is_empty());

        assert!(view.finish(&latest, PageOutcome::Empty));
        assert_eq!(view.phase, RenderPhase::Empty);
    }
}
