use dioxus::prelude::*;

use crate::models::{Activity, Column};
use crate::state::{use_app_state, use_table_actions};
use crate::view::{
    CardItem, ColumnVisibility, LoaderPlacement, RenderItem, RenderMode, TableRow,
    NO_RESULTS_MESSAGE, TABLE_COLUMNS,
};

/// Results as table rows or cards, depending on viewport width.
#[component]
pub fn ActivityTable() -> Element {
    let state = use_app_state();
    let snapshot = state.read();
    let mode = snapshot.render_mode();
    let columns = snapshot.columns.clone();
    let items = snapshot.results.items(mode, &columns);
    let rows = snapshot.results.rows.clone();
    let saved: Vec<bool> = rows
        .iter()
        .map(|row| snapshot.is_saved(&row.code))
        .collect();
    let ascending = snapshot.filters.sort_ascending;
    drop(snapshot);

    // Row and card items come first, in row order.
    let entries: Vec<(RenderItem, Option<Activity>, bool)> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let activity = item.code().and(rows.get(index).cloned());
            let is_saved = saved.get(index).copied().unwrap_or(false);
            (item, activity, is_saved)
        })
        .collect();

    match mode {
        RenderMode::Table => {
            let visible = columns.visible();
            let column_count = visible.len() + 1;
            rsx! {
                div { class: "space-y-2",
                    div { class: "flex justify-end",
                        ColumnToggle { columns }
                    }
                    div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white shadow-sm",
                        table { class: "min-w-full divide-y divide-slate-200 text-sm",
                            thead { class: "bg-slate-50",
                                tr {
                                    for column in visible {
                                        HeaderCell { key: "{column.db_name()}", column, ascending }
                                    }
                                    th { class: "px-3 py-2 text-left text-xs font-semibold text-slate-500", "" }
                                }
                            }
                            tbody { class: "divide-y divide-slate-100",
                                for (index, (item, activity, is_saved)) in entries.into_iter().enumerate() {
                                    TableItem { key: "{index}", item, activity, saved: is_saved, column_count }
                                }
                            }
                        }
                    }
                }
            }
        }
        RenderMode::Cards => rsx! {
            div { class: "grid gap-3",
                for (index, (item, activity, is_saved)) in entries.into_iter().enumerate() {
                    CardEntry { key: "{index}", item, activity, saved: is_saved }
                }
            }
        },
    }
}

/// Dropdown of table columns with a checkbox each.
#[component]
fn ColumnToggle(columns: ColumnVisibility) -> Element {
    let actions = use_table_actions();
    let show_all = actions.clone();
    let mut open = use_signal(|| false);

    rsx! {
        div { class: "relative",
            button {
                class: "rounded border border-slate-300 bg-white px-3 py-1 text-xs text-slate-600 hover:bg-slate-100",
                aria_expanded: "{open}",
                onclick: move |_| open.set(!open()),
                "Columns"
            }
            if open() {
                div { class: "absolute right-0 z-20 mt-1 w-52 space-y-1 rounded-lg border border-slate-200 bg-white p-3 shadow-lg",
                    for column in TABLE_COLUMNS {
                        label { key: "{column.db_name()}", class: "flex items-center gap-2 text-xs text-slate-600",
                            input {
                                r#type: "checkbox",
                                checked: columns.is_visible(column),
                                onchange: {
                                    let actions = actions.clone();
                                    move |_| actions.toggle_column(column)
                                },
                            }
                            "{column.label()}"
                        }
                    }
                    button {
                        class: "pt-1 text-[11px] text-slate-500 hover:text-slate-800",
                        onclick: move |_| show_all.show_all_columns(),
                        "Show all"
                    }
                }
            }
        }
    }
}

#[component]
fn HeaderCell(column: Column, ascending: bool) -> Element {
    let actions = use_table_actions();
    let current = use_app_state()
        .read()
        .filters
        .column_search
        .get(&column)
        .map(|search| search.display_value().to_string())
        .unwrap_or_default();

    let sort_actions = actions.clone();
    let arrow = if ascending { "▲" } else { "▼" };

    rsx! {
        th { class: "px-3 py-2 text-left align-top text-xs font-semibold text-slate-600",
            div { class: "flex items-center gap-1",
                span { "{column.label()}" }
                if column == Column::Code {
                    button {
                        class: "text-[10px] text-slate-400 hover:text-slate-700",
                        title: "Toggle sort order",
                        onclick: move |_| sort_actions.toggle_sort(),
                        "{arrow}"
                    }
                }
            }
            input {
                class: "mt-1 w-full rounded border border-slate-200 px-2 py-1 text-xs font-normal",
                r#type: "search",
                placeholder: "Filter",
                value: "{current}",
                onchange: move |evt| actions.set_column_search(column, &evt.value()),
            }
        }
    }
}

#[component]
fn TableItem(item: RenderItem, activity: Option<Activity>, saved: bool, column_count: usize) -> Element {
    let actions = use_table_actions();

    match (item, activity) {
        (RenderItem::TableRow(TableRow { cells, .. }), Some(activity)) => {
            let selected = activity.clone();
            rsx! {
                tr {
                    class: "cursor-pointer hover:bg-slate-50",
                    onclick: move |_| actions.select(Some(selected.clone())),
                    for (column, value) in cells {
                        td { key: "{column.db_name()}", class: "px-3 py-2 text-slate-700", "{value}" }
                    }
                    td { class: "px-3 py-2",
                        RowActions { activity, saved }
                    }
                }
            }
        }
        (RenderItem::Loader(placement), _) => rsx! {
            tr {
                td { colspan: "{column_count}", class: "px-3 py-6",
                    Loader { placement }
                }
            }
        },
        (RenderItem::NoResults, _) => rsx! {
            tr {
                td { colspan: "{column_count}", class: "px-3 py-6 text-center text-slate-500",
                    "{NO_RESULTS_MESSAGE}"
                }
            }
        },
        (RenderItem::Error(message), _) => rsx! {
            tr {
                td { colspan: "{column_count}", class: "px-3 py-6 text-center text-red-600",
                    "{message}"
                }
            }
        },
        _ => rsx! { Fragment {} },
    }
}

#[component]
fn CardEntry(item: RenderItem, activity: Option<Activity>, saved: bool) -> Element {
    let actions = use_table_actions();

    match (item, activity) {
        (RenderItem::Card(CardItem { code, title, fields }), Some(activity)) => {
            let selected = activity.clone();
            rsx! {
                article {
                    class: "cursor-pointer rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
                    onclick: move |_| actions.select(Some(selected.clone())),
                    header { class: "flex items-start justify-between gap-2",
                        div {
                            p { class: "font-mono text-xs text-slate-500", "{code}" }
                            h3 { class: "text-sm font-semibold text-slate-900", "{title}" }
                        }
                        RowActions { activity, saved }
                    }
                    dl { class: "mt-3 grid grid-cols-2 gap-2 text-xs",
                        for (column, value) in fields {
                            div { key: "{column.db_name()}",
                                dt { class: "text-slate-400", "{column.label()}" }
                                dd { class: "text-slate-700", "{value}" }
                            }
                        }
                    }
                }
            }
        }
        (RenderItem::Loader(placement), _) => rsx! { Loader { placement } },
        (RenderItem::NoResults, _) => rsx! {
            p { class: "rounded-lg bg-white p-6 text-center text-sm text-slate-500", "{NO_RESULTS_MESSAGE}" }
        },
        (RenderItem::Error(message), _) => rsx! {
            p { class: "rounded-lg bg-white p-6 text-center text-sm text-red-600", "{message}" }
        },
        _ => rsx! { Fragment {} },
    }
}

/// Copy and bookmark buttons; clicks never reach the row.
#[component]
fn RowActions(activity: Activity, saved: bool) -> Element {
    let actions = use_table_actions();
    let copy_actions = actions.clone();
    let name = activity.name.clone();
    let label = if saved { "Saved" } else { "Save" };
    let bookmark_class = if saved {
        "rounded bg-emerald-600 px-2 py-1 text-[11px] text-white"
    } else {
        "rounded border border-slate-300 px-2 py-1 text-[11px] text-slate-600 hover:bg-slate-100"
    };

    rsx! {
        div { class: "flex gap-1",
            button {
                class: "rounded border border-slate-300 px-2 py-1 text-[11px] text-slate-600 hover:bg-slate-100",
                title: "Copy activity name",
                onclick: move |evt| {
                    evt.stop_propagation();
                    copy_actions.copy_name(name.clone());
                },
                "Copy"
            }
            button {
                class: bookmark_class,
                onclick: move |evt| {
                    evt.stop_propagation();
                    actions.toggle_bookmark(&activity);
                },
                "{label}"
            }
        }
    }
}

#[component]
fn Loader(placement: LoaderPlacement) -> Element {
    let class = match placement {
        LoaderPlacement::Full => "flex justify-center py-12",
        LoaderPlacement::Trailing => "flex justify-center py-4",
    };
    rsx! {
        div { class,
            div { class: "h-6 w-6 animate-spin rounded-full border-2 border-slate-300 border-t-slate-700" }
        }
    }
}
