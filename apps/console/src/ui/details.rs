use dioxus::prelude::*;

use crate::models::Column;
use crate::normalize::NOT_APPLICABLE;
use crate::state::{use_app_state, use_table_actions};

/// Every field of the selected activity.
#[component]
pub fn ActivityDetails() -> Element {
    let actions = use_table_actions();
    let state = use_app_state();
    let Some(activity) = state.read().selected.clone() else {
        return rsx! { Fragment {} };
    };

    let fields: Vec<(Column, String)> = Column::ALL
        .into_iter()
        .map(|column| {
            let value = activity.field(column);
            let value = if value.is_empty() {
                NOT_APPLICABLE.to_string()
            } else {
                value.to_string()
            };
            (column, value)
        })
        .collect();

    let close_actions = actions.clone();
    let saved = state.read().is_saved(&activity.code);
    let label = if saved { "Remove from saved" } else { "Save" };

    rsx! {
        div {
            class: "fixed inset-0 z-40 flex items-center justify-center bg-slate-900/40 p-4",
            onclick: move |_| close_actions.select(None),
            div {
                class: "max-h-full w-full max-w-lg overflow-y-auto rounded-lg bg-white p-6 shadow-xl",
                onclick: move |evt| evt.stop_propagation(),
                h2 { class: "text-lg font-semibold text-slate-900", "{activity.name}" }
                dl { class: "mt-4 grid grid-cols-3 gap-x-3 gap-y-2 text-sm",
                    for (column, value) in fields {
                        dt { key: "{column.db_name()}-label", class: "col-span-1 text-slate-400", "{column.label()}" }
                        dd { key: "{column.db_name()}-value", class: "col-span-2 text-slate-800", "{value}" }
                    }
                }
                div { class: "mt-6 flex justify-end gap-2",
                    button {
                        class: "rounded border border-slate-300 px-3 py-1 text-xs text-slate-600 hover:bg-slate-100",
                        onclick: {
                            let actions = actions.clone();
                            let activity = activity.clone();
                            move |_| actions.toggle_bookmark(&activity)
                        },
                        "{label}"
                    }
                    button {
                        class: "rounded bg-slate-900 px-3 py-1 text-xs text-white",
                        onclick: move |_| actions.select(None),
                        "Close"
                    }
                }
            }
        }
    }
}
