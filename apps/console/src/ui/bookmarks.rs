use dioxus::prelude::*;

use crate::bookmarks::{count_label, Bookmark};
use crate::state::{use_app_state, use_table_actions};

#[component]
pub fn SavedActivities() -> Element {
    let bookmarks = use_app_state().read().bookmarks.clone();
    let mut expanded = use_signal(|| false);
    let count = count_label(bookmarks.len());

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
            button {
                class: "flex w-full items-center justify-between text-sm font-semibold text-slate-800",
                onclick: move |_| expanded.set(!expanded()),
                span { "Saved activities" }
                span { class: "rounded-full bg-slate-900 px-2 py-0.5 font-mono text-xs text-white", "{count}" }
            }
            if expanded() {
                if bookmarks.is_empty() {
                    p { class: "mt-3 text-xs text-slate-500", "Nothing saved yet." }
                } else {
                    ul { class: "mt-3 divide-y divide-slate-100",
                        for bookmark in bookmarks {
                            SavedRow { key: "{bookmark.code}", bookmark }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SavedRow(bookmark: Bookmark) -> Element {
    let actions = use_table_actions();
    let code = bookmark.code.clone();

    rsx! {
        li { class: "flex items-start justify-between gap-3 py-2 text-xs",
            div { class: "space-y-0.5",
                p { class: "font-mono text-slate-500", "{bookmark.code}" }
                p { class: "font-semibold text-slate-800", "{bookmark.name}" }
                p { class: "text-slate-500", "{bookmark.category} · {bookmark.group}" }
                if !bookmark.third_party.is_empty() {
                    p { class: "text-amber-700", "Third party: {bookmark.third_party}" }
                }
            }
            button {
                class: "rounded border border-slate-300 px-2 py-1 text-[11px] text-slate-600 hover:bg-slate-100",
                onclick: move |_| actions.remove_bookmark(&code),
                "Remove"
            }
        }
    }
}
