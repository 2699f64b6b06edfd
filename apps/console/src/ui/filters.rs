use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::models::{ApprovalStage, RiskRating};
use crate::state::{use_app_state, use_table_actions};

const SEARCH_DEBOUNCE_MS: u32 = 350;

#[component]
pub fn FilterPanel() -> Element {
    let actions = use_table_actions();
    let mut draft = use_signal(String::new);

    let snapshot = use_app_state().read().clone();
    let filters = snapshot.filters;
    let facets = snapshot.facets;
    let shown = snapshot.results.rows.len();
    let total = snapshot.results.total_count;

    let on_reset = {
        let actions = actions.clone();
        move |_| {
            draft.set(String::new());
            actions.reset_filters();
        }
    };

    rsx! {
        section { class: "space-y-4 rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
            SearchBox { draft }
            div { class: "grid gap-3 md:grid-cols-2",
                FacetSelect {
                    label: "Category",
                    options: facets.categories.clone(),
                    current: filters.category().to_string(),
                    on_select: {
                        let actions = actions.clone();
                        move |value: String| actions.select_category(&value)
                    },
                }
                FacetSelect {
                    label: "Group",
                    options: facets.groups.clone(),
                    current: filters.group().to_string(),
                    on_select: {
                        let actions = actions.clone();
                        move |value: String| actions.select_group(&value)
                    },
                }
            }
            details { class: "space-y-2 text-xs text-slate-600",
                summary { class: "cursor-pointer font-semibold", "More groups and categories" }
                FacetChips {
                    label: "Groups",
                    options: facets.groups.clone(),
                    selected: filters.groups.iter().cloned().collect::<Vec<_>>(),
                    on_toggle: {
                        let actions = actions.clone();
                        move |value: String| actions.toggle_group(&value)
                    },
                }
                FacetChips {
                    label: "Categories",
                    options: facets.categories.clone(),
                    selected: filters.categories.iter().cloned().collect::<Vec<_>>(),
                    on_toggle: {
                        let actions = actions.clone();
                        move |value: String| actions.toggle_category(&value)
                    },
                }
                CodeFilter { selected: filters.codes.iter().cloned().collect::<Vec<_>>() }
            }
            ThirdPartyFilter {
                options: facets.third_parties.clone(),
                selected: filters.third_parties.iter().cloned().collect::<Vec<_>>(),
                only_with_third_party: filters.third_party_only,
            }
            div { class: "flex flex-wrap gap-6",
                ApprovalFilter { selected: filters.approval_stages.iter().copied().collect::<Vec<_>>() }
                RiskFilter {
                    selected: filters.risk_ratings.iter().copied().collect::<Vec<_>>(),
                    fast_track: filters.fast_track,
                }
            }
            div { class: "flex items-center justify-between text-xs text-slate-500",
                span { "Showing {shown} of {total}" }
                button {
                    class: "rounded border border-slate-300 px-3 py-1 text-slate-600 hover:bg-slate-100",
                    disabled: filters.is_unfiltered(),
                    onclick: on_reset,
                    "Reset filters"
                }
            }
        }
    }
}

/// Free-text search applied 350 ms after the last keystroke.
#[component]
fn SearchBox(draft: Signal<String>) -> Element {
    let mut draft = draft;
    let actions = use_table_actions();
    let mut generation = use_signal(|| 0_u64);

    let on_input = {
        let actions = actions.clone();
        move |evt: FormEvent| {
            let value = evt.value();
            draft.set(value.clone());
            let ticket = generation() + 1;
            generation.set(ticket);
            let actions = actions.clone();
            spawn(async move {
                TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
                if generation() == ticket {
                    actions.set_search(&value);
                }
            });
        }
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        generation.with_mut(|value| *value += 1);
        actions.set_search(&draft());
    };

    rsx! {
        form { class: "flex gap-2", onsubmit: on_submit,
            input {
                class: "flex-1 rounded border border-slate-300 px-3 py-2 text-sm",
                r#type: "search",
                placeholder: "Search by name or code",
                value: "{draft}",
                oninput: on_input,
            }
            button {
                class: "rounded bg-slate-900 px-4 py-2 text-sm font-semibold text-white hover:bg-slate-700",
                r#type: "submit",
                "Search"
            }
        }
    }
}

#[component]
fn FacetSelect(
    label: &'static str,
    options: Vec<String>,
    current: String,
    on_select: EventHandler<String>,
) -> Element {
    rsx! {
        label { class: "flex flex-col gap-1 text-xs text-slate-600",
            span { class: "font-semibold", "{label}" }
            select {
                class: "rounded border border-slate-300 px-2 py-1 text-sm",
                value: "{current}",
                onchange: move |evt| on_select.call(evt.value()),
                option { value: "", selected: current.is_empty(), "All" }
                for value in options {
                    option {
                        key: "{value}",
                        value: "{value}",
                        selected: value == current,
                        "{value}"
                    }
                }
            }
        }
    }
}

#[component]
fn ThirdPartyFilter(
    options: Vec<String>,
    selected: Vec<String>,
    only_with_third_party: bool,
) -> Element {
    let actions = use_table_actions();
    let clear_actions = actions.clone();
    let only_actions = actions.clone();

    rsx! {
        fieldset { class: "space-y-2",
            legend { class: "text-xs font-semibold text-slate-600", "Third party" }
            div { class: "flex flex-wrap gap-2",
                button {
                    class: chip_class(selected.is_empty()),
                    onclick: move |_| clear_actions.clear_third_parties(),
                    "All"
                }
                for name in options {
                    ToggleChip {
                        key: "{name}",
                        active: selected.contains(&name),
                        value: name,
                        on_toggle: {
                            let actions = actions.clone();
                            move |value: String| actions.toggle_third_party(&value)
                        },
                    }
                }
            }
            label { class: "flex items-center gap-2 text-xs text-slate-600",
                input {
                    r#type: "checkbox",
                    checked: only_with_third_party,
                    onchange: move |evt| only_actions.set_third_party_only(evt.checked()),
                }
                "Only activities that need a third-party approval"
            }
        }
    }
}

#[component]
fn ToggleChip(value: String, active: bool, on_toggle: EventHandler<String>) -> Element {
    let label = value.clone();
    rsx! {
        button {
            class: chip_class(active),
            onclick: move |_| on_toggle.call(value.clone()),
            "{label}"
        }
    }
}

/// Multi-select over facet values; independent of the single-select lists.
#[component]
fn FacetChips(
    label: &'static str,
    options: Vec<String>,
    selected: Vec<String>,
    on_toggle: EventHandler<String>,
) -> Element {
    rsx! {
        fieldset { class: "space-y-1",
            legend { class: "font-semibold", "{label}" }
            div { class: "flex flex-wrap gap-2",
                for value in options {
                    ToggleChip {
                        key: "{value}",
                        active: selected.contains(&value),
                        value,
                        on_toggle,
                    }
                }
            }
        }
    }
}

/// Activity codes typed one at a time; each becomes a removable chip.
#[component]
fn CodeFilter(selected: Vec<String>) -> Element {
    let actions = use_table_actions();
    let mut draft = use_signal(String::new);

    let on_submit = {
        let actions = actions.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            actions.add_code(&draft());
            draft.set(String::new());
        }
    };

    rsx! {
        fieldset { class: "space-y-1",
            legend { class: "font-semibold", "Codes" }
            form { class: "flex gap-2", onsubmit: on_submit,
                input {
                    class: "w-40 rounded border border-slate-300 px-2 py-1 text-xs",
                    placeholder: "Add a code",
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                }
            }
            div { class: "flex flex-wrap gap-2",
                for code in selected {
                    ToggleChip {
                        key: "{code}",
                        active: true,
                        value: code,
                        on_toggle: {
                            let actions = actions.clone();
                            move |value: String| actions.toggle_code(&value)
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn ApprovalFilter(selected: Vec<ApprovalStage>) -> Element {
    let actions = use_table_actions();
    rsx! {
        fieldset { class: "space-y-1",
            legend { class: "text-xs font-semibold text-slate-600", "Approval" }
            for stage in ApprovalStage::ALL {
                label { key: "{stage.label()}", class: "flex items-center gap-2 text-xs text-slate-600",
                    input {
                        r#type: "checkbox",
                        checked: selected.contains(&stage),
                        onchange: {
                            let actions = actions.clone();
                            move |_| actions.toggle_approval_stage(stage)
                        },
                    }
                    "{stage.label()}"
                }
            }
        }
    }
}

#[component]
fn RiskFilter(selected: Vec<RiskRating>, fast_track: bool) -> Element {
    let actions = use_table_actions();
    let fast_actions = actions.clone();
    rsx! {
        fieldset { class: "space-y-1",
            legend { class: "text-xs font-semibold text-slate-600", "Risk rating" }
            for rating in RiskRating::ALL {
                label { key: "{rating.label()}", class: "flex items-center gap-2 text-xs text-slate-600",
                    input {
                        r#type: "checkbox",
                        checked: selected.contains(&rating),
                        onchange: {
                            let actions = actions.clone();
                            move |_| actions.toggle_risk_rating(rating)
                        },
                    }
                    "{rating.label()}"
                }
            }
            label { class: "flex items-center gap-2 pt-1 text-xs font-semibold text-emerald-700",
                input {
                    r#type: "checkbox",
                    checked: fast_track,
                    onchange: move |evt| fast_actions.set_fast_track(evt.checked()),
                }
                "Fast track (Low and Medium only)"
            }
        }
    }
}

fn chip_class(active: bool) -> &'static str {
    if active {
        "rounded-full bg-slate-900 px-3 py-1 text-xs text-white"
    } else {
        "rounded-full border border-slate-300 px-3 py-1 text-xs text-slate-600 hover:bg-slate-100"
    }
}
