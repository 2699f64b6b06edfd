use crate::state::{use_app_state, use_table_actions};
use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn accent_classes(self) -> (&'static str, &'static str) {
        match self {
            Self::Success => ("border-emerald-500 bg-emerald-50", "text-emerald-700"),
            Self::Error => ("border-red-500 bg-red-50", "text-red-700"),
        }
    }
}

#[component]
pub fn Toast(
    kind: ToastKind,
    title: String,
    message: String,
    on_close: EventHandler<MouseEvent>,
) -> Element {
    let (container_class, accent_text) = kind.accent_classes();

    rsx! {
        div { class: format!("pointer-events-auto rounded-lg border-l-4 p-4 shadow-lg {}", container_class),
            div { class: "flex items-start justify-between gap-4",
                div { class: "space-y-1",
                    h3 { class: format!("text-sm font-semibold {}", accent_text), "{title}" }
                    p { class: "text-xs text-slate-700", "{message}" }
                }
                button {
                    class: "rounded bg-slate-200 px-2 py-1 text-[11px] text-slate-600 transition hover:bg-slate-300",
                    onclick: move |evt| on_close.call(evt),
                    "Close"
                }
            }
        }
    }
}

#[component]
pub fn NotificationCenter() -> Element {
    let actions = use_table_actions();
    let operation = use_app_state().read().operation.clone();

    let toast = if let Some(error) = operation.error {
        Some((
            ToastKind::Error,
            operation.context.unwrap_or_else(|| "Something went wrong".to_string()),
            error,
        ))
    } else {
        operation.last_message.map(|message| {
            (
                ToastKind::Success,
                operation.context.unwrap_or_else(|| "Done".to_string()),
                message,
            )
        })
    };

    let Some((kind, title, message)) = toast else {
        return rsx! { Fragment {} };
    };

    rsx! {
        div { class: "pointer-events-none fixed right-4 top-4 z-50 flex w-80 flex-col gap-3",
            Toast {
                kind,
                title,
                message,
                on_close: move |_| actions.clear_operation_status(),
            }
        }
    }
}
