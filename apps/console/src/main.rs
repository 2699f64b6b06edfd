#![allow(non_snake_case)]

mod api;
mod bookmarks;
mod cache;
mod config;
mod filters;
mod fixtures;
mod hooks;
mod models;
mod normalize;
mod query;
mod service;
mod state;
mod ui;
mod view;

use api::{Backend, ClientError, MemoryBackend, SupabaseClient};
use config::AppConfig;
use dioxus::prelude::*;
use hooks::scroll::use_infinite_scroll;
use hooks::viewport::use_viewport_tracker;
use hooks::window::shared_filters_param;
use once_cell::sync::OnceCell;
use state::{use_table_actions, AppState, Services};
use tracing::{error, info};
use ui::bookmarks::SavedActivities;
use ui::details::ActivityDetails;
use ui::filters::FilterPanel;
use ui::notifications::NotificationCenter;
use ui::table::ActivityTable;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();
pub(crate) static BACKEND: OnceCell<Backend> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    bootstrap_infrastructure();
    launch(App);
}

fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(tracing::Level::INFO);
    });
}

fn bootstrap_infrastructure() {
    let config = AppConfig::from_env();
    let _ = APP_CONFIG.set(config.clone());

    if config.uses_fixtures() {
        info!("no backend configured, serving bundled activities");
        let _ = BACKEND.set(Backend::Fixtures(MemoryBackend::with_fixtures()));
        return;
    }

    match SupabaseClient::new(config) {
        Ok(client) => {
            let _ = BACKEND.set(Backend::Supabase(client));
            info!("activity client initialized");
        }
        Err(err) => {
            report_client_error("failed to initialize activity client", &err);
            let _ = BACKEND.set(Backend::Fixtures(MemoryBackend::with_fixtures()));
        }
    }
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    let app_state = use_signal(AppState::default);
    use_context_provider(|| app_state);
    use_context_provider(|| {
        let backend = BACKEND
            .get()
            .cloned()
            .unwrap_or_else(|| Backend::Fixtures(MemoryBackend::with_fixtures()));
        Services::new(backend)
    });

    rsx! {
        div { class: "relative",
            Console {}
            NotificationCenter {}
        }
    }
}

#[component]
fn Console() -> Element {
    let actions = use_table_actions();
    use_viewport_tracker();
    use_infinite_scroll();

    use_hook(move || {
        spawn(async move {
            actions.bootstrap(shared_filters_param());
        });
    });

    let source = BACKEND.get().map(Backend::label).unwrap_or("fixtures");
    let table = APP_CONFIG
        .get()
        .map(|config| config.table.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "app-shell mx-auto max-w-7xl space-y-4 p-4",
            section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
                h1 { class: "text-xl font-semibold text-slate-900", "Business Activity List" }
                p { class: "text-xs text-slate-500", "Data source: {source} ({table})" }
            }
            div { class: "grid gap-4 lg:grid-cols-[1fr_20rem]",
                div { class: "space-y-4",
                    FilterPanel {}
                    ActivityTable {}
                }
                SavedActivities {}
            }
            ActivityDetails {}
        }
    }
}
