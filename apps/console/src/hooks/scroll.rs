use dioxus::prelude::*;
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;

use super::window::{scroll_metrics, window_events};
use crate::state::use_table_actions;

pub const SCROLL_DEBOUNCE_MS: u32 = 100;

/// Fraction of the document that must be scrolled past before the next
/// page is requested.
pub const LOAD_THRESHOLD: f64 = 0.8;

pub fn near_bottom(scroll_y: f64, inner_height: f64, document_height: f64) -> bool {
    document_height > 0.0 && scroll_y + inner_height > LOAD_THRESHOLD * document_height
}

/// Appends the next page when the reader nears the end of the list.
pub fn use_infinite_scroll() {
    let actions = use_table_actions();

    use_future(move || {
        let actions = actions.clone();
        async move {
            let mut scrolls = window_events("scroll");
            while scrolls.next().await.is_some() {
                // Trailing debounce: wait until scrolling pauses.
                loop {
                    TimeoutFuture::new(SCROLL_DEBOUNCE_MS).await;
                    let mut pending = false;
                    while let Ok(Some(())) = scrolls.try_next() {
                        pending = true;
                    }
                    if !pending {
                        break;
                    }
                }

                if let Some((scroll_y, inner_height, document_height)) = scroll_metrics() {
                    if near_bottom(scroll_y, inner_height, document_height) {
                        actions.load_more();
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_past_eighty_percent() {
        assert!(near_bottom(700.0, 900.0, 1800.0));
        assert!(!near_bottom(500.0, 900.0, 1800.0));
        assert!(!near_bottom(540.0, 900.0, 1800.0));
    }

    #[test]
    fn empty_document_never_triggers() {
        assert!(!near_bottom(0.0, 900.0, 0.0));
    }
}
