use dioxus::prelude::*;
use futures::StreamExt;

use super::window::{viewport_width, window_events};
use crate::state::use_table_actions;

/// Keeps the stored viewport width current so the table can switch
/// between rows and cards.
pub fn use_viewport_tracker() {
    let actions = use_table_actions();

    use_future(move || {
        let actions = actions.clone();
        async move {
            if let Some(width) = viewport_width() {
                actions.set_viewport_width(width);
            }

            let mut resizes = window_events("resize");
            while resizes.next().await.is_some() {
                if let Some(width) = viewport_width() {
                    actions.set_viewport_width(width);
                }
            }
        }
    });
}
