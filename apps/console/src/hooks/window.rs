//! Window event plumbing shared by the viewport and scroll hooks.

use futures::channel::mpsc::{self, UnboundedReceiver};

/// Forwards every `event` fired on `window` into a channel.
///
/// The listener lives as long as the page; the console mounts its hooks once.
#[cfg(target_arch = "wasm32")]
pub fn window_events(event: &str) -> UnboundedReceiver<()> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let (tx, rx) = mpsc::unbounded();
    let Some(window) = web_sys::window() else {
        tracing::warn!(event, "no window to listen on");
        return rx;
    };

    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        let _ = tx.unbounded_send(());
    }) as Box<dyn FnMut(_)>);
    if let Err(err) =
        window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        tracing::warn!(event, ?err, "failed to attach window listener");
    }
    closure.forget();
    rx
}

#[cfg(not(target_arch = "wasm32"))]
pub fn window_events(_event: &str) -> UnboundedReceiver<()> {
    let (_tx, rx) = mpsc::unbounded();
    rx
}

#[cfg(target_arch = "wasm32")]
pub fn viewport_width() -> Option<f64> {
    web_sys::window()?.inner_width().ok()?.as_f64()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn viewport_width() -> Option<f64> {
    None
}

/// `(scroll_y, inner_height, document_height)`.
#[cfg(target_arch = "wasm32")]
pub fn scroll_metrics() -> Option<(f64, f64, f64)> {
    let window = web_sys::window()?;
    let scroll_y = window.scroll_y().ok()?;
    let inner_height = window.inner_height().ok()?.as_f64()?;
    let document_height = window.document()?.document_element()?.scroll_height() as f64;
    Some((scroll_y, inner_height, document_height))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn scroll_metrics() -> Option<(f64, f64, f64)> {
    None
}

/// The `filters` query parameter of the page URL.
#[cfg(target_arch = "wasm32")]
pub fn shared_filters_param() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("filters")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn shared_filters_param() -> Option<String> {
    None
}
