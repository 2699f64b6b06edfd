use crate::state::TableActions;

#[cfg(target_arch = "wasm32")]
pub fn copy_text(actions: TableActions, content: String) {
    dioxus::prelude::spawn(async move {
        let result = async {
            let window = web_sys::window().ok_or(())?;
            let clipboard = window.navigator().clipboard();
            let promise = clipboard.write_text(&content);
            wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|_| ())
        }
        .await;

        match result {
            Ok(_) => actions.set_operation_success(format!("Copied \"{content}\"")),
            Err(_) => {
                tracing::warn!("clipboard write rejected");
                actions.set_operation_error("Clipboard", "Could not copy to clipboard".to_string())
            }
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn copy_text(actions: TableActions, content: String) {
    actions.set_operation_success(format!("Copied \"{content}\" (simulated)"));
}
