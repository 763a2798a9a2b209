use wasm_bindgen_futures::JsFuture;

/// Writes `text` through the async clipboard API.
pub(crate) async fn write_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(|err| crate::engine::js_message(&err))
}
