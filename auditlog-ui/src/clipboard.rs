//! Clipboard access for the token copy and paste buttons

use wasm_bindgen_futures::JsFuture;

pub async fn write_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let promise = window.navigator().clipboard().write_text(text);

    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("Clipboard write failed: {:?}", e))
}

pub async fn read_text() -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let promise = window.navigator().clipboard().read_text();

    let value = JsFuture::from(promise)
        .await
        .map_err(|e| format!("Clipboard read failed: {:?}", e))?;

    Ok(value.as_string().unwrap_or_default())
}
