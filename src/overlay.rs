use crate::constants::{OVERLAY_HEIGHT, OVERLAY_WIDTH};
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow};

/// Creates the borderless overlay strip, or returns the existing one.
pub fn create_overlay_window(
    app: &AppHandle,
    always_on_top: bool,
) -> Result<WebviewWindow, String> {
    if let Some(existing) = app.get_webview_window("overlay") {
        return Ok(existing);
    }

    let window = tauri::WebviewWindowBuilder::new(
        app,
        "overlay",
        WebviewUrl::App("index.html".into()),
    )
    .title("Pips Overlay")
    .inner_size(OVERLAY_WIDTH, OVERLAY_HEIGHT)
    .resizable(false)
    // Double-click maximize would blank the strip
    .maximizable(false)
    .decorations(false)
    .shadow(false)
    .always_on_top(always_on_top)
    .visible(true)
    .build()
    .map_err(|e| format!("Failed to create overlay window: {}", e))?;

    Ok(window)
}

/// Pushes the current pip count to the overlay surface. Fire and forget;
/// the overlay re-syncs after a reload via the sync_pips command.
pub fn push_pips(app: &AppHandle, value: u32) {
    if let Some(window) = app.get_webview_window("overlay") {
        let _ = window.emit("pips:update", value);
    }
}

pub fn set_always_on_top(app: &AppHandle, always_on_top: bool) -> Result<(), String> {
    let window = app
        .get_webview_window("overlay")
        .ok_or("Overlay window not found")?;

    window
        .set_always_on_top(always_on_top)
        .map_err(|e| format!("Failed to toggle always-on-top: {}", e))
}
