// Pips Overlay - core app runtime

mod constants;
mod counter;
mod errors;
mod hotkeys;
mod overlay;
mod paths;
mod state;

use errors::{AppError, ErrorEvent};
use state::{AppState, Settings};
use std::sync::Mutex;
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::{AppHandle, Emitter, Manager, State, Wry};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};
use tracing::{error, info, warn};

use crate::constants::{SETTINGS_SHORTCUT, SETTINGS_WINDOW_HEIGHT, SETTINGS_WINDOW_WIDTH};
use crate::counter::PipCounter;
use crate::state::{load_settings, save_settings_file};

fn register_hotkeys(app: &AppHandle, settings: &Settings) -> Result<(), String> {
    let manager = app.global_shortcut();

    // Unregister all existing hotkeys to prevent conflicts
    if let Err(e) = manager.unregister_all() {
        warn!(
            "Failed to unregister all hotkeys (may be OK if none registered): {}",
            e
        );
    } else {
        info!("Successfully unregistered all hotkeys");
    }

    // Collect registration errors instead of failing early
    let mut errors = Vec::new();

    // The settings shortcut goes in first and stays out of the error
    // accounting below: it is the recovery path when the configured
    // bindings are broken or claimed by another process.
    info!("Registering settings hotkey: {}", SETTINGS_SHORTCUT);
    match manager.on_shortcut(SETTINGS_SHORTCUT, |app, _shortcut, event| {
        if event.state == ShortcutState::Pressed {
            if let Err(err) = open_settings_window(app) {
                emit_error(app, AppError::Window(err), Some("Settings shortcut"));
            }
        }
    }) {
        Ok(_) => info!("Settings hotkey registered successfully"),
        Err(e) => {
            error!(
                "Failed to register settings hotkey '{}': {}",
                SETTINGS_SHORTCUT, e
            );
            errors.push(format!("Settings: {}", e));
            emit_error(
                app,
                AppError::Hotkey(format!(
                    "Could not register settings hotkey '{}': {}",
                    SETTINGS_SHORTCUT, e
                )),
                Some("Hotkey Registration"),
            );
        }
    }

    let register_up = || -> Result<(), String> {
        let key = settings.key_up.trim();
        if key.is_empty() {
            return Ok(());
        }
        info!("Registering pip-up hotkey: {}", key);
        match manager.on_shortcut(key, |app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                let value = app.state::<AppState>().pips.lock().unwrap().increment();
                overlay::push_pips(app, value);
            }
        }) {
            Ok(_) => {
                info!("Pip-up hotkey registered successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to register pip-up hotkey '{}': {}", key, e);
                emit_error(
                    app,
                    AppError::Hotkey(format!(
                        "Pip-up hotkey '{}' may conflict with another application ({})",
                        key, e
                    )),
                    Some("Hotkey Registration"),
                );
                Err(e.to_string())
            }
        }
    };

    let register_down = || -> Result<(), String> {
        let key = settings.key_down.trim();
        if key.is_empty() {
            return Ok(());
        }
        info!("Registering pip-down hotkey: {}", key);
        match manager.on_shortcut(key, |app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                let value = app.state::<AppState>().pips.lock().unwrap().decrement();
                overlay::push_pips(app, value);
            }
        }) {
            Ok(_) => {
                info!("Pip-down hotkey registered successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to register pip-down hotkey '{}': {}", key, e);
                emit_error(
                    app,
                    AppError::Hotkey(format!(
                        "Pip-down hotkey '{}' may conflict with another application ({})",
                        key, e
                    )),
                    Some("Hotkey Registration"),
                );
                Err(e.to_string())
            }
        }
    };

    if let Err(e) = register_up() {
        errors.push(format!("Up: {}", e));
    }
    if let Err(e) = register_down() {
        errors.push(format!("Down: {}", e));
    }

    // Report all errors if any occurred, but don't fail completely: the
    // settings shortcut stays live so the user can pick new bindings.
    if !errors.is_empty() {
        warn!("Some hotkeys failed to register: {}", errors.join(", "));
    } else {
        info!("All hotkeys registered successfully");
    }
    Ok(())
}

/// Opens the settings window, or focuses the one already open.
fn open_settings_window(app: &AppHandle) -> Result<tauri::WebviewWindow, String> {
    if let Some(existing) = app.get_webview_window("settings") {
        let _ = existing.set_focus();
        return Ok(existing);
    }

    let window = tauri::WebviewWindowBuilder::new(
        app,
        "settings",
        tauri::WebviewUrl::App("settings.html".into()),
    )
    .title("Settings")
    .inner_size(SETTINGS_WINDOW_WIDTH, SETTINGS_WINDOW_HEIGHT)
    .resizable(false)
    .minimizable(false)
    .maximizable(false)
    // Keep above the overlay strip
    .always_on_top(true)
    .build()
    .map_err(|e| format!("Failed to create settings window: {}", e))?;

    Ok(window)
}

fn build_context_menu(app: &AppHandle) -> Result<Menu<Wry>, String> {
    Menu::with_items(
        app,
        &[
            &MenuItem::with_id(app, "settings", "Settings", true, None::<&str>)
                .map_err(|e| e.to_string())?,
            &PredefinedMenuItem::separator(app).map_err(|e| e.to_string())?,
            &MenuItem::with_id(app, "exit", "Exit", true, None::<&str>)
                .map_err(|e| e.to_string())?,
        ],
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
fn get_settings(state: State<'_, AppState>) -> Settings {
    state.settings.lock().unwrap().clone()
}

#[tauri::command]
fn save_settings(
    app: AppHandle,
    state: State<'_, AppState>,
    settings: Settings,
) -> Result<(), String> {
    hotkeys::validate_binding_pair(&settings.key_up, &settings.key_down)?;

    {
        let mut current = state.settings.lock().unwrap();
        *current = settings.clone();
    }
    if let Err(err) = save_settings_file(&app, &settings) {
        emit_error(&app, AppError::Storage(err.clone()), Some("Settings"));
        return Err(err);
    }
    register_hotkeys(&app, &settings)?;

    if let Err(err) = overlay::set_always_on_top(&app, settings.always_on_top) {
        emit_error(&app, AppError::Window(err), Some("Settings"));
    }

    let _ = app.emit("settings-changed", settings.clone());
    Ok(())
}

#[tauri::command]
fn get_pips(state: State<'_, AppState>) -> u32 {
    state.pips.lock().unwrap().value()
}

/// Authoritative count pushed by the overlay page after it reloads and
/// restores the value it renders locally.
#[tauri::command]
fn sync_pips(state: State<'_, AppState>, count: u32) {
    state.pips.lock().unwrap().sync(count);
}

#[tauri::command]
fn validate_hotkey(key: String) -> hotkeys::ValidationResult {
    hotkeys::validate_hotkey_format(&key)
}

#[tauri::command]
fn open_settings(app: AppHandle) -> Result<(), String> {
    open_settings_window(&app).map(|_| ())
}

/// Right-click trigger from the overlay page.
#[tauri::command]
fn show_context_menu(app: AppHandle, window: tauri::Window) -> Result<(), String> {
    let menu = build_context_menu(&app)?;
    window.popup_menu(&menu).map_err(|e| e.to_string())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Pips Overlay starting up");
}

pub(crate) fn emit_error(app: &AppHandle, error: AppError, context: Option<&str>) {
    let event = if let Some(ctx) = context {
        ErrorEvent::new(error.clone()).with_context(ctx)
    } else {
        ErrorEvent::new(error.clone())
    };

    error!("{}: {}", error.title(), error.message());

    let _ = app.emit("app:error", event);
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_logging();

    info!("Starting Pips Overlay application");
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // A second launch just raises the running overlay
            if let Some(window) = app.get_webview_window("overlay") {
                let _ = window.set_focus();
            }
        }))
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .setup(|app| {
            let settings = load_settings(app.handle());

            app.manage(AppState {
                settings: Mutex::new(settings.clone()),
                pips: Mutex::new(PipCounter::new()),
            });

            let on_top = settings.always_on_top;
            if let Err(err) = overlay::create_overlay_window(app.handle(), on_top) {
                eprintln!("⚠ Failed to create overlay window: {}", err);
            }

            if let Err(err) = register_hotkeys(app.handle(), &settings) {
                eprintln!("⚠ Failed to register hotkeys: {}", err);
            }

            Ok(())
        })
        .on_menu_event(|app, event| match event.id.as_ref() {
            "settings" => {
                if let Err(err) = open_settings_window(app) {
                    emit_error(app, AppError::Window(err), Some("Context menu"));
                }
            }
            "exit" => {
                app.exit(0);
            }
            _ => {}
        })
        .invoke_handler(tauri::generate_handler![
            get_settings,
            save_settings,
            get_pips,
            sync_pips,
            validate_hotkey,
            open_settings,
            show_context_menu,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app, event| {
            if let tauri::RunEvent::Exit = event {
                if let Err(e) = app.global_shortcut().unregister_all() {
                    warn!("Failed to unregister hotkeys on exit: {}", e);
                }
            }
        });
}
