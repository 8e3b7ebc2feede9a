use crate::constants::{DEFAULT_KEY_DOWN, DEFAULT_KEY_UP};
use crate::counter::PipCounter;
use crate::hotkeys;
use crate::paths::resolve_config_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Mutex;
use tauri::AppHandle;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
  pub(crate) key_up: String,
  pub(crate) key_down: String,
  pub(crate) always_on_top: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      key_up: DEFAULT_KEY_UP.to_string(),
      key_down: DEFAULT_KEY_DOWN.to_string(),
      always_on_top: false,
    }
  }
}

pub(crate) struct AppState {
  pub(crate) settings: Mutex<Settings>,
  pub(crate) pips: Mutex<PipCounter>,
}

pub(crate) fn load_settings(app: &AppHandle) -> Settings {
  let path = resolve_config_path(app, "settings.json");
  match fs::read_to_string(path) {
    Ok(raw) => sanitize_settings(serde_json::from_str(&raw).unwrap_or_default()),
    Err(_) => Settings::default(),
  }
}

// A hand-edited settings file must never leave the hotkeys unusable:
// anything the settings window would reject falls back to the stock
// bindings.
pub(crate) fn sanitize_settings(mut settings: Settings) -> Settings {
  settings.key_up = settings.key_up.trim().to_string();
  settings.key_down = settings.key_down.trim().to_string();

  if !hotkeys::validate_hotkey_format(&settings.key_up).valid {
    warn!(
      "Persisted up hotkey '{}' is invalid, falling back to '{}'",
      settings.key_up, DEFAULT_KEY_UP
    );
    settings.key_up = DEFAULT_KEY_UP.to_string();
  }
  if !hotkeys::validate_hotkey_format(&settings.key_down).valid {
    warn!(
      "Persisted down hotkey '{}' is invalid, falling back to '{}'",
      settings.key_down, DEFAULT_KEY_DOWN
    );
    settings.key_down = DEFAULT_KEY_DOWN.to_string();
  }
  if hotkeys::validate_binding_pair(&settings.key_up, &settings.key_down).is_err() {
    warn!(
      "Persisted hotkeys '{}'/'{}' collide, falling back to defaults",
      settings.key_up, settings.key_down
    );
    settings.key_up = DEFAULT_KEY_UP.to_string();
    settings.key_down = DEFAULT_KEY_DOWN.to_string();
  }

  settings
}

pub(crate) fn save_settings_file(app: &AppHandle, settings: &Settings) -> Result<(), String> {
  let path = resolve_config_path(app, "settings.json");
  let raw = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
  fs::write(path, raw).map_err(|e| e.to_string())?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.key_up, "]");
    assert_eq!(settings.key_down, "[");
    assert!(!settings.always_on_top);
  }

  #[test]
  fn test_missing_fields_take_defaults() {
    let settings: Settings = serde_json::from_str("{\"always_on_top\":true}").unwrap();
    assert_eq!(settings.key_up, "]");
    assert_eq!(settings.key_down, "[");
    assert!(settings.always_on_top);
  }

  #[test]
  fn test_sanitize_empty_keys() {
    let settings = sanitize_settings(Settings {
      key_up: "".to_string(),
      key_down: "   ".to_string(),
      always_on_top: true,
    });
    assert_eq!(settings.key_up, "]");
    assert_eq!(settings.key_down, "[");
    assert!(settings.always_on_top);
  }

  #[test]
  fn test_sanitize_colliding_keys() {
    let settings = sanitize_settings(Settings {
      key_up: "F1".to_string(),
      key_down: "f1".to_string(),
      always_on_top: false,
    });
    assert_eq!(settings.key_up, "]");
    assert_eq!(settings.key_down, "[");
  }

  #[test]
  fn test_sanitize_keeps_valid_settings() {
    let settings = sanitize_settings(Settings {
      key_up: "F1".to_string(),
      key_down: "F2".to_string(),
      always_on_top: true,
    });
    assert_eq!(settings.key_up, "F1");
    assert_eq!(settings.key_down, "F2");
    assert!(settings.always_on_top);
  }
}
