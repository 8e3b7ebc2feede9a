use crate::constants::SETTINGS_SHORTCUT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub error: Option<String>,
    pub formatted: Option<String>,
}

/// Validates a hotkey string format. Bare keys without modifiers are
/// accepted; the stock bindings are plain "]" and "[".
pub fn validate_hotkey_format(key: &str) -> ValidationResult {
    let key = key.trim();

    if key.is_empty() {
        return ValidationResult {
            valid: false,
            error: Some("Hotkey cannot be empty".to_string()),
            formatted: None,
        };
    }

    // Parse modifiers and key
    let parts: Vec<&str> = key.split('+').map(|s| s.trim()).collect();

    // Valid modifiers
    let valid_modifiers = [
        "CommandOrControl", "CmdOrCtrl", "Command", "Cmd", "Control", "Ctrl",
        "Alt", "Option", "AltGr", "Shift", "Super", "Meta",
    ];

    // Validate each part except the last (which should be the key)
    let key_part = parts.last().unwrap();
    let modifier_parts = &parts[..parts.len() - 1];

    for modifier in modifier_parts {
        if !valid_modifiers.iter().any(|m| m.eq_ignore_ascii_case(modifier)) {
            return ValidationResult {
                valid: false,
                error: Some(format!("Invalid modifier: '{}'. Valid modifiers: Ctrl, Shift, Alt, Command, etc.", modifier)),
                formatted: None,
            };
        }
    }

    if key_part.is_empty() {
        return ValidationResult {
            valid: false,
            error: Some("Missing key after modifiers".to_string()),
            formatted: None,
        };
    }

    // Format the hotkey (normalize case)
    let formatted = format_hotkey(key);

    ValidationResult {
        valid: true,
        error: None,
        formatted: Some(formatted),
    }
}

/// Formats a hotkey string to a consistent format
fn format_hotkey(key: &str) -> String {
    let parts: Vec<&str> = key.split('+').map(|s| s.trim()).collect();

    let formatted_parts: Vec<String> = parts.iter().map(|part| {
        // Normalize common modifiers
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => "Ctrl".to_string(),
            "cmdorctrl" | "commandorcontrol" => "CommandOrControl".to_string(),
            "cmd" | "command" => "Command".to_string(),
            "alt" | "option" => "Alt".to_string(),
            "shift" => "Shift".to_string(),
            "meta" | "super" => "Meta".to_string(),
            _ => {
                // Capitalize first letter for key
                let mut chars = part.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                }
            }
        }
    }).collect();

    formatted_parts.join("+")
}

/// Normalizes a hotkey for comparison (lowercase, consistent separator)
fn normalize_hotkey(key: &str) -> String {
    key.to_lowercase().replace(" ", "")
}

/// Enforces the binding policy for a settings update: both descriptors
/// must be well formed, must differ from each other, and must not shadow
/// the fixed settings shortcut.
pub fn validate_binding_pair(key_up: &str, key_down: &str) -> Result<(), String> {
    for (label, key) in [("Up", key_up), ("Down", key_down)] {
        let result = validate_hotkey_format(key);
        if !result.valid {
            return Err(format!(
                "{} hotkey: {}",
                label,
                result.error.unwrap_or_else(|| "invalid hotkey".to_string())
            ));
        }
    }

    if normalize_hotkey(key_up) == normalize_hotkey(key_down) {
        return Err("Up and down hotkeys must differ".to_string());
    }

    let reserved = normalize_hotkey(SETTINGS_SHORTCUT);
    if normalize_hotkey(key_up) == reserved || normalize_hotkey(key_down) == reserved {
        return Err(format!(
            "'{}' is reserved for opening the settings window",
            SETTINGS_SHORTCUT
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty() {
        let result = validate_hotkey_format("");
        assert!(!result.valid);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_validate_bare_key() {
        let result = validate_hotkey_format("]");
        assert!(result.valid);
        assert_eq!(result.formatted.as_deref(), Some("]"));
    }

    #[test]
    fn test_validate_valid_hotkey() {
        let result = validate_hotkey_format("Ctrl+Shift+F1");
        assert!(result.valid);
        assert!(result.error.is_none());
        assert!(result.formatted.is_some());
    }

    #[test]
    fn test_validate_bad_modifier() {
        let result = validate_hotkey_format("Hyper+X");
        assert!(!result.valid);
    }

    #[test]
    fn test_validate_trailing_plus() {
        let result = validate_hotkey_format("Ctrl+");
        assert!(!result.valid);
    }

    #[test]
    fn test_format_hotkey() {
        let formatted = format_hotkey("ctrl+shift+space");
        assert_eq!(formatted, "Ctrl+Shift+Space");
    }

    #[test]
    fn test_normalize_hotkey() {
        assert_eq!(
            normalize_hotkey("Ctrl+Shift+Space"),
            normalize_hotkey("ctrl+shift+space")
        );
    }

    #[test]
    fn test_pair_accepts_defaults() {
        assert!(validate_binding_pair("]", "[").is_ok());
    }

    #[test]
    fn test_pair_rejects_identical_keys() {
        assert!(validate_binding_pair("F1", "F1").is_err());
        // Collision detection ignores case and spacing
        assert!(validate_binding_pair("Ctrl+Shift+P", "ctrl + shift + p").is_err());
    }

    #[test]
    fn test_pair_rejects_reserved_settings_shortcut() {
        assert!(validate_binding_pair("CommandOrControl+Shift+S", "[").is_err());
        assert!(validate_binding_pair("]", "commandorcontrol+shift+s").is_err());
    }

    #[test]
    fn test_pair_rejects_empty_key() {
        assert!(validate_binding_pair("", "[").is_err());
        assert!(validate_binding_pair("]", "  ").is_err());
    }
}
