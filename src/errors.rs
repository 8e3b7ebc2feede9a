use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-wide error types with categories for better error handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Hotkey registration/validation errors
    Hotkey(String),

    /// Settings storage errors
    Storage(String),

    /// Overlay/window management errors
    Window(String),

    /// Generic errors that don't fit other categories
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Hotkey(msg) => write!(f, "Hotkey Error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::Window(msg) => write!(f, "Window Error: {}", msg),
            AppError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Returns a user-friendly title for the error
    pub fn title(&self) -> &str {
        match self {
            AppError::Hotkey(_) => "Hotkey Problem",
            AppError::Storage(_) => "Storage Error",
            AppError::Window(_) => "Window Error",
            AppError::Other(_) => "Error",
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        match self {
            AppError::Hotkey(msg)
            | AppError::Storage(msg)
            | AppError::Window(msg)
            | AppError::Other(msg) => msg,
        }
    }
}

/// Convert from String to AppError::Other
impl From<String> for AppError {
    fn from(error: String) -> Self {
        AppError::Other(error)
    }
}

/// Convert from &str to AppError::Other
impl From<&str> for AppError {
    fn from(error: &str) -> Self {
        AppError::Other(error.to_string())
    }
}

/// Error event payload sent to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error: AppError,
    pub timestamp: u64,
    pub context: Option<String>,
}

impl ErrorEvent {
    pub fn new(error: AppError) -> Self {
        Self {
            error,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Hotkey("Key already claimed".to_string());
        assert_eq!(err.to_string(), "Hotkey Error: Key already claimed");
    }

    #[test]
    fn test_error_title() {
        let err = AppError::Storage("Disk full".to_string());
        assert_eq!(err.title(), "Storage Error");
    }

    #[test]
    fn test_from_string() {
        let err: AppError = "test error".into();
        assert!(matches!(err, AppError::Other(_)));
    }

    #[test]
    fn test_error_event() {
        let event = ErrorEvent::new(AppError::Window("Overlay window not found".to_string()))
            .with_context("Settings");

        assert!(event.context.is_some());
        assert_eq!(event.context.unwrap(), "Settings");
    }
}
