pub const PIPS_MIN: u32 = 0;
pub const PIPS_MAX: u32 = 85;

pub const DEFAULT_KEY_UP: &str = "]";
pub const DEFAULT_KEY_DOWN: &str = "[";

// Fixed recovery binding; never user-configurable.
pub const SETTINGS_SHORTCUT: &str = "CommandOrControl+Shift+S";

pub const OVERLAY_WIDTH: f64 = 1280.0;
pub const OVERLAY_HEIGHT: f64 = 50.0;
pub const SETTINGS_WINDOW_WIDTH: f64 = 280.0;
pub const SETTINGS_WINDOW_HEIGHT: f64 = 320.0;
