//! Keyboard shortcut constants for consistent documentation.

pub const SELECT: &str = "Enter";
pub const QUIT: &str = "Esc";
pub const THEME: &str = "F2";
pub const NAVIGATE: &str = "Arrows";
pub const PAGE: &str = "PgUp/PgDn";
pub const CLEAR_QUERY: &str = "Ctrl+U";
