//! Shared constants used across linepad crates.

/// Default number of lines grouped into one layout cache window.
pub const DEFAULT_WINDOW_SIZE: usize = 64;

/// Default cap on simultaneously populated layout cache windows.
pub const DEFAULT_MAX_LOADED_WINDOWS: usize = 16;

/// Default maximum number of commands retained on the undo stack.
pub const DEFAULT_UNDO_LIMIT: usize = 500;

/// Default upper bound for text bytes retained by undo history.
pub const DEFAULT_UNDO_MAX_BYTES: usize = 8 * 1024 * 1024;

/// Environment variable overriding the cache window size.
pub const ENV_WINDOW_SIZE: &str = "LINEPAD_WINDOW_SIZE";
/// Environment variable overriding the populated window cap.
pub const ENV_MAX_LOADED_WINDOWS: &str = "LINEPAD_MAX_LOADED_WINDOWS";
/// Environment variable overriding the undo depth.
pub const ENV_UNDO_LIMIT: &str = "LINEPAD_UNDO_LIMIT";
/// Environment variable overriding the undo byte budget.
pub const ENV_UNDO_MAX_BYTES: &str = "LINEPAD_UNDO_MAX_BYTES";
/// Environment flag toggling word-level coalescing of typed characters.
pub const ENV_COALESCE_TYPING: &str = "LINEPAD_COALESCE_TYPING";
