//! Editing core for linepad: the line buffer, undoable commands, and the
//! layout cache that sits between the buffer and a renderer.

/// Line buffer and the read-only line source trait.
pub mod buffer;
/// Undoable commands built from primitive operations.
pub mod command;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants (cache sizing, history limits, env var names).
pub mod constants;
/// Caret and selection state owned by the host.
pub mod context;
/// Test helpers for environment-variable mutation.
pub mod env;
/// Error types.
pub mod error;
/// Undo/redo history and transactional application.
pub mod history;
/// Measurement, styles, and the layout cache.
pub mod layout;
/// Primitive buffer operations and change notifications.
pub mod operation;
/// Buffer positions and segments.
pub mod position;
/// Character-indexed string helpers.
pub mod text;
/// Word-boundary policy for typing coalescing.
pub mod word;

#[cfg(test)]
pub(crate) mod test_support;

pub use buffer::{Applied, LineBuffer, LineSource};
pub use command::{Command, CommandKind};
pub use config::{CacheConfig, Config, HistoryConfig};
pub use context::EditorContext;
pub use error::{EditorError, Result};
pub use history::{apply_all, CommandHistory, EditOutcome};
pub use layout::{LayoutCache, LayoutSource, RawLayout};
pub use operation::{notify_observers, BufferChange, ChangeObserver, Operation};
pub use position::{BufferPosition, BufferSegment};
pub use word::{UnicodeWords, WordBoundary};
