//! Root crate facade for the linepad editing core and its view companions.

pub use linepad_core::{
    buffer, command, config, constants, context, env, error, history, layout, operation, position,
    text, word,
};
pub use linepad_core::{
    apply_all, notify_observers, Applied, BufferChange, BufferPosition, BufferSegment,
    CacheConfig, ChangeObserver, Command, CommandHistory, CommandKind, Config, EditOutcome,
    EditorContext, EditorError, HistoryConfig, LayoutCache, LayoutSource, LineBuffer, LineSource,
    Operation, RawLayout, Result, UnicodeWords, WordBoundary,
};
pub use linepad_view::{
    monospace, navigation, renderer, session, DrawLine, EditorSession, Frame, MonospaceLayout,
    MonospaceMeasurer, Rect, Renderer, Viewport,
};
