//! View-side companions for the linepad editing core: a reference monospace
//! measurer, a frame builder, caret navigation over wrapped rows, and an
//! editor session tying them together.

/// Fixed-advance text measurement.
pub mod monospace;
/// Caret movement, hit-testing, and scroll reveal.
pub mod navigation;
/// Frame building from layout queries.
pub mod renderer;
/// Buffer, history, caret and layout bundled for hosts.
pub mod session;

pub use monospace::MonospaceMeasurer;
pub use renderer::{DrawLine, Frame, Rect, Renderer, Viewport};
pub use session::{EditorSession, MonospaceLayout};
