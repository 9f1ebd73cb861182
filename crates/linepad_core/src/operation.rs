//! Atomic edit descriptions applied by [`crate::LineBuffer::apply`].

use crate::position::BufferPosition;
use std::ops::Range;

/// One atomic, immutable edit against a line buffer.
///
/// Character indices count `char`s, not bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Insert `text` at `position`. Character indices past the end of the
    /// line are clamped to the line length.
    InsertText {
        position: BufferPosition,
        text: String,
    },
    /// Remove the characters in `range` from `line`.
    DeleteText { line: usize, range: Range<usize> },
    /// Replace the whole of `line` with `text`.
    SetText { line: usize, text: String },
    /// Insert `count` empty lines before `line`.
    InsertLines { line: usize, count: usize },
    /// Remove `count` lines starting at `line`.
    DeleteLines { line: usize, count: usize },
}

impl Operation {
    pub fn insert_text(position: BufferPosition, text: impl Into<String>) -> Self {
        Self::InsertText {
            position,
            text: text.into(),
        }
    }

    pub fn delete_text(line: usize, range: Range<usize>) -> Self {
        Self::DeleteText { line, range }
    }

    pub fn set_text(line: usize, text: impl Into<String>) -> Self {
        Self::SetText {
            line,
            text: text.into(),
        }
    }

    pub fn insert_lines(line: usize, count: usize) -> Self {
        Self::InsertLines { line, count }
    }

    pub fn delete_lines(line: usize, count: usize) -> Self {
        Self::DeleteLines { line, count }
    }

    /// The line this operation addresses.
    pub fn line(&self) -> usize {
        match self {
            Self::InsertText { position, .. } => position.line,
            Self::DeleteText { line, .. }
            | Self::SetText { line, .. }
            | Self::InsertLines { line, .. }
            | Self::DeleteLines { line, .. } => *line,
        }
    }

    /// Bytes of text carried by this operation, used for history budgets.
    pub fn text_bytes(&self) -> usize {
        match self {
            Self::InsertText { text, .. } | Self::SetText { text, .. } => text.len(),
            Self::DeleteText { .. } | Self::InsertLines { .. } | Self::DeleteLines { .. } => 0,
        }
    }
}

/// Change notification produced by a successful [`Operation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferChange {
    /// The text of one line changed; the line count did not.
    LineChanged { line: usize },
    /// `count` lines were inserted before `line`.
    LinesInserted { line: usize, count: usize },
    /// `count` lines starting at `line` were removed.
    LinesDeleted { line: usize, count: usize },
}

impl BufferChange {
    /// Line count delta implied by this change.
    pub fn line_delta(&self) -> isize {
        match *self {
            Self::LineChanged { .. } => 0,
            Self::LinesInserted { count, .. } => count as isize,
            Self::LinesDeleted { count, .. } => -(count as isize),
        }
    }

    /// First line index touched by this change.
    pub fn first_line(&self) -> usize {
        match *self {
            Self::LineChanged { line }
            | Self::LinesInserted { line, .. }
            | Self::LinesDeleted { line, .. } => line,
        }
    }
}

/// Receiver of buffer change notifications.
///
/// Observers only ever see change descriptions, never the buffer handle, so
/// a handler cannot re-enter the buffer it is being notified about.
pub trait ChangeObserver {
    fn on_buffer_change(&mut self, change: &BufferChange);
}

/// Deliver `changes` in order to every observer.
///
/// # Arguments
/// - `changes`: Notifications from [`crate::EditOutcome`] or
///   [`crate::Applied`], in application order.
/// - `observers`: Receivers, each seeing every change before the next change
///   is delivered.
pub fn notify_observers(changes: &[BufferChange], observers: &mut [&mut dyn ChangeObserver]) {
    for change in changes {
        for observer in observers.iter_mut() {
            observer.on_buffer_change(change);
        }
    }
}
