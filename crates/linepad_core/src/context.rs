//! Caret, selection, and scroll-request state owned by the host.

use crate::buffer::LineBuffer;
use crate::position::{BufferPosition, BufferSegment};

/// Mutable editor interaction state independent of rendering.
///
/// The host owns one of these per view and passes it into the history
/// controller, which moves the caret after every edit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorContext {
    selection: BufferSegment,
    preferred_x: Option<f32>,
    reveal: Option<BufferPosition>,
}

impl EditorContext {
    /// Returns the caret, which is the tail of the selection.
    pub fn caret(&self) -> BufferPosition {
        self.selection.tail
    }

    pub fn selection(&self) -> BufferSegment {
        self.selection
    }

    /// Returns the preferred horizontal offset for vertical movement.
    pub fn preferred_x(&self) -> Option<f32> {
        self.preferred_x
    }

    pub fn set_preferred_x(&mut self, x: f32) {
        self.preferred_x = Some(x);
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Moves the caret to `position` (clamped to the buffer), collapsing any
    /// selection and asking the view to bring the caret into sight.
    pub fn move_to(&mut self, buffer: &LineBuffer, position: BufferPosition) {
        let position = clamp_position(buffer, position);
        self.selection = BufferSegment::collapsed(position);
        self.preferred_x = None;
        self.reveal = Some(position);
    }

    /// Moves the caret, extending the selection from its anchor when
    /// `select` is set.
    pub fn move_caret(&mut self, buffer: &LineBuffer, position: BufferPosition, select: bool) {
        let position = clamp_position(buffer, position);
        if select {
            self.selection.extend_to(position);
        } else {
            self.selection = BufferSegment::collapsed(position);
        }
        self.preferred_x = None;
        self.reveal = Some(position);
    }

    /// Same as [`EditorContext::move_caret`] but keeps the preferred x offset
    /// for consecutive vertical moves.
    pub fn move_caret_vertically(
        &mut self,
        buffer: &LineBuffer,
        position: BufferPosition,
        select: bool,
        preferred_x: f32,
    ) {
        self.move_caret(buffer, position, select);
        self.preferred_x = Some(preferred_x);
    }

    /// Selects the entire buffer.
    pub fn select_all(&mut self, buffer: &LineBuffer) {
        let end = match buffer.line_count() {
            0 => BufferPosition::default(),
            count => BufferPosition::new(count - 1, buffer.line_len(count - 1).unwrap_or(0)),
        };
        self.selection = BufferSegment::new(BufferPosition::default(), end);
        self.preferred_x = None;
    }

    /// Clears active selection, keeping the caret in place.
    pub fn clear_selection(&mut self) {
        self.selection = BufferSegment::collapsed(self.caret());
    }

    /// Takes the pending request to scroll the caret into view.
    pub fn take_reveal(&mut self) -> Option<BufferPosition> {
        self.reveal.take()
    }

    /// Re-clamps caret and anchor after an external change to the buffer.
    pub fn clamp_to(&mut self, buffer: &LineBuffer) {
        self.selection = BufferSegment::new(
            clamp_position(buffer, self.selection.anchor),
            clamp_position(buffer, self.selection.tail),
        );
        self.preferred_x = None;
    }
}

/// Clamp `position` to an existing line and character.
pub fn clamp_position(buffer: &LineBuffer, position: BufferPosition) -> BufferPosition {
    let line_count = buffer.line_count();
    if line_count == 0 {
        return BufferPosition::default();
    }
    let line = position.line.min(line_count - 1);
    let len = buffer.line_len(line).unwrap_or(0);
    BufferPosition::new(line, position.character.min(len))
}
