//! Undoable edit units built from [`Operation`]s.
//!
//! Every constructor reads the buffer once, up front, and records both the
//! forward operations and the inverse operations that restore the prior
//! state. The inverse list is stored in replay order: line indices shift
//! while a multi-line edit is undone, so the order is part of the contract.

use crate::buffer::{restore_lines, LineBuffer, LineSource};
use crate::error::{EditorError, Result};
use crate::operation::Operation;
use crate::position::{BufferPosition, BufferSegment};
use crate::text::{char_len, has_line_break, split_lines};

/// What kind of user-visible edit a [`Command`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// A single typed character; eligible for word-level coalescing.
    Typing,
    InsertText,
    DeleteText,
    SetText,
    InsertLines,
    DeleteLines,
    SplitLine,
    JoinLines,
    Replace,
    /// Host-assembled command.
    Custom,
}

/// A grouped, undoable edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    forward: Vec<Operation>,
    inverse: Vec<Operation>,
    start: BufferPosition,
    end: BufferPosition,
}

impl Command {
    /// Assemble a command from explicit operation lists.
    ///
    /// `inverse` must restore the state `forward` started from when replayed
    /// in order right after `forward`.
    pub fn new(
        kind: CommandKind,
        forward: Vec<Operation>,
        inverse: Vec<Operation>,
        start: BufferPosition,
        end: BufferPosition,
    ) -> Self {
        Self {
            kind,
            forward,
            inverse,
            start,
            end,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn forward(&self) -> &[Operation] {
        &self.forward
    }

    pub fn inverse(&self) -> &[Operation] {
        &self.inverse
    }

    /// Caret position before the edit; undo returns here.
    pub fn start(&self) -> BufferPosition {
        self.start
    }

    /// Caret position after the edit; execute and redo move here.
    pub fn end(&self) -> BufferPosition {
        self.end
    }

    /// Text bytes retained by this command.
    pub fn retained_bytes(&self) -> usize {
        self.forward
            .iter()
            .chain(self.inverse.iter())
            .map(Operation::text_bytes)
            .sum()
    }

    /// Insert single-line `text` at `position` (clamped to the line end).
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] when `text` spans lines,
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn insert_text(buffer: &LineBuffer, position: BufferPosition, text: &str) -> Result<Self> {
        if has_line_break(text) {
            return Err(EditorError::invalid(
                "use replace_segment to insert multi-line text",
            ));
        }
        let at = position.character.min(buffer.line_len(position.line)?);
        let inserted = char_len(text);
        Ok(Self::new(
            CommandKind::InsertText,
            vec![Operation::insert_text(
                BufferPosition::new(position.line, at),
                text,
            )],
            vec![Operation::delete_text(position.line, at..at + inserted)],
            BufferPosition::new(position.line, at),
            BufferPosition::new(position.line, at + inserted),
        ))
    }

    /// A single typed character at `position`.
    ///
    /// # Errors
    /// As [`Command::insert_text`].
    pub fn typing(buffer: &LineBuffer, position: BufferPosition, ch: char) -> Result<Self> {
        let mut command = Self::insert_text(buffer, position, ch.encode_utf8(&mut [0; 4]))?;
        command.kind = CommandKind::Typing;
        Ok(command)
    }

    /// Remove `range` from `line`; the range end is clamped to the line.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] for an inverted range,
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn delete_text(
        buffer: &LineBuffer,
        line: usize,
        range: std::ops::Range<usize>,
    ) -> Result<Self> {
        if range.start > range.end {
            return Err(EditorError::invalid(format!(
                "range start {} exceeds end {}",
                range.start, range.end
            )));
        }
        let len = buffer.line_len(line)?;
        let start = range.start.min(len);
        let end = range.end.min(len);
        let removed = buffer.line_text_range(line, start..end)?;
        Ok(Self::new(
            CommandKind::DeleteText,
            vec![Operation::delete_text(line, range.clone())],
            vec![Operation::insert_text(
                BufferPosition::new(line, start),
                removed,
            )],
            BufferPosition::new(line, end),
            BufferPosition::new(line, range.start),
        ))
    }

    /// Replace the whole of `line`.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] when `text` spans lines,
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn set_text(buffer: &LineBuffer, line: usize, text: &str) -> Result<Self> {
        if has_line_break(text) {
            return Err(EditorError::invalid(
                "line text must not contain line terminators",
            ));
        }
        let previous = buffer.line_text(line)?;
        Ok(Self::new(
            CommandKind::SetText,
            vec![Operation::set_text(line, text)],
            vec![Operation::set_text(line, previous)],
            BufferPosition::new(line, char_len(previous)),
            BufferPosition::new(line, char_len(text)),
        ))
    }

    /// Insert `count` empty lines before `line`.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] for a zero count,
    /// [`EditorError::IndexOutOfRange`] when `line > line_count`.
    pub fn insert_lines(buffer: &LineBuffer, line: usize, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(EditorError::invalid("line count must be at least one"));
        }
        if line > buffer.line_count() {
            return Err(EditorError::out_of_range(line, buffer.line_count()));
        }
        Ok(Self::new(
            CommandKind::InsertLines,
            vec![Operation::insert_lines(line, count)],
            vec![Operation::delete_lines(line, count)],
            BufferPosition::line_start(line),
            BufferPosition::line_start(line + count),
        ))
    }

    /// Remove `count` lines starting at `line`.
    ///
    /// # Errors
    /// As [`LineBuffer::apply`] for `DeleteLines`.
    pub fn delete_lines(buffer: &LineBuffer, line: usize, count: usize) -> Result<Self> {
        let forward = Operation::delete_lines(line, count);
        let inverse = buffer.inverse_of(&forward)?;
        Ok(Self::new(
            CommandKind::DeleteLines,
            vec![forward],
            inverse,
            BufferPosition::line_start(line),
            BufferPosition::line_start(line),
        ))
    }

    /// Break `position.line` in two at `position.character`.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn split_line(buffer: &LineBuffer, position: BufferPosition) -> Result<Self> {
        let line = position.line;
        let original = buffer.line_text(line)?;
        let len = char_len(original);
        let at = position.character.min(len);
        let tail = buffer.line_text_range(line, at..len)?;

        let mut forward = vec![Operation::insert_lines(line + 1, 1)];
        if !tail.is_empty() {
            forward.push(Operation::set_text(line + 1, tail));
            forward.push(Operation::delete_text(line, at..len));
        }
        Ok(Self::new(
            CommandKind::SplitLine,
            forward,
            vec![
                Operation::delete_lines(line + 1, 1),
                Operation::set_text(line, original),
            ],
            BufferPosition::new(line, at),
            BufferPosition::line_start(line + 1),
        ))
    }

    /// Append line `line + 1` to `line` and remove it.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] when `line` is the last line.
    pub fn join_lines(buffer: &LineBuffer, line: usize) -> Result<Self> {
        let head = buffer.line_text(line)?;
        let tail = buffer.line_text(line + 1)?;
        let joined = format!("{head}{tail}");

        let mut inverse = vec![Operation::insert_lines(line + 1, 1)];
        if !tail.is_empty() {
            inverse.push(Operation::set_text(line + 1, tail));
        }
        inverse.push(Operation::set_text(line, head));
        Ok(Self::new(
            CommandKind::JoinLines,
            vec![
                Operation::set_text(line, joined),
                Operation::delete_lines(line + 1, 1),
            ],
            inverse,
            BufferPosition::line_start(line + 1),
            BufferPosition::new(line, char_len(head)),
        ))
    }

    /// Replace the text covered by `segment` with `text`, which may span
    /// lines. Character indices are clamped to their line lengths.
    ///
    /// Covers typing over a selection, cutting, and pasting.
    ///
    /// # Arguments
    /// - `buffer`: Current buffer state, read for the inverse.
    /// - `segment`: Range to replace; may be empty.
    /// - `text`: Replacement, split on `\n` into lines.
    ///
    /// # Returns
    /// A [`CommandKind::Replace`] command whose `end` sits after the inserted
    /// text.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] when either end of the segment sits
    /// on a missing line.
    pub fn replace_segment(buffer: &LineBuffer, segment: BufferSegment, text: &str) -> Result<Self> {
        let start = segment.start();
        let end = segment.end();
        let first_text = buffer.line_text(start.line)?;
        let last_len = buffer.line_len(end.line)?;
        let start_char = start.character.min(char_len(first_text));
        let end_char = end.character.min(last_len);
        let prefix = buffer.line_text_range(start.line, 0..start_char)?;
        let suffix = buffer.line_text_range(end.line, end_char..last_len)?;

        let pieces = split_lines(text);
        let removed_lines = end.line - start.line;
        let added_lines = pieces.len() - 1;

        let mut new_lines: Vec<String> = pieces;
        new_lines[0].insert_str(0, prefix);
        let caret_char = char_len(&new_lines[added_lines]);
        new_lines[added_lines].push_str(suffix);

        let mut forward = Vec::new();
        if removed_lines > 0 {
            forward.push(Operation::delete_lines(start.line + 1, removed_lines));
        }
        forward.push(Operation::set_text(start.line, new_lines[0].as_str()));
        if added_lines > 0 {
            forward.push(Operation::insert_lines(start.line + 1, added_lines));
            for (offset, line_text) in new_lines.iter().enumerate().skip(1) {
                if !line_text.is_empty() {
                    forward.push(Operation::set_text(start.line + offset, line_text.as_str()));
                }
            }
        }

        let mut inverse = Vec::new();
        if added_lines > 0 {
            inverse.push(Operation::delete_lines(start.line + 1, added_lines));
        }
        inverse.push(Operation::set_text(start.line, first_text));
        if removed_lines > 0 {
            let originals = (start.line + 1..=end.line)
                .map(|line| buffer.line_text(line))
                .collect::<Result<Vec<_>>>()?;
            inverse.extend(restore_lines(start.line + 1, originals.into_iter()));
        }

        Ok(Self::new(
            CommandKind::Replace,
            forward,
            inverse,
            BufferPosition::new(end.line, end_char),
            BufferPosition::new(start.line + added_lines, caret_char),
        ))
    }

    /// Last character typed into a typing command.
    pub(crate) fn typed_tail(&self) -> Option<char> {
        match (self.kind, self.forward.as_slice()) {
            (CommandKind::Typing, [Operation::InsertText { text, .. }]) => text.chars().last(),
            _ => None,
        }
    }

    /// Extend this typing command with `next`, which must continue exactly
    /// where this one ends. Returns `false` and leaves both untouched when
    /// the two cannot be merged.
    pub(crate) fn absorb_typing(&mut self, next: &Command) -> bool {
        if self.kind != CommandKind::Typing || next.kind != CommandKind::Typing {
            return false;
        }
        if next.start != self.end {
            return false;
        }
        let (
            [Operation::InsertText { text, .. }],
            [Operation::DeleteText { range, .. }],
            [Operation::InsertText { text: next_text, .. }],
        ) = (
            self.forward.as_mut_slice(),
            self.inverse.as_mut_slice(),
            next.forward.as_slice(),
        )
        else {
            return false;
        };
        text.push_str(next_text);
        range.end += char_len(next_text);
        self.end = next.end;
        true
    }
}
