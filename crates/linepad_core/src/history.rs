//! Undo/redo controller for [`Command`]s.

use crate::buffer::LineBuffer;
use crate::command::Command;
use crate::config::HistoryConfig;
use crate::context::EditorContext;
use crate::error::{EditorError, Result};
use crate::operation::{BufferChange, Operation};
use crate::position::BufferPosition;
use crate::word::WordBoundary;
use tracing::{debug, error, warn};

/// Result of a successful execute, undo, or redo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// Where the caret was moved.
    pub position: BufferPosition,
    /// Changes to forward to observers, in application order.
    pub changes: Vec<BufferChange>,
}

/// Apply `ops` in order, all or nothing.
///
/// The inverse of each operation is captured before it runs; if a later
/// operation fails, the captured inverses are replayed newest first and the
/// original error is returned with the buffer text unchanged.
///
/// # Errors
/// The first operation error, or [`EditorError::InvariantViolation`] if the
/// rollback itself fails.
pub fn apply_all(buffer: &mut LineBuffer, ops: &[Operation]) -> Result<Vec<BufferChange>> {
    let mut rollback: Vec<Vec<Operation>> = Vec::with_capacity(ops.len());
    let mut changes = Vec::with_capacity(ops.len());
    for (index, op) in ops.iter().enumerate() {
        let step = buffer
            .inverse_of(op)
            .and_then(|inverse| buffer.apply(op).map(|applied| (inverse, applied)));
        match step {
            Ok((inverse, applied)) => {
                rollback.push(inverse);
                changes.push(applied.change);
            }
            Err(err) => {
                warn!(
                    failed_index = index,
                    op_count = ops.len(),
                    "operation failed mid-command; rolling back: {}",
                    err
                );
                for undo in rollback.iter().rev().flatten() {
                    if let Err(rollback_err) = buffer.apply(undo) {
                        error!("rollback failed: {}", rollback_err);
                        return Err(EditorError::InvariantViolation(format!(
                            "rollback of failed command failed: {rollback_err}"
                        )));
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(changes)
}

/// Command-based undo/redo stacks with bounded memory.
///
/// Executing a new command clears the redo stack.
#[derive(Debug)]
pub struct CommandHistory {
    undo: Vec<Command>,
    redo: Vec<Command>,
    undo_bytes: usize,
    max_commands: usize,
    max_bytes: usize,
    coalesce_typing: bool,
    typing_open: bool,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl CommandHistory {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            undo_bytes: 0,
            max_commands: config.max_commands.max(1),
            max_bytes: config.max_bytes,
            coalesce_typing: config.coalesce_typing,
            typing_open: false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Ends the current typing group so the next typed character starts a
    /// new command.
    pub fn close_group(&mut self) {
        self.typing_open = false;
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.undo_bytes = 0;
        self.typing_open = false;
    }

    /// Apply `command` and record it for undo.
    ///
    /// Closes any open typing group and discards the redo stack.
    ///
    /// # Arguments
    /// - `buffer`: Buffer the command was built against.
    /// - `ctx`: Caret state; moved to [`Command::end`].
    /// - `command`: Edit to apply.
    ///
    /// # Returns
    /// The caret position and the changes to forward to observers.
    ///
    /// # Errors
    /// Any operation error; the buffer is left as it was and nothing is
    /// recorded.
    pub fn execute(
        &mut self,
        buffer: &mut LineBuffer,
        ctx: &mut EditorContext,
        command: Command,
    ) -> Result<EditOutcome> {
        self.close_group();
        let changes = apply_all(buffer, command.forward())?;
        let position = command.end();
        ctx.move_to(buffer, position);
        self.redo.clear();
        self.push_undo(command);
        Ok(EditOutcome { position, changes })
    }

    /// Type one character at `position`, merging it into the open typing
    /// command when it continues the same word.
    ///
    /// # Arguments
    /// - `position`: Insertion point; clamped to the line end.
    /// - `ch`: Character to insert.
    /// - `boundary`: Decides whether `ch` continues the previous character's
    ///   word.
    ///
    /// # Errors
    /// Any operation error (for example a line terminator, which callers
    /// should route through [`Command::split_line`]).
    pub fn type_char(
        &mut self,
        buffer: &mut LineBuffer,
        ctx: &mut EditorContext,
        position: BufferPosition,
        ch: char,
        boundary: &dyn WordBoundary,
    ) -> Result<EditOutcome> {
        let command = Command::typing(buffer, position, ch)?;
        if self.coalesce_typing && self.typing_open {
            let continues = self.undo.last().is_some_and(|open| {
                open.end() == command.start()
                    && open
                        .typed_tail()
                        .is_some_and(|previous| boundary.same_word(previous, ch))
            });
            if continues {
                let changes = apply_all(buffer, command.forward())?;
                let position = command.end();
                if let Some(open) = self.undo.last_mut() {
                    self.undo_bytes = self.undo_bytes.saturating_sub(open.retained_bytes());
                    open.absorb_typing(&command);
                    self.undo_bytes = self.undo_bytes.saturating_add(open.retained_bytes());
                }
                self.redo.clear();
                ctx.move_to(buffer, position);
                self.trim_undo();
                return Ok(EditOutcome { position, changes });
            }
        }
        let outcome = self.execute(buffer, ctx, command)?;
        self.typing_open = self.coalesce_typing;
        Ok(outcome)
    }

    /// Undo the most recent command. Returns `None` when there is nothing
    /// to undo.
    ///
    /// # Errors
    /// Any operation error; the command stays on the undo stack.
    pub fn undo(
        &mut self,
        buffer: &mut LineBuffer,
        ctx: &mut EditorContext,
    ) -> Result<Option<EditOutcome>> {
        self.close_group();
        let Some(command) = self.undo.pop() else {
            return Ok(None);
        };
        let changes = match apply_all(buffer, command.inverse()) {
            Ok(changes) => changes,
            Err(err) => {
                self.undo.push(command);
                return Err(err);
            }
        };
        self.undo_bytes = self.undo_bytes.saturating_sub(command.retained_bytes());
        let position = command.start();
        ctx.move_to(buffer, position);
        debug!(kind = ?command.kind(), remaining = self.undo.len(), "undo");
        self.redo.push(command);
        Ok(Some(EditOutcome { position, changes }))
    }

    /// Redo the most recently undone command. Returns `None` when there is
    /// nothing to redo.
    ///
    /// # Errors
    /// Any operation error; the command stays on the redo stack.
    pub fn redo(
        &mut self,
        buffer: &mut LineBuffer,
        ctx: &mut EditorContext,
    ) -> Result<Option<EditOutcome>> {
        self.close_group();
        let Some(command) = self.redo.pop() else {
            return Ok(None);
        };
        let changes = match apply_all(buffer, command.forward()) {
            Ok(changes) => changes,
            Err(err) => {
                self.redo.push(command);
                return Err(err);
            }
        };
        let position = command.end();
        ctx.move_to(buffer, position);
        debug!(kind = ?command.kind(), remaining = self.redo.len(), "redo");
        self.push_undo(command);
        Ok(Some(EditOutcome { position, changes }))
    }

    fn push_undo(&mut self, command: Command) {
        self.undo_bytes = self.undo_bytes.saturating_add(command.retained_bytes());
        self.undo.push(command);
        self.trim_undo();
    }

    fn trim_undo(&mut self) {
        // The newest command always survives, however large.
        let mut dropped = 0usize;
        while self.undo.len() > 1
            && (self.undo.len() > self.max_commands || self.undo_bytes > self.max_bytes)
        {
            let removed = self.undo.remove(0);
            self.undo_bytes = self.undo_bytes.saturating_sub(removed.retained_bytes());
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, retained = self.undo.len(), "trimmed undo history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineSource;
    use crate::word::UnicodeWords;

    fn text(buffer: &LineBuffer) -> String {
        buffer.text()
    }

    fn type_str(
        history: &mut CommandHistory,
        buffer: &mut LineBuffer,
        ctx: &mut EditorContext,
        input: &str,
    ) {
        for ch in input.chars() {
            let at = ctx.caret();
            history
                .type_char(buffer, ctx, at, ch, &UnicodeWords)
                .expect("type");
        }
    }

    #[test]
    fn coalesces_typing_per_word() {
        let mut buffer = LineBuffer::from_text("");
        let mut ctx = EditorContext::default();
        let mut history = CommandHistory::default();
        type_str(&mut history, &mut buffer, &mut ctx, "hello world");
        assert_eq!(text(&buffer), "hello world");
        // "hello", " ", "world"
        assert_eq!(history.undo_len(), 3);

        history.undo(&mut buffer, &mut ctx).expect("undo");
        assert_eq!(text(&buffer), "hello ");
        assert_eq!(ctx.caret(), BufferPosition::new(0, 6));
        history.undo(&mut buffer, &mut ctx).expect("undo");
        history.undo(&mut buffer, &mut ctx).expect("undo");
        assert_eq!(text(&buffer), "");
        assert!(history.undo(&mut buffer, &mut ctx).expect("undo").is_none());
    }

    #[test]
    fn non_typing_action_closes_group() {
        let mut buffer = LineBuffer::from_text("");
        let mut ctx = EditorContext::default();
        let mut history = CommandHistory::default();
        type_str(&mut history, &mut buffer, &mut ctx, "ab");
        let split = Command::split_line(&buffer, ctx.caret()).expect("split");
        history.execute(&mut buffer, &mut ctx, split).expect("split");
        let at = ctx.caret();
        history
            .type_char(&mut buffer, &mut ctx, at, 'c', &UnicodeWords)
            .expect("type");
        assert_eq!(history.undo_len(), 3);
        assert_eq!(text(&buffer), "ab\nc");
    }

    #[test]
    fn coalescing_can_be_disabled() {
        let mut buffer = LineBuffer::from_text("");
        let mut ctx = EditorContext::default();
        let mut history = CommandHistory::new(HistoryConfig {
            coalesce_typing: false,
            ..HistoryConfig::default()
        });
        type_str(&mut history, &mut buffer, &mut ctx, "abc");
        assert_eq!(history.undo_len(), 3);
    }

    #[test]
    fn new_command_clears_redo() {
        let mut buffer = LineBuffer::from_lines(["abc", "def"]);
        let mut ctx = EditorContext::default();
        let mut history = CommandHistory::default();
        let set = Command::set_text(&buffer, 0, "ABC").expect("set");
        history.execute(&mut buffer, &mut ctx, set).expect("execute");
        history.undo(&mut buffer, &mut ctx).expect("undo");
        assert!(history.can_redo());

        let other = Command::set_text(&buffer, 1, "DEF").expect("set");
        history.execute(&mut buffer, &mut ctx, other).expect("execute");
        assert!(!history.can_redo());
        assert!(history.redo(&mut buffer, &mut ctx).expect("redo").is_none());
        assert_eq!(buffer.line_text(0).expect("line"), "abc");
    }

    #[test]
    fn failed_command_rolls_back_and_is_not_recorded() {
        let mut buffer = LineBuffer::from_lines(["one", "two"]);
        let before = buffer.text();
        let mut ctx = EditorContext::default();
        let mut history = CommandHistory::default();
        let broken = Command::new(
            crate::command::CommandKind::Custom,
            vec![
                Operation::insert_lines(0, 2),
                Operation::set_text(0, "zero"),
                Operation::delete_lines(10, 1),
            ],
            Vec::new(),
            BufferPosition::default(),
            BufferPosition::default(),
        );
        let err = history
            .execute(&mut buffer, &mut ctx, broken)
            .expect_err("must fail");
        assert!(matches!(err, EditorError::IndexOutOfRange { .. }));
        assert_eq!(buffer.text(), before);
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn trims_oldest_commands_past_limit() {
        let mut buffer = LineBuffer::from_lines(["x"]);
        let mut ctx = EditorContext::default();
        let mut history = CommandHistory::new(HistoryConfig {
            max_commands: 2,
            ..HistoryConfig::default()
        });
        for value in ["a", "b", "c"] {
            let set = Command::set_text(&buffer, 0, value).expect("set");
            history.execute(&mut buffer, &mut ctx, set).expect("execute");
        }
        assert_eq!(history.undo_len(), 2);
        history.undo(&mut buffer, &mut ctx).expect("undo");
        history.undo(&mut buffer, &mut ctx).expect("undo");
        assert_eq!(buffer.line_text(0).expect("line"), "a");
        assert!(!history.can_undo());
    }
}
