//! A ready-to-drive editor: buffer, history, caret state and layout in one
//! place, with every buffer change forwarded to the layout provider.

use crate::monospace::MonospaceMeasurer;
use crate::navigation;
use crate::renderer::{Frame, Renderer, Viewport};
use linepad_core::layout::{LayoutCache, LayoutSource, RawLayout, Theme};
use linepad_core::{
    notify_observers, BufferChange, BufferPosition, Command, CommandHistory, Config,
    EditOutcome, EditorContext, HistoryConfig, LineBuffer, Result, UnicodeWords,
    WordBoundary,
};
use tracing::debug;

/// Cached monospace layout used by [`EditorSession::monospace`].
pub type MonospaceLayout = LayoutCache<RawLayout<MonospaceMeasurer, Theme>>;

pub struct EditorSession<S> {
    buffer: LineBuffer,
    history: CommandHistory,
    ctx: EditorContext,
    layout: S,
    boundary: Box<dyn WordBoundary>,
}

impl<S: LayoutSource> EditorSession<S> {
    pub fn new(buffer: LineBuffer, layout: S, history: HistoryConfig) -> Self {
        Self {
            buffer,
            history: CommandHistory::new(history),
            ctx: EditorContext::default(),
            layout,
            boundary: Box::new(UnicodeWords),
        }
    }

    /// Replace the word-boundary policy used to coalesce typing.
    pub fn with_word_boundary(mut self, boundary: impl WordBoundary + 'static) -> Self {
        self.boundary = Box::new(boundary);
        self
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn layout(&self) -> &S {
        &self.layout
    }

    pub fn caret(&self) -> BufferPosition {
        self.ctx.caret()
    }

    fn forward(&mut self, changes: &[BufferChange]) {
        notify_observers(changes, &mut [&mut self.layout]);
    }

    /// Execute an arbitrary command through the history.
    ///
    /// # Errors
    /// Any operation error; nothing is applied or recorded on failure.
    pub fn execute(&mut self, command: Command) -> Result<EditOutcome> {
        let outcome = self.history.execute(&mut self.buffer, &mut self.ctx, command)?;
        self.forward(&outcome.changes);
        Ok(outcome)
    }

    /// Replace the selection (or insert at the caret) with `text`, which may
    /// span lines.
    ///
    /// # Errors
    /// Any operation error.
    pub fn insert_text(&mut self, text: &str) -> Result<EditOutcome> {
        self.ensure_line()?;
        let command = Command::replace_segment(&self.buffer, self.ctx.selection(), text)?;
        self.execute(command)
    }

    /// Type one character. Consecutive characters of a word undo together.
    ///
    /// # Errors
    /// Any operation error.
    pub fn type_char(&mut self, ch: char) -> Result<EditOutcome> {
        if ch == '\n' || ch == '\r' {
            return self.newline();
        }
        if self.ctx.has_selection() {
            return self.insert_text(ch.encode_utf8(&mut [0; 4]));
        }
        self.ensure_line()?;
        let caret = self.ctx.caret();
        let outcome = self.history.type_char(
            &mut self.buffer,
            &mut self.ctx,
            caret,
            ch,
            self.boundary.as_ref(),
        )?;
        self.forward(&outcome.changes);
        Ok(outcome)
    }

    /// Break the line at the caret, replacing any selection.
    ///
    /// # Errors
    /// Any operation error.
    pub fn newline(&mut self) -> Result<EditOutcome> {
        if self.ctx.has_selection() {
            return self.insert_text("\n");
        }
        self.ensure_line()?;
        let command = Command::split_line(&self.buffer, self.ctx.caret())?;
        self.execute(command)
    }

    /// Delete the selection or the character before the caret, joining with
    /// the previous line at column zero. Returns `None` at the document start.
    ///
    /// # Errors
    /// Any operation error.
    pub fn backspace(&mut self) -> Result<Option<EditOutcome>> {
        if self.ctx.has_selection() {
            return self.insert_text("").map(Some);
        }
        let caret = self.ctx.caret();
        let command = if caret.character > 0 {
            Command::delete_text(&self.buffer, caret.line, caret.character - 1..caret.character)?
        } else if caret.line > 0 {
            Command::join_lines(&self.buffer, caret.line - 1)?
        } else {
            return Ok(None);
        };
        self.execute(command).map(Some)
    }

    /// Delete the selection or the character after the caret, joining the
    /// next line at the line end. Returns `None` at the document end.
    ///
    /// # Errors
    /// Any operation error.
    pub fn delete_forward(&mut self) -> Result<Option<EditOutcome>> {
        if self.ctx.has_selection() {
            return self.insert_text("").map(Some);
        }
        if self.buffer.line_count() == 0 {
            return Ok(None);
        }
        let caret = self.ctx.caret();
        let len = self.buffer.line_len(caret.line)?;
        let command = if caret.character < len {
            Command::delete_text(&self.buffer, caret.line, caret.character..caret.character + 1)?
        } else if caret.line + 1 < self.buffer.line_count() {
            Command::join_lines(&self.buffer, caret.line)?
        } else {
            return Ok(None);
        };
        let mut outcome = self.execute(command)?;
        // Forward deletion keeps the caret where it was.
        self.ctx.move_to(&self.buffer, caret);
        outcome.position = self.ctx.caret();
        Ok(Some(outcome))
    }

    /// Undo the last command. Returns whether anything was undone.
    ///
    /// # Errors
    /// Any operation error; the history is left intact.
    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo(&mut self.buffer, &mut self.ctx)? {
            Some(outcome) => {
                self.forward(&outcome.changes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Redo the last undone command. Returns whether anything was redone.
    ///
    /// # Errors
    /// Any operation error; the history is left intact.
    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo(&mut self.buffer, &mut self.ctx)? {
            Some(outcome) => {
                self.forward(&outcome.changes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace the whole document, e.g. after the file changed on disk.
    ///
    /// History is dropped, the caret and selection are clamped into the new
    /// text, and the layout sees the old lines removed and the new ones
    /// inserted.
    ///
    /// # Arguments
    /// - `buffer`: Replacement document.
    pub fn reload(&mut self, buffer: LineBuffer) {
        let removed = self.buffer.line_count();
        let added = buffer.line_count();
        self.buffer = buffer;
        self.history.clear();
        self.ctx.clamp_to(&self.buffer);
        let mut changes = Vec::with_capacity(2);
        if removed > 0 {
            changes.push(BufferChange::LinesDeleted {
                line: 0,
                count: removed,
            });
        }
        if added > 0 {
            changes.push(BufferChange::LinesInserted {
                line: 0,
                count: added,
            });
        }
        self.forward(&changes);
        debug!(removed, added, "reloaded document");
    }

    /// Attach a style name to `line`. Not undoable.
    ///
    /// # Errors
    /// [`linepad_core::EditorError::IndexOutOfRange`] for a missing line.
    pub fn set_line_style(&mut self, line: usize, style: Option<&str>) -> Result<()> {
        let change = self.buffer.set_line_style_name(line, style)?;
        self.forward(&[change]);
        Ok(())
    }

    pub fn move_caret(&mut self, position: BufferPosition, select: bool) {
        self.history.close_group();
        self.ctx.move_caret(&self.buffer, position, select);
    }

    /// Move one character left, crossing to the previous line end.
    pub fn move_left(&mut self, select: bool) {
        let selection = self.ctx.selection();
        if !select && !selection.is_empty() {
            self.move_caret(selection.start(), false);
            return;
        }
        let caret = self.ctx.caret();
        let target = if caret.character > 0 {
            BufferPosition::new(caret.line, caret.character - 1)
        } else if caret.line > 0 {
            let len = self.buffer.line_len(caret.line - 1).unwrap_or(0);
            BufferPosition::new(caret.line - 1, len)
        } else {
            caret
        };
        self.move_caret(target, select);
    }

    /// Move one character right, crossing to the next line start.
    pub fn move_right(&mut self, select: bool) {
        let selection = self.ctx.selection();
        if !select && !selection.is_empty() {
            self.move_caret(selection.end(), false);
            return;
        }
        let caret = self.ctx.caret();
        let len = self.buffer.line_len(caret.line).unwrap_or(0);
        let target = if caret.character < len {
            BufferPosition::new(caret.line, caret.character + 1)
        } else if caret.line + 1 < self.buffer.line_count() {
            BufferPosition::line_start(caret.line + 1)
        } else {
            caret
        };
        self.move_caret(target, select);
    }

    /// # Errors
    /// Layout errors from the provider.
    pub fn move_up(&mut self, select: bool) -> Result<bool> {
        self.history.close_group();
        navigation::caret_up(&self.buffer, &mut self.layout, &mut self.ctx, select)
    }

    /// # Errors
    /// Layout errors from the provider.
    pub fn move_down(&mut self, select: bool) -> Result<bool> {
        self.history.close_group();
        navigation::caret_down(&self.buffer, &mut self.layout, &mut self.ctx, select)
    }

    pub fn select_all(&mut self) {
        self.history.close_group();
        self.ctx.select_all(&self.buffer);
    }

    /// Place the caret under a content-space point.
    ///
    /// # Errors
    /// Layout errors from the provider.
    pub fn click(&mut self, x: f32, y: f32, select: bool) -> Result<BufferPosition> {
        let position = navigation::hit_test(&self.buffer, &mut self.layout, x, y)?;
        self.move_caret(position, select);
        Ok(self.ctx.caret())
    }

    pub fn set_view_width(&mut self, width: Option<f32>) {
        self.layout.set_view_width(width);
    }

    /// # Errors
    /// Layout errors from the provider.
    pub fn frame(&mut self, renderer: &Renderer, viewport: Viewport) -> Result<Frame> {
        renderer.frame(&self.buffer, &mut self.layout, &self.ctx, viewport)
    }

    /// Scroll offset answering a pending reveal request.
    ///
    /// # Errors
    /// Layout errors from the provider.
    pub fn reveal(&mut self, viewport: Viewport) -> Result<Option<f32>> {
        navigation::scroll_to_reveal(&self.buffer, &mut self.layout, &mut self.ctx, viewport)
    }

    /// # Errors
    /// Layout errors from the provider.
    pub fn content_height(&mut self) -> Result<f32> {
        self.layout.line_layout_height(&self.buffer, 0, None)
    }

    /// A buffer with no lines gains an empty one before text input.
    fn ensure_line(&mut self) -> Result<()> {
        if self.buffer.line_count() > 0 {
            return Ok(());
        }
        debug!("inserting first line into empty buffer");
        let command = Command::insert_lines(&self.buffer, 0, 1)?;
        self.execute(command)?;
        Ok(())
    }
}

impl EditorSession<MonospaceLayout> {
    /// Session over a cached monospace layout configured from `config`.
    ///
    /// # Errors
    /// [`linepad_core::EditorError::InvalidArgument`] for an invalid cache
    /// configuration.
    pub fn monospace(
        buffer: LineBuffer,
        theme: Theme,
        config: &Config,
        view_width: Option<f32>,
    ) -> Result<Self> {
        let raw = RawLayout::new(MonospaceMeasurer::default(), theme).with_view_width(view_width);
        let layout = LayoutCache::new(raw, config.cache)?;
        Ok(Self::new(buffer, layout, config.history))
    }

    /// Swap the theme and drop every cached measurement.
    pub fn set_theme(&mut self, theme: Theme) {
        self.layout.inner_mut().set_theme(theme);
        self.layout.invalidate_all();
    }
}
