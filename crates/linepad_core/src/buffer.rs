//! Line-oriented text storage mutated only through [`Operation`]s.

use crate::error::{EditorError, Result};
use crate::operation::{BufferChange, Operation};
use crate::position::BufferPosition;
use crate::text::{char_len, char_to_byte, has_line_break, split_lines};
use std::ops::Range;
use tracing::trace;

/// Read-only view over an indexed sequence of lines.
///
/// Implemented by [`LineBuffer`]; layout providers take `&dyn LineSource` so
/// they never hold a borrow of the buffer between queries.
pub trait LineSource {
    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Full text of `line`, without a line terminator.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] when `line >= line_count()`.
    fn line_text(&self, line: usize) -> Result<&str>;

    /// Style name attached to `line`, `None` meaning the default style.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] when `line >= line_count()`.
    fn line_style_name(&self, line: usize) -> Result<Option<&str>>;

    /// 1-based display label for `line`.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] when `line >= line_count()`.
    fn line_number(&self, line: usize) -> Result<String> {
        let line_count = self.line_count();
        if line >= line_count {
            return Err(EditorError::out_of_range(line, line_count));
        }
        Ok((line + 1).to_string())
    }
}

/// Outcome of a successful [`LineBuffer::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    /// Position just after the edit, used to place the caret.
    pub position: BufferPosition,
    /// Notification describing what changed.
    pub change: BufferChange,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Line {
    text: String,
    style: Option<String>,
}

impl Line {
    fn plain(text: String) -> Self {
        Self { text, style: None }
    }
}

/// Authoritative, index-addressed line store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Line>,
    revision: u64,
}

impl LineBuffer {
    /// Create an empty buffer with zero lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from a text snapshot split on `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(split_lines(text))
    }

    /// Create a buffer from pre-split lines.
    ///
    /// Lines must not contain terminators; any that do are split further.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .flat_map(|line| {
                let line: String = line.into();
                if has_line_break(&line) {
                    split_lines(&line)
                } else {
                    vec![line]
                }
            })
            .map(Line::plain)
            .collect();
        Self { lines, revision: 0 }
    }

    /// Returns the current revision; bumped on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Character length of `line`.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn line_len(&self, line: usize) -> Result<usize> {
        Ok(char_len(&self.line(line)?.text))
    }

    /// Text of `line` restricted to a char range; the end is clamped.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] when `range.start > range.end`,
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn line_text_range(&self, line: usize, range: Range<usize>) -> Result<&str> {
        if range.start > range.end {
            return Err(EditorError::invalid(format!(
                "range start {} exceeds end {}",
                range.start, range.end
            )));
        }
        let text = &self.line(line)?.text;
        let start = char_to_byte(text, range.start);
        let end = char_to_byte(text, range.end);
        Ok(&text[start..end])
    }

    /// Whole-document snapshot with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Attach a style name to `line`.
    ///
    /// Style names are metadata and are not recorded in undo history. A line
    /// keeps its style through text edits, but a line that undo re-creates
    /// (after `delete_lines`, `join_lines` or a multi-line
    /// `replace_segment`) comes back with the default style.
    ///
    /// # Arguments
    /// - `line`: Line to restyle.
    /// - `style`: Theme style name, or `None` for the default style.
    ///
    /// # Returns
    /// The [`BufferChange`] to forward to layout observers.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    pub fn set_line_style_name(
        &mut self,
        line: usize,
        style: Option<&str>,
    ) -> Result<BufferChange> {
        let slot = self.line_mut(line)?;
        slot.style = style.map(str::to_string);
        self.revision = self.revision.wrapping_add(1);
        Ok(BufferChange::LineChanged { line })
    }

    /// Apply one operation.
    ///
    /// Character indices past the end of a line are clamped for
    /// `InsertText` and `DeleteText`; line indices past the end fail.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] for inverted ranges, zero counts, or
    /// text carrying a line terminator; [`EditorError::IndexOutOfRange`]
    /// when the addressed line does not exist.
    pub fn apply(&mut self, op: &Operation) -> Result<Applied> {
        let applied = match op {
            Operation::InsertText { position, text } => {
                reject_line_breaks(text)?;
                let slot = self.line_mut(position.line)?;
                let at = position.character.min(char_len(&slot.text));
                let byte = char_to_byte(&slot.text, at);
                slot.text.insert_str(byte, text);
                Applied {
                    position: BufferPosition::new(position.line, at + char_len(text)),
                    change: BufferChange::LineChanged {
                        line: position.line,
                    },
                }
            }
            Operation::DeleteText { line, range } => {
                reject_inverted(range)?;
                let slot = self.line_mut(*line)?;
                let start = char_to_byte(&slot.text, range.start);
                let end = char_to_byte(&slot.text, range.end);
                slot.text.replace_range(start..end, "");
                Applied {
                    position: BufferPosition::new(*line, range.start),
                    change: BufferChange::LineChanged { line: *line },
                }
            }
            Operation::SetText { line, text } => {
                reject_line_breaks(text)?;
                let slot = self.line_mut(*line)?;
                slot.text.clone_from(text);
                Applied {
                    position: BufferPosition::new(*line, char_len(text)),
                    change: BufferChange::LineChanged { line: *line },
                }
            }
            Operation::InsertLines { line, count } => {
                reject_zero_count(*count)?;
                if *line > self.lines.len() {
                    return Err(EditorError::out_of_range(*line, self.lines.len()));
                }
                self.lines.splice(
                    *line..*line,
                    std::iter::repeat_with(Line::default).take(*count),
                );
                Applied {
                    position: BufferPosition::line_start(line + count),
                    change: BufferChange::LinesInserted {
                        line: *line,
                        count: *count,
                    },
                }
            }
            Operation::DeleteLines { line, count } => {
                reject_zero_count(*count)?;
                let last = line.saturating_add(*count - 1);
                if last >= self.lines.len() {
                    return Err(EditorError::out_of_range(last, self.lines.len()));
                }
                self.lines.drain(*line..=last);
                Applied {
                    position: BufferPosition::line_start(*line),
                    change: BufferChange::LinesDeleted {
                        line: *line,
                        count: *count,
                    },
                }
            }
        };
        self.revision = self.revision.wrapping_add(1);
        trace!(
            target: "linepad_core::buffer",
            line = op.line(),
            ?op,
            revision = self.revision,
            line_count = self.lines.len(),
            "applied operation"
        );
        Ok(applied)
    }

    /// Operations that undo `op` when applied, in order, right after it.
    ///
    /// Computed against the current (pre-`op`) state.
    ///
    /// # Errors
    /// The same validation errors [`LineBuffer::apply`] would raise for `op`.
    pub fn inverse_of(&self, op: &Operation) -> Result<Vec<Operation>> {
        let inverse = match op {
            Operation::InsertText { position, text } => {
                let at = position.character.min(self.line_len(position.line)?);
                vec![Operation::delete_text(
                    position.line,
                    at..at + char_len(text),
                )]
            }
            Operation::DeleteText { line, range } => {
                reject_inverted(range)?;
                let len = self.line_len(*line)?;
                let start = range.start.min(len);
                let removed = self.line_text_range(*line, start..range.end.min(len))?;
                vec![Operation::insert_text(
                    BufferPosition::new(*line, start),
                    removed,
                )]
            }
            Operation::SetText { line, .. } => {
                vec![Operation::set_text(*line, &self.line(*line)?.text)]
            }
            Operation::InsertLines { line, count } => {
                reject_zero_count(*count)?;
                vec![Operation::delete_lines(*line, *count)]
            }
            Operation::DeleteLines { line, count } => {
                reject_zero_count(*count)?;
                let last = line.saturating_add(*count - 1);
                if last >= self.lines.len() {
                    return Err(EditorError::out_of_range(last, self.lines.len()));
                }
                restore_lines(*line, self.lines[*line..=last].iter().map(|l| l.text.as_str()))
            }
        };
        Ok(inverse)
    }

    fn line(&self, line: usize) -> Result<&Line> {
        self.lines
            .get(line)
            .ok_or_else(|| EditorError::out_of_range(line, self.lines.len()))
    }

    fn line_mut(&mut self, line: usize) -> Result<&mut Line> {
        let line_count = self.lines.len();
        self.lines
            .get_mut(line)
            .ok_or_else(|| EditorError::out_of_range(line, line_count))
    }
}

impl LineSource for LineBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> Result<&str> {
        Ok(self.line(line)?.text.as_str())
    }

    fn line_style_name(&self, line: usize) -> Result<Option<&str>> {
        Ok(self.line(line)?.style.as_deref())
    }
}

/// Operations re-creating `texts` as fresh lines starting at `line`.
pub(crate) fn restore_lines<'a>(
    line: usize,
    texts: impl ExactSizeIterator<Item = &'a str>,
) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(texts.len() + 1);
    ops.push(Operation::insert_lines(line, texts.len()));
    for (offset, text) in texts.enumerate() {
        if !text.is_empty() {
            ops.push(Operation::set_text(line + offset, text));
        }
    }
    ops
}

fn reject_line_breaks(text: &str) -> Result<()> {
    if has_line_break(text) {
        return Err(EditorError::invalid(
            "line text must not contain line terminators",
        ));
    }
    Ok(())
}

fn reject_inverted(range: &Range<usize>) -> Result<()> {
    if range.start > range.end {
        return Err(EditorError::invalid(format!(
            "range start {} exceeds end {}",
            range.start, range.end
        )));
    }
    Ok(())
}

fn reject_zero_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(EditorError::invalid("line count must be at least one"));
    }
    Ok(())
}
