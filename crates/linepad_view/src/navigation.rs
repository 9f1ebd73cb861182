//! Caret movement across wrapped rows, hit-testing, and scroll reveal.
//!
//! Horizontal offsets are view coordinates: chrome and alignment included.

use crate::renderer::{row_left, text_width, Viewport};
use linepad_core::layout::{LayoutSource, LineEntry};
use linepad_core::{BufferPosition, EditorContext, LineBuffer, LineSource, Result};

fn entry_row_left(entry: &LineEntry, row: usize, view_width: Option<f32>) -> f32 {
    let width = text_width(&entry.style, &entry.layout, view_width);
    row_left(&entry.style, &entry.layout, width, row)
}

/// Character on `row` nearest to `x`. Rows that wrap never yield their end
/// index, which belongs to the following row.
fn char_in_row(entry: &LineEntry, row: usize, x: f32, view_width: Option<f32>) -> usize {
    let Some(sub_line) = entry.layout.sub_lines.get(row) else {
        return 0;
    };
    let character = sub_line.char_at_x(x - entry_row_left(entry, row, view_width));
    let wraps = row + 1 < entry.layout.sub_lines.len();
    if wraps && sub_line.len > 0 && character >= sub_line.end() {
        sub_line.end() - 1
    } else {
        character
    }
}

fn caret_x(entry: &LineEntry, character: usize, view_width: Option<f32>) -> f32 {
    let row = entry.layout.sub_line_for_char(character);
    let offset = entry
        .layout
        .sub_lines
        .get(row)
        .map(|sub_line| sub_line.x_of(character))
        .unwrap_or(0.0);
    entry_row_left(entry, row, view_width) + offset
}

fn caret_vertical<S>(
    buffer: &LineBuffer,
    layout: &mut S,
    ctx: &mut EditorContext,
    select: bool,
    down: bool,
) -> Result<bool>
where
    S: LayoutSource + ?Sized,
{
    if buffer.line_count() == 0 {
        return Ok(false);
    }
    let view_width = layout.view_width();
    let caret = ctx.caret();
    let entry = layout.line_entry(buffer, caret.line)?;
    let row = entry.layout.sub_line_for_char(caret.character);
    let x = ctx
        .preferred_x()
        .unwrap_or_else(|| caret_x(&entry, caret.character, view_width));

    let target = if down {
        if row + 1 < entry.layout.sub_lines.len() {
            BufferPosition::new(caret.line, char_in_row(&entry, row + 1, x, view_width))
        } else if caret.line + 1 < buffer.line_count() {
            let next = layout.line_entry(buffer, caret.line + 1)?;
            BufferPosition::new(caret.line + 1, char_in_row(&next, 0, x, view_width))
        } else {
            BufferPosition::new(caret.line, buffer.line_len(caret.line)?)
        }
    } else if row > 0 {
        BufferPosition::new(caret.line, char_in_row(&entry, row - 1, x, view_width))
    } else if caret.line > 0 {
        let previous = layout.line_entry(buffer, caret.line - 1)?;
        let last = previous.layout.sub_lines.len().saturating_sub(1);
        BufferPosition::new(caret.line - 1, char_in_row(&previous, last, x, view_width))
    } else {
        BufferPosition::default()
    };

    let moved = target != caret;
    ctx.move_caret_vertically(buffer, target, select, x);
    Ok(moved)
}

/// Move the caret one visual row down, keeping its preferred x offset.
/// Returns whether the caret moved.
///
/// # Errors
/// Layout errors from the provider.
pub fn caret_down<S>(
    buffer: &LineBuffer,
    layout: &mut S,
    ctx: &mut EditorContext,
    select: bool,
) -> Result<bool>
where
    S: LayoutSource + ?Sized,
{
    caret_vertical(buffer, layout, ctx, select, true)
}

/// Move the caret one visual row up. See [`caret_down`].
///
/// # Errors
/// Layout errors from the provider.
pub fn caret_up<S>(
    buffer: &LineBuffer,
    layout: &mut S,
    ctx: &mut EditorContext,
    select: bool,
) -> Result<bool>
where
    S: LayoutSource + ?Sized,
{
    caret_vertical(buffer, layout, ctx, select, false)
}

/// Buffer position under the content-space point `(x, y)`.
///
/// Points above the content land on the first line and points below it on
/// the last; `x` snaps to the nearest caret stop of the row under `y`.
///
/// # Arguments
/// - `lines`: Document being displayed.
/// - `layout`: Layout provider the frame was painted from.
/// - `x`, `y`: Point in content coordinates.
///
/// # Returns
/// The nearest caret position, or the origin for an empty document.
///
/// # Errors
/// Layout errors from the provider.
pub fn hit_test<S>(lines: &dyn LineSource, layout: &mut S, x: f32, y: f32) -> Result<BufferPosition>
where
    S: LayoutSource + ?Sized,
{
    if lines.line_count() == 0 {
        return Ok(BufferPosition::default());
    }
    let line = layout.line_at_offset(lines, y)?;
    let top = layout.line_top(lines, line)?;
    let entry = layout.line_entry(lines, line)?;
    let row = entry.layout.sub_line_at_y(y - top - entry.style.text_top());
    let character = char_in_row(&entry, row, x, layout.view_width());
    Ok(BufferPosition::new(line, character))
}

/// Scroll offset that brings the row holding `position` fully into view,
/// moving as little as possible.
///
/// # Errors
/// Layout errors from the provider.
pub fn reveal_offset<S>(
    lines: &dyn LineSource,
    layout: &mut S,
    position: BufferPosition,
    viewport: Viewport,
) -> Result<f32>
where
    S: LayoutSource + ?Sized,
{
    let line_count = lines.line_count();
    if line_count == 0 {
        return Ok(0.0);
    }
    let line = position.line.min(line_count - 1);
    let top = layout.line_top(lines, line)?;
    let entry = layout.line_entry(lines, line)?;
    let row = entry.layout.sub_line_for_char(position.character);
    let (row_top, row_height) = entry
        .layout
        .sub_lines
        .get(row)
        .map(|sub_line| (sub_line.top, sub_line.height))
        .unwrap_or((0.0, entry.height));
    let caret_top = top + entry.style.text_top() + row_top;
    let caret_bottom = caret_top + row_height;
    Ok(if caret_top < viewport.top {
        caret_top
    } else if caret_bottom > viewport.bottom() {
        (caret_bottom - viewport.height).max(0.0)
    } else {
        viewport.top
    })
}

/// Consume the context's pending reveal request, if any, and return the
/// scroll offset satisfying it.
///
/// # Errors
/// Layout errors from the provider.
pub fn scroll_to_reveal<S>(
    lines: &dyn LineSource,
    layout: &mut S,
    ctx: &mut EditorContext,
    viewport: Viewport,
) -> Result<Option<f32>>
where
    S: LayoutSource + ?Sized,
{
    match ctx.take_reveal() {
        Some(position) => reveal_offset(lines, layout, position, viewport).map(Some),
        None => Ok(None),
    }
}
