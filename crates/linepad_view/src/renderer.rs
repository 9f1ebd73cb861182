//! Turns buffer and layout queries into draw-ready rows.

use linepad_core::layout::{height_units, units_to_height, LayoutSource, LineStyle, TextLayout};
use linepad_core::{BufferSegment, EditorContext, LineSource, Result};
use std::ops::Range;
use std::sync::Arc;
use tracing::trace;

/// Vertical window onto the document, in content coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Scroll offset of the viewport's top edge.
    pub top: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything needed to paint one buffer line.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawLine {
    pub line: usize,
    /// 1-based gutter label.
    pub number: String,
    /// Top edge of the line box in content coordinates.
    pub top: f32,
    pub height: f32,
    pub style: Arc<LineStyle>,
    pub layout: Arc<TextLayout>,
    /// Width of the text box rows are aligned within.
    pub text_width: f32,
    /// Selected character range on this line, clamped to its length.
    pub selection: Option<(usize, usize)>,
    /// Caret column when the caret sits on this line.
    pub caret: Option<usize>,
}

impl DrawLine {
    /// Left edge of sub-line `row`, including chrome and alignment.
    pub fn row_left(&self, row: usize) -> f32 {
        row_left(&self.style, &self.layout, self.text_width, row)
    }

    /// Caret rectangle one pixel wide.
    pub fn caret_rect(&self) -> Option<Rect> {
        let character = self.caret?;
        let row = self.layout.sub_line_for_char(character);
        let sub_line = self.layout.sub_lines.get(row)?;
        Some(Rect {
            x: self.row_left(row) + sub_line.x_of(character),
            y: self.top + self.style.text_top() + sub_line.top,
            width: 1.0,
            height: sub_line.height,
        })
    }

    /// Highlight rectangles for the selected range, one per touched row.
    pub fn selection_rects(&self) -> Vec<Rect> {
        let Some((from, to)) = self.selection else {
            return Vec::new();
        };
        self.layout
            .sub_lines
            .iter()
            .enumerate()
            .filter_map(|(row, sub_line)| {
                let start = from.max(sub_line.start);
                let end = to.min(sub_line.end());
                if start > end || (start == end && sub_line.len > 0) {
                    return None;
                }
                let left = self.row_left(row);
                Some(Rect {
                    x: left + sub_line.x_of(start),
                    y: self.top + self.style.text_top() + sub_line.top,
                    width: sub_line.x_of(end) - sub_line.x_of(start),
                    height: sub_line.height,
                })
            })
            .collect()
    }
}

/// One painted frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub rows: Vec<DrawLine>,
    /// Lines intersecting the viewport, before overscan.
    pub visible: Range<usize>,
    /// Height of the whole document.
    pub total_height: f32,
}

impl Frame {
    /// Gutter width in digits for the document's largest line number.
    pub fn gutter_digits(line_count: usize) -> usize {
        line_count.max(1).to_string().len()
    }
}

/// Frame builder over any [`LayoutSource`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Renderer {
    /// Extra lines materialized above and below the viewport.
    pub overscan: usize,
}

impl Renderer {
    pub fn with_overscan(overscan: usize) -> Self {
        Self { overscan }
    }

    /// Build the rows for `viewport`.
    ///
    /// # Arguments
    /// - `lines`: Document to paint.
    /// - `layout`: Raw or cached layout provider.
    /// - `ctx`: Caret and selection to mark on the rows.
    /// - `viewport`: Visible band in content coordinates.
    ///
    /// # Returns
    /// Rows for the visible lines plus overscan, and the total content
    /// height for sizing a scrollbar.
    ///
    /// # Errors
    /// Layout errors from the provider.
    pub fn frame<S>(
        &self,
        lines: &dyn LineSource,
        layout: &mut S,
        ctx: &EditorContext,
        viewport: Viewport,
    ) -> Result<Frame>
    where
        S: LayoutSource + ?Sized,
    {
        let line_count = lines.line_count();
        let total_height = layout.line_layout_height(lines, 0, None)?;
        let visible = layout.line_layout_range(lines, viewport.top, viewport.height)?;
        let start = visible.start.saturating_sub(self.overscan);
        let end = visible.end.saturating_add(self.overscan).min(line_count);

        let mut rows = Vec::with_capacity(end - start);
        if start < end {
            let selection = ctx.selection();
            let caret = ctx.caret();
            let view_width = layout.view_width();
            let mut top = height_units(layout.line_top(lines, start)?);
            for line in start..end {
                let entry = layout.line_entry(lines, line)?;
                let len = lines.line_text(line)?.chars().count();
                rows.push(DrawLine {
                    line,
                    number: lines.line_number(line)?,
                    top: units_to_height(top),
                    height: entry.height,
                    text_width: text_width(&entry.style, &entry.layout, view_width),
                    selection: selected_range(selection, line, len),
                    caret: (caret.line == line).then_some(caret.character.min(len)),
                    style: entry.style,
                    layout: entry.layout,
                });
                top += height_units(entry.height);
            }
        }
        trace!(first = start, last = end, total_height, "built frame");
        Ok(Frame {
            rows,
            visible,
            total_height,
        })
    }
}

/// Width rows of a line are aligned within: the view width less chrome, or
/// the line's own width when not wrapping.
pub(crate) fn text_width(style: &LineStyle, layout: &TextLayout, view_width: Option<f32>) -> f32 {
    match view_width {
        Some(width) => (width - style.horizontal_chrome()).max(layout.width),
        None => layout.width,
    }
}

/// Left edge of sub-line `row` relative to the view.
pub(crate) fn row_left(style: &LineStyle, layout: &TextLayout, text_width: f32, row: usize) -> f32 {
    let width = layout
        .sub_lines
        .get(row)
        .map(|sub_line| sub_line.width())
        .unwrap_or(0.0);
    style.text_left() + style.align_offset(width, text_width)
}

fn selected_range(selection: BufferSegment, line: usize, len: usize) -> Option<(usize, usize)> {
    if selection.is_empty() {
        return None;
    }
    selection
        .contains_line(line)
        .map(|(from, to)| (from.min(len), to.min(len)))
}
