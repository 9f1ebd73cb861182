//! Shaped line layouts and the text measurement collaborator.

use super::style::LineStyle;

/// One wrapped row of a measured line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubLine {
    /// First character index of the row within the line.
    pub start: usize,
    /// Number of characters on the row.
    pub len: usize,
    /// Offset of the row from the top of the text box.
    pub top: f32,
    pub height: f32,
    /// Caret stops: x offset before each character of the row plus one after
    /// the last, so `stops.len() == len + 1`.
    pub stops: Vec<f32>,
}

impl SubLine {
    /// Rendered width of the row.
    pub fn width(&self) -> f32 {
        self.stops.last().copied().unwrap_or(0.0)
    }

    /// One past the last character index on the row.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// X offset of the caret before `character` (clamped to the row).
    pub fn x_of(&self, character: usize) -> f32 {
        let offset = character.saturating_sub(self.start).min(self.len);
        self.stops.get(offset).copied().unwrap_or(0.0)
    }

    /// Character index whose caret stop is nearest to `x`.
    pub fn char_at_x(&self, x: f32) -> usize {
        let mut best = 0usize;
        let mut best_distance = f32::INFINITY;
        for (offset, stop) in self.stops.iter().enumerate() {
            let distance = (stop - x).abs();
            if distance < best_distance {
                best = offset;
                best_distance = distance;
            }
        }
        self.start + best
    }
}

/// Measured representation of one line, cached verbatim by the layout cache.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub width: f32,
    pub height: f32,
    /// Wrapped rows; never empty for a layout produced by a measurer.
    pub sub_lines: Vec<SubLine>,
}

impl TextLayout {
    /// Index of the row holding the caret before `character`.
    ///
    /// A caret sitting exactly on a wrap point belongs to the later row.
    pub fn sub_line_for_char(&self, character: usize) -> usize {
        let last = self.sub_lines.len().saturating_sub(1);
        self.sub_lines
            .iter()
            .position(|row| character < row.end())
            .unwrap_or(last)
            .min(last)
    }

    /// Index of the row covering vertical offset `y` (clamped).
    pub fn sub_line_at_y(&self, y: f32) -> usize {
        let last = self.sub_lines.len().saturating_sub(1);
        self.sub_lines
            .iter()
            .position(|row| y < row.top + row.height)
            .unwrap_or(last)
    }
}

/// Text measurement collaborator.
pub trait TextMeasurer {
    /// Lay `text` out with `style`, wrapping at `wrap_width` when given.
    fn measure(&self, text: &str, style: &LineStyle, wrap_width: Option<f32>) -> TextLayout;
}
