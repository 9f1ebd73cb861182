//! Reference text measurer for fixed-advance fonts.

use linepad_core::layout::{LineStyle, SubLine, TextLayout, TextMeasurer};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const DEFAULT_TAB_WIDTH: usize = 4;

/// Measures text in display columns of `style.font.advance` pixels.
///
/// Wrapping happens between grapheme clusters, so a combining sequence or a
/// wide CJK character is never split across rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonospaceMeasurer {
    tab_width: usize,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl MonospaceMeasurer {
    /// Measurer expanding tabs to `tab_width` columns.
    ///
    /// # Arguments
    /// - `tab_width`: Columns per tab; clamped to at least one.
    pub fn with_tab_width(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
        }
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Display columns taken by one grapheme cluster.
    pub fn grapheme_columns(&self, grapheme: &str) -> usize {
        if grapheme == "\t" {
            return self.tab_width;
        }
        if grapheme.is_ascii() {
            return grapheme.len();
        }
        // Control and zero-width clusters still take a caret stop.
        UnicodeWidthStr::width(grapheme).max(1)
    }

    /// Total display columns of `text` on one row.
    pub fn columns(&self, text: &str) -> usize {
        if text.is_ascii() && !text.contains('\t') {
            return text.len();
        }
        text.graphemes(true)
            .map(|grapheme| self.grapheme_columns(grapheme))
            .sum()
    }
}

struct RowBuilder {
    start: usize,
    len: usize,
    columns: usize,
    stops: Vec<f32>,
}

impl RowBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            len: 0,
            columns: 0,
            stops: vec![0.0],
        }
    }

    fn finish(self, index: usize, row_height: f32) -> SubLine {
        SubLine {
            start: self.start,
            len: self.len,
            top: index as f32 * row_height,
            height: row_height,
            stops: self.stops,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, style: &LineStyle, wrap_width: Option<f32>) -> TextLayout {
        let advance = style.font.advance;
        let row_height = style.font.line_height;
        let limit = wrap_width.map(|width| ((width / advance.max(1.0)).floor() as usize).max(1));

        let mut sub_lines = Vec::new();
        let mut row = RowBuilder::new(0);
        for grapheme in text.graphemes(true) {
            let columns = self.grapheme_columns(grapheme);
            if let Some(limit) = limit {
                if row.columns > 0 && row.columns + columns > limit {
                    let next = RowBuilder::new(row.start + row.len);
                    sub_lines.push(std::mem::replace(&mut row, next).finish(sub_lines.len(), row_height));
                }
            }
            let x = row.columns as f32 * advance;
            let chars = grapheme.chars().count();
            // Carets inside a cluster collapse onto its leading edge.
            row.stops.extend(std::iter::repeat(x).take(chars - 1));
            row.columns += columns;
            row.stops.push(row.columns as f32 * advance);
            row.len += chars;
        }
        sub_lines.push(row.finish(sub_lines.len(), row_height));

        let width = sub_lines.iter().map(SubLine::width).fold(0.0, f32::max);
        TextLayout {
            width,
            height: sub_lines.len() as f32 * row_height,
            sub_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> LineStyle {
        LineStyle::default()
    }

    #[test]
    fn unwrapped_line_is_one_row() {
        let layout = MonospaceMeasurer::default().measure("hello", &style(), None);
        assert_eq!(layout.sub_lines.len(), 1);
        assert_eq!(layout.width, 40.0);
        assert_eq!(layout.height, 16.0);
        assert_eq!(layout.sub_lines[0].stops.len(), 6);
    }

    #[test]
    fn empty_line_still_has_a_row() {
        let layout = MonospaceMeasurer::default().measure("", &style(), Some(80.0));
        assert_eq!(layout.sub_lines.len(), 1);
        assert_eq!(layout.sub_lines[0].stops, vec![0.0]);
        assert_eq!(layout.height, 16.0);
    }

    #[test]
    fn wraps_at_column_limit() {
        let layout = MonospaceMeasurer::default().measure("abcdefghij", &style(), Some(32.0));
        let rows: Vec<_> = layout.sub_lines.iter().map(|r| (r.start, r.len)).collect();
        assert_eq!(rows, vec![(0, 4), (4, 4), (8, 2)]);
        assert_eq!(layout.sub_lines[2].top, 32.0);
        assert_eq!(layout.height, 48.0);
    }

    #[test]
    fn wide_characters_take_two_columns_and_never_split() {
        let measurer = MonospaceMeasurer::default();
        assert_eq!(measurer.columns("你好"), 4);
        assert_eq!(measurer.columns("🦀"), 2);
        let layout = measurer.measure("a你好", &style(), Some(24.0));
        let rows: Vec<_> = layout.sub_lines.iter().map(|r| (r.start, r.len)).collect();
        assert_eq!(rows, vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn combining_marks_share_a_stop() {
        let layout = MonospaceMeasurer::default().measure("e\u{301}x", &style(), None);
        let row = &layout.sub_lines[0];
        assert_eq!(row.len, 3);
        assert_eq!(row.stops, vec![0.0, 0.0, 8.0, 16.0]);
    }

    #[test]
    fn tabs_expand_to_tab_width() {
        let measurer = MonospaceMeasurer::with_tab_width(2);
        assert_eq!(measurer.columns("\tx"), 3);
    }
}
