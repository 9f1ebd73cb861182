//! One column per character, wrapping at whole columns. Shared by unit and
//! integration tests.

use super::{LineStyle, SubLine, TextLayout, TextMeasurer};

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ColumnMeasurer;

impl TextMeasurer for ColumnMeasurer {
    fn measure(&self, text: &str, style: &LineStyle, wrap_width: Option<f32>) -> TextLayout {
        let advance = style.font.advance;
        let row_height = style.font.line_height;
        let len = text.chars().count();
        let columns = wrap_width
            .map(|width| ((width / advance).floor() as usize).max(1))
            .unwrap_or(usize::MAX);
        let mut sub_lines = Vec::new();
        let mut start = 0;
        loop {
            let row_len = (len - start).min(columns);
            sub_lines.push(SubLine {
                start,
                len: row_len,
                top: sub_lines.len() as f32 * row_height,
                height: row_height,
                stops: (0..=row_len).map(|i| i as f32 * advance).collect(),
            });
            start += row_len;
            if start >= len {
                break;
            }
        }
        let width = sub_lines.iter().map(SubLine::width).fold(0.0, f32::max);
        TextLayout {
            width,
            height: sub_lines.len() as f32 * row_height,
            sub_lines,
        }
    }
}
