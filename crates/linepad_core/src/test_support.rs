//! Shared fixtures for unit tests.

use crate::buffer::LineBuffer;
use crate::layout::{LineStyle, RawLayout, SubLine, TextLayout, TextMeasurer, Theme};

#[path = "../tests/support/column.rs"]
mod column;

pub(crate) use column::ColumnMeasurer;

pub(crate) type TestLayout = RawLayout<ColumnMeasurer, Theme>;

pub(crate) fn raw_layout(view_width: Option<f32>) -> TestLayout {
    RawLayout::new(ColumnMeasurer, Theme::default()).with_view_width(view_width)
}

pub(crate) fn numbered_buffer(count: usize) -> LineBuffer {
    LineBuffer::from_lines((0..count).map(|i| format!("line {i}")))
}
