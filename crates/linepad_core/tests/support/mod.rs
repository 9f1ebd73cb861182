//! Shared fixtures for editing-core integration tests.

#![allow(dead_code)]

use linepad_core::layout::{
    FontMetrics, Insets, LineStyle, RawLayout, SubLine, TextLayout, TextMeasurer, Theme,
};
use linepad_core::{BufferPosition, BufferSegment, Command, LineBuffer, LineSource};
use rand::rngs::StdRng;
use rand::Rng;

mod column;

pub(crate) use column::ColumnMeasurer;

pub(crate) type TestLayout = RawLayout<ColumnMeasurer, Theme>;

pub(crate) fn raw_layout(view_width: Option<f32>) -> TestLayout {
    RawLayout::new(ColumnMeasurer, Theme::default()).with_view_width(view_width)
}

/// Metrics whose heights are not whole pixels, with a styled line kind.
pub(crate) fn fractional_theme() -> Theme {
    let font = FontMetrics {
        line_height: 17.3,
        advance: 7.1,
    };
    Theme::new(LineStyle {
        font,
        padding: Insets::vertical(0.7, 0.3),
        ..LineStyle::default()
    })
    .with_style(
        "quote",
        LineStyle {
            font,
            margin: Insets::vertical(1.1, 0.45),
            ..LineStyle::default()
        },
    )
}

pub(crate) fn fractional_layout(view_width: Option<f32>) -> TestLayout {
    RawLayout::new(ColumnMeasurer, fractional_theme()).with_view_width(view_width)
}

pub(crate) fn numbered_buffer(count: usize) -> LineBuffer {
    LineBuffer::from_lines((0..count).map(|i| format!("line {i}")))
}

pub(crate) fn lines_of(buffer: &LineBuffer) -> Vec<String> {
    (0..buffer.line_count())
        .map(|line| buffer.line_text(line).expect("line").to_string())
        .collect()
}

const SNIPPETS: &[&str] = &["a", "xyz", "hello world", "δέλτα", "a much longer run of words"];

fn random_position(rng: &mut StdRng, buffer: &LineBuffer) -> BufferPosition {
    let line = rng.gen_range(0..buffer.line_count());
    let len = buffer.line_len(line).expect("line");
    BufferPosition::new(line, rng.gen_range(0..=len))
}

/// A random command that is valid against `buffer`.
pub(crate) fn random_command(rng: &mut StdRng, buffer: &LineBuffer) -> Command {
    let line_count = buffer.line_count();
    if line_count == 0 {
        return Command::insert_lines(buffer, 0, rng.gen_range(1..4)).expect("insert lines");
    }
    let snippet = SNIPPETS[rng.gen_range(0..SNIPPETS.len())];
    match rng.gen_range(0..8) {
        0 => Command::insert_text(buffer, random_position(rng, buffer), snippet).expect("insert"),
        1 => {
            let line = rng.gen_range(0..line_count);
            let len = buffer.line_len(line).expect("line");
            let start = rng.gen_range(0..=len);
            let end = rng.gen_range(start..=len + 2);
            Command::delete_text(buffer, line, start..end).expect("delete")
        }
        2 => Command::set_text(buffer, rng.gen_range(0..line_count), snippet).expect("set"),
        3 => {
            let line = rng.gen_range(0..=line_count);
            Command::insert_lines(buffer, line, rng.gen_range(1..5)).expect("insert lines")
        }
        4 => {
            let line = rng.gen_range(0..line_count);
            let count = rng.gen_range(1..=(line_count - line).min(4));
            Command::delete_lines(buffer, line, count).expect("delete lines")
        }
        5 => Command::split_line(buffer, random_position(rng, buffer)).expect("split"),
        6 if line_count > 1 => {
            Command::join_lines(buffer, rng.gen_range(0..line_count - 1)).expect("join")
        }
        _ => {
            let a = random_position(rng, buffer);
            let b = random_position(rng, buffer);
            let text = if rng.gen_bool(0.5) {
                format!("{snippet}\n{snippet}")
            } else {
                snippet.to_string()
            };
            Command::replace_segment(buffer, BufferSegment::new(a, b), &text).expect("replace")
        }
    }
}
