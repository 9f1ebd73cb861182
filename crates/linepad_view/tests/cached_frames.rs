//! Sessions over cached and uncached layouts must paint identical frames.

use linepad_core::layout::{FontMetrics, Insets, LineStyle, RawLayout, Theme};
use linepad_core::{BufferPosition, CacheConfig, Config, HistoryConfig, LineBuffer};
use linepad_view::{EditorSession, MonospaceLayout, MonospaceMeasurer, Renderer, Viewport};

fn theme() -> Theme {
    Theme::new(LineStyle::default()).with_style(
        "heading",
        LineStyle {
            padding: Insets::vertical(6.0, 2.0),
            ..LineStyle::default()
        },
    )
}

/// Row heights and insets that are not whole pixels.
fn fractional_theme() -> Theme {
    let font = FontMetrics {
        line_height: 17.3,
        advance: 7.1,
    };
    Theme::new(LineStyle {
        font,
        padding: Insets::vertical(0.7, 0.0),
        ..LineStyle::default()
    })
    .with_style(
        "heading",
        LineStyle {
            font,
            padding: Insets::vertical(6.15, 2.35),
            ..LineStyle::default()
        },
    )
}

fn document() -> LineBuffer {
    LineBuffer::from_lines((0..120).map(|i| {
        if i % 9 == 0 {
            format!("section {i} with a long title that wraps around the view")
        } else {
            format!("{i}: 文字 and text")
        }
    }))
}

fn cached_with(theme: Theme) -> EditorSession<MonospaceLayout> {
    let config = Config {
        cache: CacheConfig::new(8, 3).expect("cache config"),
        history: HistoryConfig::default(),
    };
    EditorSession::monospace(document(), theme, &config, Some(160.0)).expect("session")
}

fn uncached_with(theme: Theme) -> EditorSession<RawLayout<MonospaceMeasurer, Theme>> {
    let raw = RawLayout::new(MonospaceMeasurer::default(), theme).with_view_width(Some(160.0));
    EditorSession::new(document(), raw, HistoryConfig::default())
}

fn cached() -> EditorSession<MonospaceLayout> {
    cached_with(theme())
}

fn uncached() -> EditorSession<RawLayout<MonospaceMeasurer, Theme>> {
    uncached_with(theme())
}

macro_rules! both {
    ($a:expr, $b:expr, |$s:ident| $body:expr) => {{
        let $s = &mut $a;
        let left = $body;
        let $s = &mut $b;
        let right = $body;
        assert_eq!(left, right);
    }};
}

#[test]
fn edits_scrolls_and_resizes_paint_the_same() {
    let mut cached = cached();
    let mut raw = uncached();
    let renderer = Renderer::with_overscan(2);

    for line in (0..120).step_by(9) {
        both!(cached, raw, |s| s.set_line_style(line, Some("heading")).expect("style"));
    }

    for (step, top) in [0.0f32, 400.0, 1200.0, 90.0, 3000.0].into_iter().enumerate() {
        let viewport = Viewport::new(top, 300.0);
        both!(cached, raw, |s| s.frame(&renderer, viewport).expect("frame"));

        let line = step * 17 % 100;
        both!(cached, raw, |s| s.move_caret(BufferPosition::new(line, 3), false));
        for ch in "typed\nmore".chars() {
            both!(cached, raw, |s| s.type_char(ch).expect("type").position);
        }
        both!(cached, raw, |s| s.backspace().expect("backspace").map(|o| o.position));
        both!(cached, raw, |s| s.move_down(true).expect("down"));
        both!(cached, raw, |s| s.insert_text("pasted\nblock\n").expect("paste").position);
        both!(cached, raw, |s| s.frame(&renderer, viewport).expect("frame"));

        if step == 2 {
            both!(cached, raw, |s| s.set_view_width(Some(96.0)));
        }
        if step % 2 == 1 {
            both!(cached, raw, |s| s.undo().expect("undo"));
        }
        both!(cached, raw, |s| s.reveal(viewport).expect("reveal"));
        both!(cached, raw, |s| s.buffer().text());
        both!(cached, raw, |s| s.content_height().expect("height"));
    }

    assert!(cached.layout().loaded_windows() <= 3);
    assert!(cached.layout().stats().evictions > 0);
}

#[test]
fn clicks_resolve_identically() {
    let mut cached = cached();
    let mut raw = uncached();
    for (x, y) in [(0.0, 0.0), (33.0, 17.0), (150.0, 555.5), (-10.0, 10_000.0)] {
        both!(cached, raw, |s| s.click(x, y, false).expect("click"));
    }
}

#[test]
fn fractional_metrics_paint_the_same() {
    let mut cached = cached_with(fractional_theme());
    let mut raw = uncached_with(fractional_theme());
    let renderer = Renderer::default();
    for line in (0..120).step_by(9) {
        both!(cached, raw, |s| s.set_line_style(line, Some("heading")).expect("style"));
    }
    both!(cached, raw, |s| s.content_height().expect("height"));

    let frame = raw.frame(&renderer, Viewport::new(0.0, 2400.0)).expect("frame");
    for row in frame.rows.iter().step_by(7) {
        let viewport = Viewport::new(row.top, 40.0);
        both!(cached, raw, |s| s.frame(&renderer, viewport).expect("frame"));
        both!(cached, raw, |s| s.click(3.0, row.top, false).expect("click"));
    }
}
