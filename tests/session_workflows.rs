//! End-to-end editing workflows through the root facade.

use linepad::constants::{ENV_COALESCE_TYPING, ENV_MAX_LOADED_WINDOWS, ENV_WINDOW_SIZE};
use linepad::env::ScopedEnv;
use linepad::layout::Theme;
use linepad::{BufferPosition, Config, EditorSession, LineBuffer, Renderer, Viewport};

fn long_document(lines: usize) -> LineBuffer {
    LineBuffer::from_lines((0..lines).map(|i| format!("line {i:04} of the document")))
}

#[test]
fn environment_configures_cache_and_history() {
    let mut env = ScopedEnv::lock();
    env.set(ENV_WINDOW_SIZE, "4")
        .set(ENV_MAX_LOADED_WINDOWS, "2")
        .set(ENV_COALESCE_TYPING, "off");

    let config = Config::from_env();
    let mut session =
        EditorSession::monospace(long_document(40), Theme::default(), &config, None)
            .expect("session");
    session
        .frame(&Renderer::default(), Viewport::new(0.0, 640.0))
        .expect("frame");
    assert_eq!(session.layout().window_count(), 10);
    assert_eq!(session.layout().loaded_windows(), 2);

    session.move_caret(BufferPosition::new(0, 0), false);
    for ch in "abc".chars() {
        session.type_char(ch).expect("type");
    }
    // Coalescing is off, so every character is its own step.
    assert_eq!(session.history().undo_len(), 3);
}

#[test]
fn paragraph_editing_with_word_undo() {
    let mut session = EditorSession::monospace(
        LineBuffer::from_text(""),
        Theme::default(),
        &Config::default(),
        Some(120.0),
    )
    .expect("session");

    for ch in "first line\nsecond".chars() {
        session.type_char(ch).expect("type");
    }
    assert_eq!(session.buffer().text(), "first line\nsecond");
    assert_eq!(session.caret(), BufferPosition::new(1, 6));

    assert!(session.undo().expect("undo"));
    assert_eq!(session.buffer().text(), "first line\n");
    assert!(session.undo().expect("undo"));
    assert_eq!(session.buffer().text(), "first line");
    assert!(session.redo().expect("redo"));
    assert!(session.redo().expect("redo"));
    assert_eq!(session.buffer().text(), "first line\nsecond");
    assert!(!session.redo().expect("nothing left"));
}

#[test]
fn scrolling_follows_caret_through_a_long_document() {
    let mut session = EditorSession::monospace(
        long_document(500),
        Theme::default(),
        &Config::default(),
        Some(400.0),
    )
    .expect("session");
    let renderer = Renderer::with_overscan(1);
    let mut viewport = Viewport::new(0.0, 160.0);

    session.move_caret(BufferPosition::new(0, 0), false);
    for _ in 0..30 {
        session.move_down(false).expect("down");
        if let Some(top) = session.reveal(viewport).expect("reveal") {
            viewport.top = top;
        }
    }
    assert_eq!(session.caret().line, 30);
    let frame = session.frame(&renderer, viewport).expect("frame");
    assert!(frame.visible.contains(&30));
    let caret_row = frame
        .rows
        .iter()
        .find(|row| row.caret.is_some())
        .expect("caret row painted");
    let rect = caret_row.caret_rect().expect("caret rect");
    assert!(rect.y >= viewport.top && rect.y + rect.height <= viewport.bottom());

    // The layout cache never holds more windows than configured.
    let config = Config::default();
    assert!(session.layout().loaded_windows() <= config.cache.maximum_loaded_windows);
    assert_eq!(session.content_height().expect("height"), 500.0 * 16.0);
}

#[test]
fn clicking_and_deleting_a_selection() {
    let mut session = EditorSession::monospace(
        LineBuffer::from_text("alpha\nbeta\ngamma"),
        Theme::default(),
        &Config::default(),
        None,
    )
    .expect("session");
    session.click(8.0, 4.0, false).expect("click");
    assert_eq!(session.caret(), BufferPosition::new(0, 1));
    session.click(16.0, 40.0, true).expect("shift click");
    assert_eq!(session.caret(), BufferPosition::new(2, 2));

    session.backspace().expect("delete selection");
    assert_eq!(session.buffer().text(), "amma");
    session.undo().expect("undo");
    assert_eq!(session.buffer().text(), "alpha\nbeta\ngamma");
}
