//! Document loading and the text reports printed by the binary.

use anyhow::Context;
use linepad::layout::{CacheStats, Theme};
use linepad::text::char_to_byte;
use linepad::{Config, EditorSession, Frame, LineBuffer, LineSource, MonospaceLayout, Renderer, Viewport};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Load a UTF-8 text file into a cached monospace session.
///
/// # Arguments
/// - `path`: File to read.
/// - `config`: Cache sizing for the session's layout.
/// - `view_width`: Wrap width, or `None` for unwrapped lines.
///
/// # Returns
/// The session, or an error if the file is not readable UTF-8 or the cache
/// configuration is invalid.
pub(crate) fn load_session(
    path: &Path,
    config: &Config,
    view_width: Option<f32>,
) -> anyhow::Result<EditorSession<MonospaceLayout>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let buffer = LineBuffer::from_text(&text);
    info!(
        path = %path.display(),
        lines = buffer.line_count(),
        window_size = config.cache.window_size,
        "loaded document"
    );
    let session = EditorSession::monospace(buffer, Theme::default(), config, view_width)
        .context("invalid layout cache configuration")?;
    Ok(session)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stats {
    pub lines: usize,
    pub chars: usize,
    pub rows: usize,
    pub content_height: f32,
    pub windows: usize,
    pub loaded_windows: usize,
    pub cache: CacheStats,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lines:           {}", self.lines)?;
        writeln!(f, "characters:      {}", self.chars)?;
        writeln!(f, "visual rows:     {}", self.rows)?;
        writeln!(f, "content height:  {}", self.content_height)?;
        writeln!(
            f,
            "cache windows:   {} ({} loaded)",
            self.windows, self.loaded_windows
        )?;
        write!(
            f,
            "cache activity:  {} populations, {} evictions, {} lines measured, {} aggregate hits",
            self.cache.populations,
            self.cache.evictions,
            self.cache.measured_lines,
            self.cache.aggregate_hits
        )
    }
}

/// Measure the whole document once and summarize it.
pub(crate) fn stats(session: &mut EditorSession<MonospaceLayout>) -> anyhow::Result<Stats> {
    let content_height = session.content_height()?;
    let frame = session.frame(&Renderer::default(), Viewport::new(0.0, content_height))?;
    let buffer = session.buffer();
    let mut chars = 0usize;
    for line in 0..buffer.line_count() {
        chars += buffer.line_len(line)?;
    }
    Ok(Stats {
        lines: buffer.line_count(),
        chars,
        rows: frame.rows.iter().map(|row| row.layout.sub_lines.len()).sum(),
        content_height,
        windows: session.layout().window_count(),
        loaded_windows: session.layout().loaded_windows(),
        cache: session.layout().stats(),
    })
}

/// Plain-text rendering of `frame`: one output line per wrapped row, with a
/// line-number gutter on each line's first row.
pub(crate) fn render_frame(lines: &dyn LineSource, frame: &Frame) -> anyhow::Result<String> {
    let digits = Frame::gutter_digits(lines.line_count());
    let mut out = String::new();
    for row in &frame.rows {
        let text = lines.line_text(row.line)?;
        for (index, sub_line) in row.layout.sub_lines.iter().enumerate() {
            let start = char_to_byte(text, sub_line.start);
            let end = char_to_byte(text, sub_line.end());
            let label = if index == 0 { row.number.as_str() } else { "" };
            out.push_str(&format!("{label:>digits$} | {}\n", &text[start..end]));
        }
    }
    Ok(out)
}
