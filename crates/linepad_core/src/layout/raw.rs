//! Uncached layout provider that measures on every query.

use super::measure::TextMeasurer;
use super::source::{LayoutSource, LineEntry};
use super::style::ThemeLookup;
use crate::buffer::LineSource;
use crate::error::Result;
use crate::operation::{BufferChange, ChangeObserver};
use std::sync::Arc;

/// Measures lines through a [`TextMeasurer`] and a [`ThemeLookup`] with no
/// memoization. Serves as the reference behavior for [`super::LayoutCache`].
#[derive(Debug)]
pub struct RawLayout<M, T> {
    measurer: M,
    theme: T,
    view_width: Option<f32>,
    measured_lines: u64,
}

impl<M, T> RawLayout<M, T>
where
    M: TextMeasurer,
    T: ThemeLookup,
{
    pub fn new(measurer: M, theme: T) -> Self {
        Self {
            measurer,
            theme,
            view_width: None,
            measured_lines: 0,
        }
    }

    pub fn with_view_width(mut self, width: Option<f32>) -> Self {
        self.view_width = width;
        self
    }

    /// Number of lines measured since creation.
    pub fn measured_lines(&self) -> u64 {
        self.measured_lines
    }

    /// Swap the theme. Callers holding a cache in front of this provider
    /// must call [`LayoutSource::invalidate_all`] on the cache.
    pub fn set_theme(&mut self, theme: T) {
        self.theme = theme;
    }
}

impl<M, T> LayoutSource for RawLayout<M, T>
where
    M: TextMeasurer,
    T: ThemeLookup,
{
    fn line_entry(&mut self, lines: &dyn LineSource, line: usize) -> Result<LineEntry> {
        let text = lines.line_text(line)?;
        let style = self.theme.resolve(lines.line_style_name(line)?);
        let layout = self
            .measurer
            .measure(text, &style, style.wrap_width(self.view_width));
        self.measured_lines += 1;
        Ok(LineEntry {
            height: style.line_height(&layout),
            style,
            layout: Arc::new(layout),
        })
    }

    fn view_width(&self) -> Option<f32> {
        self.view_width
    }

    fn set_view_width(&mut self, width: Option<f32>) {
        self.view_width = width;
    }

    fn invalidate_all(&mut self) {}
}

impl<M, T> ChangeObserver for RawLayout<M, T> {
    fn on_buffer_change(&mut self, _change: &BufferChange) {}
}
