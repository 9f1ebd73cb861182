//! The layout query interface shared by raw and cached providers.

use super::measure::TextLayout;
use super::style::LineStyle;
use crate::buffer::LineSource;
use crate::error::{EditorError, Result};
use crate::operation::ChangeObserver;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

/// Measured data for one line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineEntry {
    /// Total height including style chrome.
    pub height: f32,
    pub style: Arc<LineStyle>,
    pub layout: Arc<TextLayout>,
}

/// Fixed-point resolution of summed heights, in units per pixel.
///
/// Offsets converted back to `f32` stay exact up to 2^18 px.
pub const HEIGHT_UNITS_PER_PX: f64 = 64.0;

/// Convert a line height to fixed-point units.
///
/// Heights are summed as integers so that a total does not depend on the
/// order or grouping of its terms. Negative and NaN heights count as zero.
///
/// # Arguments
/// - `height`: height in pixels.
///
/// # Returns
/// The height rounded to the nearest unit.
pub fn height_units(height: f32) -> u64 {
    let scaled = (f64::from(height) * HEIGHT_UNITS_PER_PX).round();
    if scaled > 0.0 {
        scaled as u64
    } else {
        0
    }
}

/// Convert a fixed-point total back to pixels.
pub fn units_to_height(units: u64) -> f32 {
    (units as f64 / HEIGHT_UNITS_PER_PX) as f32
}

/// Returns `true` when a fixed-point edge at `units` lies strictly below the
/// vertical offset `y`.
pub fn units_below(units: u64, y: f32) -> bool {
    let threshold = (f64::from(y) * HEIGHT_UNITS_PER_PX).floor();
    if threshold.is_nan() || threshold < 0.0 {
        return true;
    }
    (units as f64) > threshold
}

/// Resolve a `(start, end)` height query into an inclusive line span.
///
/// `end == None` means "through the last line". Returns `Ok(None)` for an
/// open-ended query on an empty buffer.
///
/// # Errors
/// [`EditorError::InvalidArgument`] when `start > end`,
/// [`EditorError::IndexOutOfRange`] when either bound is past the last line.
pub fn resolve_span(
    line_count: usize,
    start: usize,
    end: Option<usize>,
) -> Result<Option<RangeInclusive<usize>>> {
    let end = match end {
        Some(end) if start > end => {
            return Err(EditorError::invalid(format!(
                "start line {start} exceeds end line {end}"
            )))
        }
        Some(end) => end,
        None if line_count == 0 && start == 0 => return Ok(None),
        None => line_count.saturating_sub(1).max(start),
    };
    if end >= line_count {
        return Err(EditorError::out_of_range(end, line_count));
    }
    Ok(Some(start..=end))
}

/// Per-line layout queries over a [`LineSource`].
///
/// The provided methods are the uncached reference semantics; decorators
/// override them to answer faster but must return identical results.
pub trait LayoutSource: ChangeObserver {
    /// Height, style, and layout of `line`.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    fn line_entry(&mut self, lines: &dyn LineSource, line: usize) -> Result<LineEntry>;

    /// Current view width used for wrapping, `None` for no wrapping.
    fn view_width(&self) -> Option<f32>;

    /// Change the wrap width; affects every line.
    fn set_view_width(&mut self, width: Option<f32>);

    /// Forget everything measured so far, e.g. after a theme change.
    fn invalidate_all(&mut self);

    /// # Errors
    /// As [`LayoutSource::line_entry`].
    fn line_layout(&mut self, lines: &dyn LineSource, line: usize) -> Result<Arc<TextLayout>> {
        Ok(self.line_entry(lines, line)?.layout)
    }

    /// # Errors
    /// As [`LayoutSource::line_entry`].
    fn line_style(&mut self, lines: &dyn LineSource, line: usize) -> Result<Arc<LineStyle>> {
        Ok(self.line_entry(lines, line)?.style)
    }

    /// # Errors
    /// As [`LayoutSource::line_entry`].
    fn line_height(&mut self, lines: &dyn LineSource, line: usize) -> Result<f32> {
        Ok(self.line_entry(lines, line)?.height)
    }

    /// Summed height of lines `start..=end` (`end == None`: through the last
    /// line), accumulated in [`height_units`].
    ///
    /// # Errors
    /// See [`resolve_span`].
    fn line_layout_height(
        &mut self,
        lines: &dyn LineSource,
        start: usize,
        end: Option<usize>,
    ) -> Result<f32> {
        let Some(span) = resolve_span(lines.line_count(), start, end)? else {
            return Ok(0.0);
        };
        let mut total = 0u64;
        for line in span {
            total += height_units(self.line_height(lines, line)?);
        }
        Ok(units_to_height(total))
    }

    /// Vertical offset of the top edge of `line`.
    ///
    /// # Errors
    /// [`EditorError::IndexOutOfRange`] for a missing line.
    fn line_top(&mut self, lines: &dyn LineSource, line: usize) -> Result<f32> {
        let line_count = lines.line_count();
        if line >= line_count {
            return Err(EditorError::out_of_range(line, line_count));
        }
        if line == 0 {
            return Ok(0.0);
        }
        self.line_layout_height(lines, 0, Some(line - 1))
    }

    /// The line covering vertical offset `y`: the first line whose bottom
    /// edge lies below `y`, clamped to the last line. `0` for an empty buffer.
    ///
    /// # Errors
    /// Measurement errors from [`LayoutSource::line_entry`].
    fn line_at_offset(&mut self, lines: &dyn LineSource, y: f32) -> Result<usize> {
        let line_count = lines.line_count();
        let mut top = 0u64;
        for line in 0..line_count {
            top += height_units(self.line_height(lines, line)?);
            if units_below(top, y) {
                return Ok(line);
            }
        }
        Ok(line_count.saturating_sub(1))
    }

    /// Lines intersecting the viewport `[top, top + height]` as a half-open
    /// range; `0..0` for an empty buffer.
    ///
    /// # Errors
    /// Measurement errors from [`LayoutSource::line_entry`].
    fn line_layout_range(
        &mut self,
        lines: &dyn LineSource,
        viewport_top: f32,
        viewport_height: f32,
    ) -> Result<Range<usize>> {
        if lines.line_count() == 0 {
            return Ok(0..0);
        }
        let top = viewport_top.max(0.0);
        let first = self.line_at_offset(lines, top)?;
        let last = self.line_at_offset(lines, top + viewport_height.max(0.0))?;
        Ok(first..last.max(first) + 1)
    }
}
