//! Windowed, LRU-bounded memoization in front of a [`LayoutSource`].
//!
//! Lines are grouped into fixed-size windows. A window is either loaded (one
//! slot per line holding the measured entry) or unloaded, in which case only
//! its aggregate height may survive. Slot arrays come from a pool capped at
//! `maximum_loaded_windows`; when it runs dry the least recently touched
//! loaded window gives its array up.

use super::source::{
    height_units, resolve_span, units_below, units_to_height, LayoutSource, LineEntry,
};
use crate::buffer::LineSource;
use crate::config::CacheConfig;
use crate::error::{EditorError, Result};
use crate::operation::{BufferChange, ChangeObserver};
use std::ops::Range;
use tracing::{debug, warn};

type Slots = Vec<Option<LineEntry>>;

/// Counters describing cache effectiveness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Windows (re)filled from the inner provider.
    pub populations: u64,
    /// Loaded windows cleared to make room for another.
    pub evictions: u64,
    /// Individual lines measured by the inner provider.
    pub measured_lines: u64,
    /// Whole-window heights answered from the memoized aggregate.
    pub aggregate_hits: u64,
}

#[derive(Debug, Default)]
struct Window {
    slots: Option<Slots>,
    /// Window height in fixed-point units.
    aggregate: Option<u64>,
    needs_fill: bool,
    last_access: u64,
}

/// Layout cache decorator. Query results are identical to those of the
/// wrapped provider.
#[derive(Debug)]
pub struct LayoutCache<S> {
    inner: S,
    config: CacheConfig,
    windows: Vec<Window>,
    line_count: usize,
    attached: bool,
    pool: Vec<Slots>,
    allocated: usize,
    loaded: usize,
    clock: u64,
    stats: CacheStats,
}

impl<S: LayoutSource> LayoutCache<S> {
    /// Wrap `inner` with the given sizing.
    ///
    /// Nothing is measured until the first query, which also attaches the
    /// cache to the buffer's line count.
    ///
    /// # Arguments
    /// - `inner`: Provider that measures lines on a miss.
    /// - `config`: Window size and loaded-window cap.
    ///
    /// # Returns
    /// An empty cache.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] when the configuration has a zero size.
    pub fn new(inner: S, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner,
            config,
            windows: Vec::new(),
            line_count: 0,
            attached: false,
            pool: Vec::new(),
            allocated: 0,
            loaded: 0,
            clock: 0,
            stats: CacheStats::default(),
        })
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of windows currently holding per-line entries.
    pub fn loaded_windows(&self) -> usize {
        self.loaded
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_window_loaded(&self, window: usize) -> bool {
        self.windows
            .get(window)
            .is_some_and(|entry| entry.slots.is_some())
    }

    /// Index of the window holding `line`.
    pub fn window_of(&self, line: usize) -> usize {
        line / self.config.window_size
    }

    /// Mutable access to the wrapped provider. Anything that changes its
    /// measurements must be followed by [`LayoutSource::invalidate_all`].
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    fn window_bounds(&self, window: usize) -> Range<usize> {
        let start = window * self.config.window_size;
        start..(start + self.config.window_size).min(self.line_count)
    }

    /// Bring the window table in line with the source's line count.
    fn sync(&mut self, lines: &dyn LineSource) {
        let actual = lines.line_count();
        if self.attached && actual == self.line_count {
            return;
        }
        if self.attached {
            warn!(
                cached = self.line_count,
                actual, "line count changed without a notification; resetting layout cache"
            );
        }
        self.invalidate_from(0);
        self.line_count = actual;
        self.resize_windows();
        self.attached = true;
    }

    fn resize_windows(&mut self) {
        let target = self.line_count.div_ceil(self.config.window_size);
        while self.windows.len() > target {
            let last = self.windows.len() - 1;
            self.release(last);
            self.windows.pop();
        }
        self.windows.resize_with(target, Window::default);
    }

    /// Drop entries and aggregates of `first` and every later window.
    fn invalidate_from(&mut self, first: usize) {
        for window in first..self.windows.len() {
            self.release(window);
            self.windows[window].aggregate = None;
        }
    }

    /// Return a window's slot array to the pool, keeping its aggregate.
    fn release(&mut self, window: usize) -> bool {
        let entry = &mut self.windows[window];
        entry.needs_fill = false;
        match entry.slots.take() {
            Some(mut slots) => {
                slots.clear();
                self.pool.push(slots);
                self.loaded -= 1;
                true
            }
            None => false,
        }
    }

    fn acquire_slots(&mut self, requester: usize) -> Result<Slots> {
        if let Some(slots) = self.pool.pop() {
            return Ok(slots);
        }
        if self.allocated < self.config.maximum_loaded_windows {
            self.allocated += 1;
            return Ok(Vec::with_capacity(self.config.window_size));
        }
        let victim = self
            .windows
            .iter()
            .enumerate()
            .filter(|(index, entry)| *index != requester && entry.slots.is_some())
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(index, _)| index)
            .ok_or_else(|| {
                EditorError::InvariantViolation(format!(
                    "no loaded window to evict (loaded {}, pooled {}, allocated {})",
                    self.loaded,
                    self.pool.len(),
                    self.allocated
                ))
            })?;
        self.release(victim);
        self.stats.evictions += 1;
        debug!(victim, requester, "evicted least recently used window");
        self.pool.pop().ok_or_else(|| {
            EditorError::InvariantViolation("evicted window returned no slot array".to_string())
        })
    }

    /// Make sure every slot of `window` is measured and mark it used.
    fn populate(&mut self, lines: &dyn LineSource, window: usize) -> Result<()> {
        self.clock += 1;
        let bounds = self.window_bounds(window);
        let entry = &mut self.windows[window];
        entry.last_access = self.clock;
        let complete = entry
            .slots
            .as_ref()
            .is_some_and(|slots| slots.len() == bounds.len());
        if complete && !entry.needs_fill {
            return Ok(());
        }

        if entry.slots.is_none() {
            let slots = self.acquire_slots(window)?;
            self.windows[window].slots = Some(slots);
            self.loaded += 1;
        }

        let Self {
            windows,
            inner,
            stats,
            ..
        } = self;
        let entry = &mut windows[window];
        entry.needs_fill = true;
        let slots = entry.slots.get_or_insert_with(Vec::new);
        slots.resize(bounds.len(), None);
        let mut aggregate = 0u64;
        let mut measured = 0usize;
        for (offset, slot) in slots.iter_mut().enumerate() {
            if slot.is_none() {
                measured += 1;
                stats.measured_lines += 1;
                *slot = Some(inner.line_entry(lines, bounds.start + offset)?);
            }
            if let Some(line_entry) = slot {
                aggregate += height_units(line_entry.height);
            }
        }
        entry.aggregate = Some(aggregate);
        entry.needs_fill = false;
        stats.populations += 1;
        debug!(window, measured, aggregate, "populated layout window");
        Ok(())
    }

    fn window_units(&mut self, lines: &dyn LineSource, window: usize) -> Result<u64> {
        if let Some(height) = self.windows[window].aggregate {
            self.stats.aggregate_hits += 1;
            return Ok(height);
        }
        self.populate(lines, window)?;
        self.windows[window].aggregate.ok_or_else(|| {
            EditorError::InvariantViolation(format!("window {window} has no aggregate after populate"))
        })
    }

    fn loaded_slots(&self, window: usize) -> Result<&Slots> {
        self.windows[window].slots.as_ref().ok_or_else(|| {
            EditorError::InvariantViolation(format!("window {window} is not loaded"))
        })
    }

    fn entry(&mut self, lines: &dyn LineSource, line: usize) -> Result<&LineEntry> {
        self.sync(lines);
        if line >= self.line_count {
            return Err(EditorError::out_of_range(line, self.line_count));
        }
        let window = self.window_of(line);
        self.populate(lines, window)?;
        let offset = line - window * self.config.window_size;
        self.loaded_slots(window)?
            .get(offset)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                EditorError::InvariantViolation(format!("loaded window is missing line {line}"))
            })
    }
}

fn slot_units(slot: &Option<LineEntry>) -> Result<u64> {
    slot.as_ref()
        .map(|entry| height_units(entry.height))
        .ok_or_else(|| EditorError::InvariantViolation("unmeasured slot in loaded window".into()))
}

impl<S: LayoutSource> LayoutSource for LayoutCache<S> {
    fn line_entry(&mut self, lines: &dyn LineSource, line: usize) -> Result<LineEntry> {
        self.entry(lines, line).cloned()
    }

    fn line_height(&mut self, lines: &dyn LineSource, line: usize) -> Result<f32> {
        self.entry(lines, line).map(|entry| entry.height)
    }

    fn view_width(&self) -> Option<f32> {
        self.inner.view_width()
    }

    fn set_view_width(&mut self, width: Option<f32>) {
        if self.inner.view_width() == width {
            return;
        }
        self.inner.set_view_width(width);
        self.invalidate_all();
    }

    fn invalidate_all(&mut self) {
        self.inner.invalidate_all();
        self.invalidate_from(0);
        debug!(windows = self.windows.len(), "invalidated every layout window");
    }

    fn line_layout_height(
        &mut self,
        lines: &dyn LineSource,
        start: usize,
        end: Option<usize>,
    ) -> Result<f32> {
        self.sync(lines);
        let Some(span) = resolve_span(self.line_count, start, end)? else {
            return Ok(0.0);
        };
        let (first, last) = (*span.start(), *span.end());
        let mut total = 0u64;
        for window in self.window_of(first)..=self.window_of(last) {
            let bounds = self.window_bounds(window);
            let from = first.max(bounds.start);
            let to = last.min(bounds.end - 1);
            if from == bounds.start && to + 1 == bounds.end {
                total += self.window_units(lines, window)?;
                continue;
            }
            self.populate(lines, window)?;
            let slots = self.loaded_slots(window)?;
            for slot in &slots[from - bounds.start..=to - bounds.start] {
                total += slot_units(slot)?;
            }
        }
        Ok(units_to_height(total))
    }

    fn line_at_offset(&mut self, lines: &dyn LineSource, y: f32) -> Result<usize> {
        self.sync(lines);
        if self.line_count == 0 {
            return Ok(0);
        }
        let mut top = 0u64;
        for window in 0..self.windows.len() {
            let height = self.window_units(lines, window)?;
            if !units_below(top + height, y) {
                top += height;
                continue;
            }
            self.populate(lines, window)?;
            let start = self.window_bounds(window).start;
            for (offset, slot) in self.loaded_slots(window)?.iter().enumerate() {
                top += slot_units(slot)?;
                if units_below(top, y) {
                    return Ok(start + offset);
                }
            }
        }
        Ok(self.line_count - 1)
    }
}

impl<S: LayoutSource> ChangeObserver for LayoutCache<S> {
    fn on_buffer_change(&mut self, change: &BufferChange) {
        self.inner.on_buffer_change(change);
        if !self.attached {
            return;
        }
        match *change {
            BufferChange::LineChanged { line } => {
                let window_size = self.config.window_size;
                let Some(entry) = self.windows.get_mut(line / window_size) else {
                    return;
                };
                entry.aggregate = None;
                if let Some(slots) = entry.slots.as_mut() {
                    if let Some(slot) = slots.get_mut(line % window_size) {
                        *slot = None;
                    }
                    entry.needs_fill = true;
                }
            }
            BufferChange::LinesInserted { .. } | BufferChange::LinesDeleted { .. } => {
                self.invalidate_from(self.window_of(change.first_line()));
                self.line_count = self.line_count.saturating_add_signed(change.line_delta());
                self.resize_windows();
            }
        }
    }
}
