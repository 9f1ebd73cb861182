//! Position and range value types shared by every layer above the buffer.

use std::fmt;

/// A point inside the buffer, ordered by line and then by character.
///
/// The field order matters: the derived `Ord` is lexicographic over
/// `(line, character)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferPosition {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character (`char`) index within the line.
    pub character: usize,
}

impl BufferPosition {
    /// Create a position from line and character indices.
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Position at the start of `line`.
    pub const fn line_start(line: usize) -> Self {
        Self { line, character: 0 }
    }
}

impl fmt::Display for BufferPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

impl From<(usize, usize)> for BufferPosition {
    fn from((line, character): (usize, usize)) -> Self {
        Self { line, character }
    }
}

/// A selection-style range between an anchor and a moving tail.
///
/// The anchor stays where the selection started; the tail follows the caret.
/// Either may come first in document order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferSegment {
    pub anchor: BufferPosition,
    pub tail: BufferPosition,
}

impl BufferSegment {
    pub const fn new(anchor: BufferPosition, tail: BufferPosition) -> Self {
        Self { anchor, tail }
    }

    /// An empty segment sitting at `position`.
    pub const fn collapsed(position: BufferPosition) -> Self {
        Self {
            anchor: position,
            tail: position,
        }
    }

    /// The earlier of the two ends.
    pub fn start(&self) -> BufferPosition {
        self.anchor.min(self.tail)
    }

    /// The later of the two ends.
    pub fn end(&self) -> BufferPosition {
        self.anchor.max(self.tail)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.tail
    }

    pub fn is_same_line(&self) -> bool {
        self.anchor.line == self.tail.line
    }

    /// Moves the tail, keeping the anchor in place.
    pub fn extend_to(&mut self, tail: BufferPosition) {
        self.tail = tail;
    }

    /// Returns `true` when `position` lies in `[start, end)`.
    pub fn contains(&self, position: BufferPosition) -> bool {
        position >= self.start() && position < self.end()
    }

    /// Character sub-range of `line` covered by this segment.
    ///
    /// Interior lines report `(0, usize::MAX)`; the start line is open towards
    /// the end and the end line is open towards the start. A single-line
    /// segment reports its exact bounds. Lines outside the segment yield `None`.
    ///
    /// # Returns
    /// `(start_char, end_char)` for lines inside the segment, otherwise `None`.
    pub fn contains_line(&self, line: usize) -> Option<(usize, usize)> {
        let start = self.start();
        let end = self.end();
        if line < start.line || line > end.line {
            return None;
        }
        let from = if line == start.line { start.character } else { 0 };
        let to = if line == end.line {
            end.character
        } else {
            usize::MAX
        };
        Some((from, to))
    }
}

impl From<BufferPosition> for BufferSegment {
    fn from(position: BufferPosition) -> Self {
        Self::collapsed(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, character: usize) -> BufferPosition {
        BufferPosition::new(line, character)
    }

    #[test]
    fn positions_order_by_line_then_character() {
        let samples = [pos(0, 0), pos(0, 5), pos(1, 0), pos(1, 2), pos(3, 1)];
        for (i, a) in samples.iter().enumerate() {
            for (j, b) in samples.iter().enumerate() {
                let relations = [a < b, a > b, a == b];
                assert_eq!(
                    relations.iter().filter(|r| **r).count(),
                    1,
                    "{:?} vs {:?}",
                    a,
                    b
                );
                assert_eq!(a.cmp(b), i.cmp(&j));
            }
        }
    }

    #[test]
    fn segment_normalizes_reversed_direction() {
        let segment = BufferSegment::new(pos(4, 2), pos(1, 7));
        assert_eq!(segment.start(), pos(1, 7));
        assert_eq!(segment.end(), pos(4, 2));
        assert!(!segment.is_empty());
        assert!(!segment.is_same_line());
    }

    #[test]
    fn contains_line_reports_boundaries_and_interior() {
        let segment = BufferSegment::new(pos(5, 3), pos(2, 4));
        assert_eq!(segment.contains_line(1), None);
        assert_eq!(segment.contains_line(2), Some((4, usize::MAX)));
        assert_eq!(segment.contains_line(3), Some((0, usize::MAX)));
        assert_eq!(segment.contains_line(4), Some((0, usize::MAX)));
        assert_eq!(segment.contains_line(5), Some((0, 3)));
        assert_eq!(segment.contains_line(6), None);
    }

    #[test]
    fn contains_line_on_single_line_segment_is_exact() {
        let segment = BufferSegment::new(pos(3, 9), pos(3, 2));
        assert!(segment.is_same_line());
        assert_eq!(segment.contains_line(3), Some((2, 9)));

        let empty = BufferSegment::collapsed(pos(1, 1));
        assert!(empty.is_empty());
        assert_eq!(empty.contains_line(1), Some((1, 1)));
    }

    #[test]
    fn contains_is_half_open() {
        let segment = BufferSegment::new(pos(0, 2), pos(1, 1));
        assert!(!segment.contains(pos(0, 1)));
        assert!(segment.contains(pos(0, 2)));
        assert!(segment.contains(pos(0, 99)));
        assert!(!segment.contains(pos(1, 1)));
    }
}
