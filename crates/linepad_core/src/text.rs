//! Char-index helpers for line text.

/// Number of `char`s in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of char index `char_index`, clamped to the end of `text`.
pub fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Returns `true` when `text` carries a line terminator.
pub fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Split a text snapshot into lines, dropping carriage returns.
///
/// An empty snapshot yields one empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|line| line.replace('\r', "")).collect()
}
