//! Word-boundary predicates used to coalesce typed characters.

use unicode_segmentation::UnicodeSegmentation;

/// Decides whether two adjacent characters belong to the same word.
pub trait WordBoundary {
    fn same_word(&self, previous: char, next: char) -> bool;
}

impl<F> WordBoundary for F
where
    F: Fn(char, char) -> bool,
{
    fn same_word(&self, previous: char, next: char) -> bool {
        self(previous, next)
    }
}

/// Unicode (UAX #29) word segmentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeWords;

impl WordBoundary for UnicodeWords {
    fn same_word(&self, previous: char, next: char) -> bool {
        let mut pair = String::with_capacity(8);
        pair.push(previous);
        pair.push(next);
        pair.split_word_bounds().nth(1).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_words_groups_letters_and_splits_on_spaces() {
        let words = UnicodeWords;
        assert!(words.same_word('a', 'b'));
        assert!(words.same_word('x', '9'));
        assert!(words.same_word('é', 't'));
        assert!(!words.same_word('a', ' '));
        assert!(!words.same_word(' ', 'a'));
        assert!(!words.same_word('a', '.'));
    }

    #[test]
    fn closures_act_as_predicates() {
        let never = |_: char, _: char| false;
        assert!(!never.same_word('a', 'a'));
    }
}
