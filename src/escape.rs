//! Backslash escape resolution
//!
//! The renderer never looks at raw characters directly. It walks *logical*
//! characters: a backslash followed by any character collapses into that
//! character, flagged as escaped. Escaped characters are always content, so an
//! escaped underscore can never act as an emphasis delimiter.

use std::num::NonZeroUsize;

/// A character after escape resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logical {
    pub ch: char,
    /// True when the character came from a `\x` pair
    pub escaped: bool,
}

impl Logical {
    pub fn plain(ch: char) -> Self {
        Self { ch, escaped: false }
    }

    pub fn escaped(ch: char) -> Self {
        Self { ch, escaped: true }
    }

    /// An unescaped underscore, the only character that can delimit emphasis
    pub fn is_delimiter(self) -> bool {
        self.ch == '_' && !self.escaped
    }

    pub fn is_whitespace(self) -> bool {
        self.ch.is_whitespace()
    }
}

/// Read the logical character starting at raw position `index`.
///
/// Returns the character and the raw position just past it, or `None` at end of
/// input. A backslash in the last position has nothing to escape and is dropped.
///
/// # Examples
///
/// ```
/// use mdlite_lib::escape::{Logical, next_logical};
///
/// let text: Vec<char> = "b\\a".chars().collect();
/// assert_eq!(next_logical(&text, 1), Some((Logical::escaped('a'), 3)));
/// assert_eq!(next_logical(&text, 3), None);
/// ```
pub fn next_logical(text: &[char], index: usize) -> Option<(Logical, usize)> {
    let &ch = text.get(index)?;
    if ch != '\\' {
        return Some((Logical::plain(ch), index + 1));
    }
    // Trailing lone backslash
    let &escaped = text.get(index + 1)?;
    Some((Logical::escaped(escaped), index + 2))
}

/// Look `distance` logical characters ahead of `index` without consuming anything.
///
/// `distance` of one returns the character [`next_logical`] would return.
pub fn peek_logical(text: &[char], index: usize, distance: NonZeroUsize) -> Option<Logical> {
    let mut cursor = index;
    let mut current = None;
    for _ in 0..distance.get() {
        let (logical, next) = next_logical(text, cursor)?;
        current = Some(logical);
        cursor = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn distance(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_plain_character() {
        let text = chars("a");
        assert_eq!(next_logical(&text, 0), Some((Logical::plain('a'), 1)));
    }

    #[test]
    fn test_escaped_character() {
        let text = chars("\\a");
        assert_eq!(next_logical(&text, 0), Some((Logical::escaped('a'), 2)));
    }

    #[test]
    fn test_escape_at_any_index() {
        let text = chars("b\\a");
        assert_eq!(next_logical(&text, 1), Some((Logical::escaped('a'), 3)));
    }

    #[test]
    fn test_trailing_backslash_is_end_of_input() {
        let text = chars("b\\");
        assert_eq!(next_logical(&text, 1), None);
    }

    #[test]
    fn test_index_out_of_range() {
        let text = chars("b\\a");
        assert_eq!(next_logical(&text, 3), None);
        assert_eq!(next_logical(&text, 10), None);
    }

    #[test]
    fn test_escaped_backslash() {
        let text = chars("\\\\x");
        assert_eq!(next_logical(&text, 0), Some((Logical::escaped('\\'), 2)));
        assert_eq!(next_logical(&text, 2), Some((Logical::plain('x'), 3)));
    }

    #[test]
    fn test_escaped_underscore_is_not_delimiter() {
        let text = chars("\\__");
        let (first, next) = next_logical(&text, 0).unwrap();
        assert!(!first.is_delimiter());
        let (second, _) = next_logical(&text, next).unwrap();
        assert!(second.is_delimiter());
    }

    #[test]
    fn test_peek_counts_logical_characters() {
        let text = chars("a\\_b");
        assert_eq!(peek_logical(&text, 0, distance(1)), Some(Logical::plain('a')));
        assert_eq!(peek_logical(&text, 0, distance(2)), Some(Logical::escaped('_')));
        assert_eq!(peek_logical(&text, 0, distance(3)), Some(Logical::plain('b')));
        assert_eq!(peek_logical(&text, 0, distance(4)), None);
    }

    #[test]
    fn test_peek_past_trailing_backslash() {
        let text = chars("a\\");
        assert_eq!(peek_logical(&text, 0, distance(1)), Some(Logical::plain('a')));
        assert_eq!(peek_logical(&text, 0, distance(2)), None);
    }

    #[test]
    fn test_unicode_positions_are_scalar_values() {
        let text = chars("é\\ü");
        assert_eq!(next_logical(&text, 0), Some((Logical::plain('é'), 1)));
        assert_eq!(next_logical(&text, 1), Some((Logical::escaped('ü'), 3)));
    }
}
