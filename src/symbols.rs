//! Character to HTML substitution table
//!
//! Every logical character passes through a [`SymbolTable`] on its way into the
//! output. Characters without an entry are copied unchanged.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The built-in table: a line feed becomes a `<br>` tag.
pub static DEFAULT_SYMBOLS: LazyLock<SymbolTable> = LazyLock::new(SymbolTable::default);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: HashMap<char, String>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::empty().with_entry('\n', "<br>")
    }
}

impl SymbolTable {
    /// A table that maps every character to itself
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace the substitution for `ch`
    pub fn with_entry(mut self, ch: char, tag: impl Into<String>) -> Self {
        self.entries.insert(ch, tag.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by character, for stable display
    pub fn entries(&self) -> Vec<(char, &str)> {
        let mut entries: Vec<(char, &str)> = self.entries.iter().map(|(&ch, tag)| (ch, tag.as_str())).collect();
        entries.sort_unstable_by_key(|&(ch, _)| ch);
        entries
    }

    /// HTML form of a single logical character.
    ///
    /// ```
    /// use mdlite_lib::symbols::DEFAULT_SYMBOLS;
    ///
    /// assert_eq!(DEFAULT_SYMBOLS.tag('\n'), "<br>");
    /// assert_eq!(DEFAULT_SYMBOLS.tag('a'), "a");
    /// ```
    pub fn tag(&self, ch: char) -> Cow<'_, str> {
        match self.entries.get(&ch) {
            Some(tag) => Cow::Borrowed(tag.as_str()),
            None => Cow::Owned(ch.to_string()),
        }
    }

    /// Append the HTML form of `ch` to `out` without an intermediate allocation
    pub fn push_tagged(&self, out: &mut String, ch: char) {
        match self.entries.get(&ch) {
            Some(tag) => out.push_str(tag),
            None => out.push(ch),
        }
    }
}
