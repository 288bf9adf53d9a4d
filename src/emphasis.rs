//! Underscore emphasis recognition
//!
//! `_text_` renders as `<em>` and `__text__` as `<strong>`. One level of nesting
//! is supported: italic inside bold. Bold never opens inside italic.
//!
//! Whether an underscore opens or closes a field depends on the logical
//! character before it and at most two logical characters after it:
//!
//! - An opener must follow nothing, whitespace or another delimiter, and must be
//!   followed by a non-whitespace character.
//! - A closer must follow a non-whitespace character, and must be followed by
//!   nothing, whitespace or another delimiter. This keeps `a_b_c` literal.
//!
//! Anything that does not satisfy the grammar falls back to literal text: an
//! unterminated field is emitted as its opening delimiter followed by the
//! rendered content, and a field whose content is all ASCII digits keeps its
//! delimiters (`_14_` stays `_14_`).

use std::num::NonZeroUsize;

use crate::escape::{Logical, next_logical, peek_logical};
use crate::symbols::SymbolTable;

/// An unescaped underscore
pub(crate) const DELIMITER: Logical = Logical { ch: '_', escaped: false };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `_`, renders as `<em>`
    Single,
    /// `__`, renders as `<strong>`
    Double,
}

impl Delimiter {
    pub fn width(self) -> usize {
        match self {
            Delimiter::Single => 1,
            Delimiter::Double => 2,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Delimiter::Single => "_",
            Delimiter::Double => "__",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Delimiter::Single => "em",
            Delimiter::Double => "strong",
        }
    }
}

/// Where the recognizer currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Outside,
    Italic,
    Bold,
    ItalicInsideBold,
}

/// A resolved emphasis field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Rendered HTML span or literal fallback
    pub value: String,
    /// Raw position of the opening underscore
    pub start: usize,
    /// Raw characters covered, at least 1 unless resolved past the end of input
    pub consumed: usize,
}

impl Field {
    fn literal(start: usize) -> Self {
        Self {
            value: DELIMITER.ch.to_string(),
            start,
            consumed: 1,
        }
    }

    /// Raw position just past the field
    pub fn end(&self) -> usize {
        self.start + self.consumed
    }
}

fn lookahead(text: &[char], index: usize, distance: usize) -> Option<Logical> {
    NonZeroUsize::new(distance).and_then(|distance| peek_logical(text, index, distance))
}

/// The `width - 1` characters after `index` are delimiters; returns the character after them.
fn after_run(text: &[char], index: usize, delimiter: Delimiter) -> Option<Option<Logical>> {
    let width = delimiter.width();
    if !(1..width).all(|distance| lookahead(text, index, distance).is_some_and(Logical::is_delimiter)) {
        return None;
    }
    Some(lookahead(text, index, width))
}

/// Can the underscore just before `index` open a `delimiter` field?
pub fn should_open(text: &[char], index: usize, preceding: Option<Logical>, delimiter: Delimiter) -> bool {
    let at_boundary = preceding.is_none_or(|prev| prev.is_whitespace() || prev.is_delimiter());
    at_boundary
        && after_run(text, index, delimiter).is_some_and(|next| next.is_some_and(|next| !next.is_whitespace()))
}

/// Can the underscore just before `index` close a `delimiter` field?
pub fn should_close(text: &[char], index: usize, preceding: Option<Logical>, delimiter: Delimiter) -> bool {
    let attached = preceding.is_some_and(|prev| !prev.is_whitespace());
    attached
        && after_run(text, index, delimiter)
            .is_some_and(|next| next.is_none_or(|next| next.is_whitespace() || next.is_delimiter()))
}

fn is_numeric(content: &str) -> bool {
    !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves underscore runs over one input.
///
/// Holds no mutable state; every call walks its own cursor.
pub struct Recognizer<'a> {
    text: &'a [char],
    symbols: &'a SymbolTable,
}

impl<'a> Recognizer<'a> {
    pub fn new(text: &'a [char], symbols: &'a SymbolTable) -> Self {
        Self { text, symbols }
    }

    /// Resolve the unescaped underscore at raw position `start`, seen from `scope`.
    ///
    /// `preceding` is the logical character before the underscore. From `Outside`
    /// the run may open bold or italic; from `Bold` it may open a nested italic.
    /// Everything else yields a literal underscore.
    ///
    /// `start` should point at an unescaped underscore. Any other position
    /// resolves to the logical character found there, as plain text.
    pub fn resolve_field(&self, start: usize, preceding: Option<Logical>, scope: Scope) -> Field {
        match next_logical(self.text, start) {
            Some((current, _)) if current.is_delimiter() => {}
            Some((current, next)) => {
                let mut value = String::new();
                self.symbols.push_tagged(&mut value, current.ch);
                return Field {
                    value,
                    start,
                    consumed: next - start,
                };
            }
            None => {
                return Field {
                    value: String::new(),
                    start,
                    consumed: 0,
                };
            }
        }

        let after = start + 1;
        match scope {
            Scope::Outside if should_open(self.text, after, preceding, Delimiter::Double) => self.scan_bold(start),
            Scope::Outside if should_open(self.text, after, preceding, Delimiter::Single) => {
                self.scan_italic(start, Scope::Italic)
            }
            Scope::Bold if should_open(self.text, after, preceding, Delimiter::Single) => {
                self.scan_italic(start, Scope::ItalicInsideBold)
            }
            _ => Field::literal(start),
        }
    }

    fn scan_italic(&self, start: usize, scope: Scope) -> Field {
        let mut index = start + Delimiter::Single.width();
        let mut preceding = DELIMITER;
        let mut content = String::new();
        // A bold opener was kept as text and its closing pair has not been seen yet
        let mut open_bold_text = false;

        while let Some((current, next)) = next_logical(self.text, index) {
            if !current.is_delimiter() {
                self.symbols.push_tagged(&mut content, current.ch);
                index = next;
            } else if scope == Scope::ItalicInsideBold && self.closes_bold(next, preceding) {
                // The enclosing bold ends here and this italic never closed
                return self.unterminated(start, index, content, Delimiter::Single);
            } else if scope == Scope::Italic && should_open(self.text, next, Some(preceding), Delimiter::Double) {
                // Bold never opens inside italic
                content.push_str(Delimiter::Double.marker());
                open_bold_text = true;
                index = next + 1;
            } else if scope == Scope::Italic
                && open_bold_text
                && should_close(self.text, next, Some(preceding), Delimiter::Double)
            {
                content.push_str(Delimiter::Double.marker());
                open_bold_text = false;
                index = next + 1;
            } else if !content.is_empty() && should_close(self.text, next, Some(preceding), Delimiter::Single) {
                return self.finish(start, next, content, Delimiter::Single);
            } else {
                content.push(DELIMITER.ch);
                index = next;
            }
            preceding = current;
        }

        self.unterminated(start, self.text.len(), content, Delimiter::Single)
    }

    /// The underscore just before `index` starts a run of exactly two that closes bold
    fn closes_bold(&self, index: usize, preceding: Logical) -> bool {
        !lookahead(self.text, index, 2).is_some_and(Logical::is_delimiter)
            && should_close(self.text, index, Some(preceding), Delimiter::Double)
    }

    fn scan_bold(&self, start: usize) -> Field {
        let mut index = start + Delimiter::Double.width();
        let mut preceding = DELIMITER;
        let mut content = String::new();

        while let Some((current, next)) = next_logical(self.text, index) {
            if !current.is_delimiter() {
                self.symbols.push_tagged(&mut content, current.ch);
                index = next;
            } else if !content.is_empty() && should_close(self.text, next, Some(preceding), Delimiter::Double) {
                // Both closing underscores are unescaped, one raw position each
                return self.finish(start, next + 1, content, Delimiter::Double);
            } else {
                let nested = self.resolve_field(index, Some(preceding), Scope::Bold);
                content.push_str(&nested.value);
                index = nested.end();
            }
            preceding = current;
        }

        self.unterminated(start, self.text.len(), content, Delimiter::Double)
    }

    fn finish(&self, start: usize, end: usize, content: String, delimiter: Delimiter) -> Field {
        let value = if is_numeric(&content) {
            log::trace!("numeric {} field at {start} kept literal", delimiter.tag());
            let marker = delimiter.marker();
            format!("{marker}{content}{marker}")
        } else {
            let tag = delimiter.tag();
            format!("<{tag}>{content}</{tag}>")
        };
        Field {
            value,
            start,
            consumed: end - start,
        }
    }

    fn unterminated(&self, start: usize, end: usize, content: String, delimiter: Delimiter) -> Field {
        log::trace!("unterminated {} field at {start}", delimiter.tag());
        Field {
            value: format!("{}{content}", delimiter.marker()),
            start,
            consumed: end - start,
        }
    }
}
