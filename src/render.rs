//! Markdown to HTML rendering
//!
//! The renderer walks the input outside of any emphasis field, copying tagged
//! characters and handing every unescaped underscore to the [`Recognizer`].
//! Rendering never fails: input that does not form emphasis is emitted as
//! literal text.

use crate::emphasis::{DELIMITER, Recognizer, Scope};
use crate::escape::next_logical;
use crate::symbols::{DEFAULT_SYMBOLS, SymbolTable};

/// Render `markdown` to HTML with the default symbol table.
///
/// # Examples
///
/// ```
/// use mdlite_lib::render_to_html;
///
/// assert_eq!(render_to_html("a _b_ c"), "a <em>b</em> c");
/// assert_eq!(render_to_html("a __b__ c"), "a <strong>b</strong> c");
/// assert_eq!(render_to_html("a_b_c"), "a_b_c");
/// assert_eq!(render_to_html("line\nbreak"), "line<br>break");
/// ```
pub fn render_to_html(markdown: &str) -> String {
    render_with_symbols(markdown, &DEFAULT_SYMBOLS)
}

/// Render `markdown` to HTML, substituting characters through `symbols`.
pub fn render_with_symbols(markdown: &str, symbols: &SymbolTable) -> String {
    let text: Vec<char> = markdown.chars().collect();
    let recognizer = Recognizer::new(&text, symbols);
    let mut html = String::with_capacity(markdown.len());
    let mut index = 0;
    let mut preceding = None;

    while let Some((current, next)) = next_logical(&text, index) {
        if current.is_delimiter() {
            let field = recognizer.resolve_field(index, preceding, Scope::Outside);
            html.push_str(&field.value);
            index = field.end();
            preceding = Some(DELIMITER);
        } else {
            symbols.push_tagged(&mut html, current.ch);
            index = next;
            preceding = Some(current);
        }
    }

    html
}

/// A renderer bound to a symbol table.
///
/// The renderer is immutable and can be shared between threads; each call to
/// [`HtmlRenderer::render`] owns its own cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderer {
    symbols: SymbolTable,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::with_symbols(DEFAULT_SYMBOLS.clone())
    }

    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn render(&self, markdown: &str) -> String {
        render_with_symbols(markdown, &self.symbols)
    }
}
