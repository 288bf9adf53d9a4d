//! # mdlite
//!
//! Renders a small Markdown dialect to HTML:
//!
//! - `\x` escapes any character, so `\_` is a literal underscore
//! - a line feed becomes `<br>`
//! - `_text_` becomes `<em>text</em>` and `__text__` becomes `<strong>text</strong>`,
//!   with italic allowed inside bold
//!
//! ```
//! use mdlite_lib::render_to_html;
//!
//! assert_eq!(render_to_html("__bold _and italic_ text__"), "<strong>bold <em>and italic</em> text</strong>");
//! assert_eq!(render_to_html("snake_case_stays"), "snake_case_stays");
//! ```

pub mod config;
pub mod emphasis;
pub mod escape;
pub mod exit_codes;
pub mod file_processor;
pub mod render;
pub mod symbols;

pub use crate::config::Config;
pub use crate::render::{HtmlRenderer, render_to_html, render_with_symbols};
pub use crate::symbols::SymbolTable;
