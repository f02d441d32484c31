//! HTML to Markdown conversion.
//!
//! A single-pass, tag-soup-tolerant transducer: a character scanner walks
//! the input once, each tag is mapped to a semantic action by a fixed
//! classification table, an element stack tracks nesting (with implicit
//! closes where HTML permits omitted closing tags), and an output
//! composer emits normalized, escaped Markdown. `<table>` structures are
//! buffered and flushed as aligned GitHub-flavored tables when they
//! close.
//!
//! Malformed markup never fails a conversion; offending fragments degrade
//! to literal text and mismatched tags are reconciled by the stack.
//!
//! ```
//! let markdown = html2md::convert("<h1>Title</h1><p>Hello <b>world</b></p>").unwrap();
//! assert_eq!(markdown, "# Title\n\nHello **world**\n");
//! ```
//!
//! Conversions share no mutable state, so they can run on any number of
//! threads concurrently.

mod classify;
mod composer;
mod convert;
mod scanner;
mod stack;
mod table;
mod text;

pub mod error;
pub mod options;

pub use crate::convert::convert_html;
pub use crate::error::{ConversionError, Result};
pub use crate::options::ConversionOptions;

/// Convert HTML to Markdown with default options.
///
/// # Errors
///
/// Returns [`ConversionError::InputTooLarge`] for inputs beyond the
/// input size limit; malformed HTML is never an error.
pub fn convert(html: &str) -> Result<String> {
    convert_html(html, &ConversionOptions::default())
}

/// Convert HTML to Markdown with explicit options.
///
/// # Errors
///
/// Returns [`ConversionError::InputTooLarge`] for inputs beyond the
/// input size limit; malformed HTML is never an error.
pub fn convert_with_options(html: &str, options: &ConversionOptions) -> Result<String> {
    convert_html(html, options)
}
