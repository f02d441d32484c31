//! Configuration options for HTML to Markdown conversion.

use serde::{Deserialize, Serialize};

/// Options controlling Markdown output.
///
/// Every field is independently toggleable and the defaults produce plain
/// GitHub-flavored output. The struct is plain data so bindings and the CLI
/// can construct or deserialize it without builder ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Character used for unordered list bullets.
    pub unordered_list_marker: char,

    /// Character appended to ordered list indices (`1.` vs `1)`).
    pub ordered_list_marker: char,

    /// Append `title` attributes to links as `[text](href "title")`.
    pub include_link_title: bool,

    /// Emit the document `<title>` as a level-1 heading.
    pub include_title: bool,

    /// Base URL used to resolve relative `href`/`src` attributes.
    ///
    /// Absolute URLs and fragment-only links pass through untouched. When
    /// the base itself fails to parse, relative links are left as-is.
    pub base_url: Option<String>,

    /// Upper bound on the display width table cells are padded to.
    ///
    /// Cell content wider than the cap is never truncated; the column just
    /// stops padding against it.
    pub max_table_column_width: Option<usize>,

    /// Pass tags with no Markdown mapping through as raw HTML instead of
    /// dropping their markup.
    pub preserve_unsupported_tags: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            unordered_list_marker: '-',
            ordered_list_marker: '.',
            include_link_title: true,
            include_title: true,
            base_url: None,
            max_table_column_width: None,
            preserve_unsupported_tags: false,
        }
    }
}
