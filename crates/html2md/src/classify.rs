//! Mapping from tag names to semantic markup actions.
//!
//! The mapping is a process-wide, read-only table built on first use; it is
//! never mutated by a conversion, so concurrent conversions share it
//! without coordination.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The markup action a tag stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SemanticAction {
    /// `h1`–`h6`, with the heading level.
    Heading(u8),
    /// `p`.
    Paragraph,
    /// `blockquote`.
    Blockquote,
    /// `pre`: a fenced code block.
    Preformatted,
    /// `code`: inline code outside `pre`, fence metadata inside it.
    Code,
    /// `hr`.
    HorizontalRule,
    /// `br`.
    LineBreak,
    /// `strong` / `b`.
    Strong,
    /// `em` / `i` / `cite` / `dfn`.
    Emphasis,
    /// `del` / `s`.
    Strikethrough,
    /// `a`.
    Link,
    /// `img`.
    Image,
    /// `ul` / `ol`.
    List {
        /// True for `ol`.
        ordered: bool,
    },
    /// `li`.
    ListItem,
    /// `table`.
    Table,
    /// `thead` / `tbody` / `tfoot`: structural, no output of their own.
    TableSection,
    /// `tr`.
    TableRow,
    /// `td` / `th`.
    TableCell {
        /// True for `th`.
        header: bool,
    },
    /// `title`.
    Title,
    /// `script` / `style`: markup and content are both dropped.
    Ignore,
    /// No Markdown equivalent: markup dropped (or passed through raw),
    /// content still converted.
    Transparent,
}

static TAG_ACTIONS: Lazy<HashMap<&'static str, SemanticAction>> = Lazy::new(|| {
    use SemanticAction::{
        Blockquote, Code, Emphasis, Heading, HorizontalRule, Ignore, Image, LineBreak, Link, List,
        ListItem, Paragraph, Preformatted, Strikethrough, Strong, Table, TableCell, TableRow,
        TableSection, Title,
    };

    HashMap::from([
        ("h1", Heading(1)),
        ("h2", Heading(2)),
        ("h3", Heading(3)),
        ("h4", Heading(4)),
        ("h5", Heading(5)),
        ("h6", Heading(6)),
        ("p", Paragraph),
        ("blockquote", Blockquote),
        ("pre", Preformatted),
        ("code", Code),
        ("hr", HorizontalRule),
        ("br", LineBreak),
        ("strong", Strong),
        ("b", Strong),
        ("em", Emphasis),
        ("i", Emphasis),
        ("cite", Emphasis),
        ("dfn", Emphasis),
        ("del", Strikethrough),
        ("s", Strikethrough),
        ("a", Link),
        ("img", Image),
        ("ul", List { ordered: false }),
        ("ol", List { ordered: true }),
        ("li", ListItem),
        ("table", Table),
        ("thead", TableSection),
        ("tbody", TableSection),
        ("tfoot", TableSection),
        ("tr", TableRow),
        ("td", TableCell { header: false }),
        ("th", TableCell { header: true }),
        ("title", Title),
        ("script", Ignore),
        ("style", Ignore),
    ])
});

/// Classify a lower-cased tag name.
///
/// Anything outside the fixed table is transparent: its own markup has no
/// Markdown equivalent but its content is still converted.
pub(crate) fn classify(name: &str) -> SemanticAction {
    TAG_ACTIONS
        .get(name)
        .copied()
        .unwrap_or(SemanticAction::Transparent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_map_to_actions() {
        assert_eq!(classify("h3"), SemanticAction::Heading(3));
        assert_eq!(classify("ol"), SemanticAction::List { ordered: true });
        assert_eq!(classify("th"), SemanticAction::TableCell { header: true });
        assert_eq!(classify("script"), SemanticAction::Ignore);
    }

    #[test]
    fn unknown_tags_are_transparent() {
        assert_eq!(classify("div"), SemanticAction::Transparent);
        assert_eq!(classify("custom-widget"), SemanticAction::Transparent);
    }
}
