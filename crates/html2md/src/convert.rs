//! The conversion driver.
//!
//! One synchronous left-to-right pass: the scanner produces events, each
//! tag is classified, frames are pushed and popped on the element stack,
//! and output flows through the composer, or into the table converter
//! while a table is open. Every piece of per-call state lives on this
//! struct, so concurrent conversions never share anything mutable.

#![allow(clippy::collapsible_if, clippy::too_many_lines)]

use log::debug;
use url::Url;

use crate::classify::{SemanticAction, classify};
use crate::composer::Composer;
use crate::error::{ConversionError, MAX_INPUT_LEN, Result};
use crate::options::ConversionOptions;
use crate::scanner::{Event, Scanner, TagToken};
use crate::stack::{ElementFrame, ElementStack, FrameKind};
use crate::table::{Alignment, TableModel};
use crate::text::{collapse_whitespace_cow, decode_entities_cow, escape_markdown_cow};

/// Convert HTML to Markdown with the given options.
///
/// # Errors
///
/// This never fails on malformed markup; the only error is
/// [`ConversionError::InputTooLarge`] for inputs beyond the input size
/// limit.
pub fn convert_html(html: &str, options: &ConversionOptions) -> Result<String> {
    if html.len() > MAX_INPUT_LEN {
        return Err(ConversionError::InputTooLarge {
            size: html.len(),
            limit: MAX_INPUT_LEN,
        });
    }

    debug!("converting {} bytes of HTML", html.len());

    let mut conversion = Conversion::new(options);
    for event in Scanner::new(html) {
        conversion.handle_event(event);
    }
    let markdown = conversion.finish();

    debug!("conversion produced {} bytes of Markdown", markdown.len());
    Ok(markdown)
}

/// Elements that never take content and never produce a frame.
fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements hidden by attribute or inline style are skipped wholesale.
fn is_hidden_element(tok: &TagToken) -> bool {
    if tok.attr("hidden").is_some() {
        return true;
    }
    if tok.attr("aria-hidden") == Some("true") {
        return true;
    }
    if let Some(style) = tok.attr("style") {
        let compact: String = style
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if compact.contains("display:none") || compact.contains("visibility:hidden") {
            return true;
        }
    }
    false
}

/// Fence info string from a `<code class="language-…">` element.
fn fence_language(tok: &TagToken) -> Option<String> {
    tok.attr("class")?
        .split_ascii_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
        .map(str::to_string)
}

struct Conversion<'a> {
    options: &'a ConversionOptions,
    composer: Composer,
    stack: ElementStack,
    /// Buffered tables, innermost last.
    tables: Vec<TableModel>,
    /// A fence opener has been written but its first content line has
    /// not; the newline after the info string is still owed.
    fence_pending: bool,
}

impl<'a> Conversion<'a> {
    fn new(options: &'a ConversionOptions) -> Self {
        Self {
            options,
            composer: Composer::new(),
            stack: ElementStack::default(),
            tables: Vec::new(),
            fence_pending: false,
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Text(text) => self.handle_text(text),
            // Raw-text regions only exist under script/style; both drop
            // their content.
            Event::RawText(_) | Event::Comment(_) => {}
            Event::Tag(tok) => {
                if tok.closing {
                    self.handle_close(&tok);
                } else {
                    self.handle_open(&tok);
                }
            }
        }
    }

    fn finish(mut self) -> String {
        // Frames still open at end of input are force-closed innermost
        // first, so no construct stays unterminated.
        while let Some(frame) = self.stack.pop() {
            self.close_frame(frame);
        }
        self.composer.finalize()
    }

    fn handle_text(&mut self, text: &str) {
        if self.stack.hidden_depth() > 0 {
            return;
        }
        if self.stack.in_title() && !self.options.include_title {
            return;
        }

        let decoded = decode_entities_cow(text);

        if self.stack.in_code_block() {
            if self.fence_pending {
                if decoded.trim().is_empty() {
                    // Markup whitespace between <pre> and <code>.
                    return;
                }
                self.composer.raw("\n");
                self.fence_pending = false;
            }
            self.composer.raw(&decoded);
            return;
        }

        // Whitespace between table structure tags is markup, not content.
        if self.stack.in_table() && !self.stack.in_table_cell() && decoded.trim().is_empty() {
            return;
        }

        let escape = !self.stack.in_inline_code();
        self.composer.text(&decoded, escape);
    }

    fn handle_open(&mut self, tok: &TagToken) {
        let name = tok.name.as_str();
        let void = is_void_element(name);

        if self.stack.hidden_depth() > 0 || is_hidden_element(tok) {
            if !tok.self_closing && !void {
                self.stack.push(ElementFrame::Hidden {
                    name: name.to_string(),
                });
            }
            return;
        }

        match classify(name) {
            SemanticAction::Heading(level) => {
                self.auto_close(
                    FrameKind::Paragraph,
                    &[FrameKind::Blockquote, FrameKind::List, FrameKind::TableCell],
                );
                self.block_break_in_flow();
                let mut marker = "#".repeat(usize::from(level));
                marker.push(' ');
                self.composer.raw(&marker);
                self.stack.push(ElementFrame::Heading(level));
            }
            SemanticAction::Paragraph => {
                self.auto_close(
                    FrameKind::Paragraph,
                    &[FrameKind::Blockquote, FrameKind::List, FrameKind::TableCell],
                );
                self.block_break_in_flow();
                self.stack.push(ElementFrame::Paragraph);
            }
            SemanticAction::Blockquote => {
                self.composer.block_break();
                self.stack.push(ElementFrame::Blockquote);
                self.sync_prefix();
            }
            SemanticAction::Preformatted => {
                self.composer.block_break();
                self.composer.raw("```");
                self.fence_pending = true;
                self.stack.push(ElementFrame::CodeBlock);
            }
            SemanticAction::Code => {
                if self.stack.in_code_block() {
                    if self.fence_pending {
                        if let Some(language) = fence_language(tok) {
                            self.composer.raw(&language);
                        }
                    }
                    self.stack.push(ElementFrame::FenceCode);
                } else {
                    let mark = self.composer.open_inline("`");
                    self.stack.push(ElementFrame::InlineCode { mark });
                }
            }
            SemanticAction::HorizontalRule => {
                self.composer.block_break();
                self.composer.raw("---");
                self.composer.block_break();
            }
            SemanticAction::LineBreak => {
                if self.stack.in_table_cell() {
                    self.composer.raw("<br>");
                } else {
                    self.composer.hard_break();
                }
            }
            SemanticAction::Strong => {
                let mark = self.composer.open_inline("**");
                self.stack.push(ElementFrame::Strong { mark });
            }
            SemanticAction::Emphasis => {
                let mark = self.composer.open_inline("*");
                self.stack.push(ElementFrame::Emphasis { mark });
            }
            SemanticAction::Strikethrough => {
                let mark = self.composer.open_inline("~~");
                self.stack.push(ElementFrame::Strikethrough { mark });
            }
            SemanticAction::Link => {
                let href = tok.attr("href").and_then(|raw| self.resolve_url(raw));
                if let Some(href) = href {
                    let title = if self.options.include_link_title {
                        tok.attr("title")
                            .map(|t| decode_entities_cow(t).trim().to_string())
                            .filter(|t| !t.is_empty())
                    } else {
                        None
                    };
                    let mark = self.composer.open_inline("[");
                    self.stack.push(ElementFrame::Link {
                        href: Some(href),
                        title,
                        mark,
                    });
                } else {
                    // Nothing to link to: the wrapper is dropped and the
                    // label text flows through on its own.
                    self.stack.push(ElementFrame::Link {
                        href: None,
                        title: None,
                        mark: 0,
                    });
                }
            }
            SemanticAction::Image => {
                let alt = tok
                    .attr("alt")
                    .map(|a| {
                        let decoded = decode_entities_cow(a);
                        let collapsed = collapse_whitespace_cow(&decoded);
                        escape_markdown_cow(collapsed.trim()).into_owned()
                    })
                    .unwrap_or_default();
                match tok.attr("src").and_then(|raw| self.resolve_url(raw)) {
                    Some(src) => {
                        let mut image = String::with_capacity(alt.len() + src.len() + 5);
                        image.push_str("![");
                        image.push_str(&alt);
                        image.push_str("](");
                        image.push_str(&src);
                        image.push(')');
                        self.composer.raw(&image);
                    }
                    None if !alt.is_empty() => self.composer.raw(&alt),
                    None => {}
                }
            }
            SemanticAction::List { ordered } => {
                if self.stack.in_table_cell() {
                    return;
                }
                if self.stack.list_depth() == 0 {
                    self.composer.block_break();
                } else {
                    self.composer.line_break();
                }
                self.stack.push(ElementFrame::List { ordered, index: 0 });
            }
            SemanticAction::ListItem => {
                if self.stack.in_table_cell() {
                    return;
                }
                self.auto_close(FrameKind::ListItem, &[FrameKind::List, FrameKind::Table]);
                self.composer.line_break();

                let depth = self.stack.list_depth().max(1);
                let marker = match self.stack.innermost_list_mut() {
                    Some(ElementFrame::List { ordered: true, index }) => {
                        *index += 1;
                        format!("{}{} ", *index, self.options.ordered_list_marker)
                    }
                    _ => format!("{} ", self.options.unordered_list_marker),
                };
                let mut prefix = "  ".repeat(depth - 1);
                prefix.push_str(&marker);
                self.composer.raw(&prefix);
                self.stack.push(ElementFrame::ListItem {
                    mark: self.composer.position(),
                });
            }
            SemanticAction::Table => {
                self.composer.block_break();
                self.stack.push(ElementFrame::Table);
                self.tables.push(TableModel::default());
            }
            SemanticAction::TableSection => {
                if self.stack.in_table() {
                    self.stack.push(ElementFrame::TableSection);
                }
            }
            SemanticAction::TableRow => {
                if !self.stack.in_table() {
                    return;
                }
                self.auto_close(FrameKind::TableRow, &[FrameKind::Table]);
                if let Some(model) = self.tables.last_mut() {
                    model.start_row();
                }
                self.stack.push(ElementFrame::TableRow);
            }
            SemanticAction::TableCell { header } => {
                if !self.stack.in_table() {
                    return;
                }
                self.auto_close(FrameKind::TableCell, &[FrameKind::TableRow, FrameKind::Table]);
                if self.stack.find_innermost(FrameKind::TableRow, None).is_none() {
                    // A cell with its <tr> omitted still needs a row.
                    if let Some(model) = self.tables.last_mut() {
                        model.start_row();
                    }
                    self.stack.push(ElementFrame::TableRow);
                }
                let alignment = Alignment::from_attrs(tok.attr("align"), tok.attr("style"));
                if let Some(model) = self.tables.last_mut() {
                    model.start_cell(header, alignment);
                }
                self.composer.push_capture();
                self.stack.push(ElementFrame::TableCell);
            }
            SemanticAction::Title => {
                if self.options.include_title {
                    self.composer.block_break();
                    self.composer.raw("# ");
                }
                self.stack.push(ElementFrame::Title);
            }
            SemanticAction::Ignore => {
                // Raw-text containers: the scanner already swallowed the
                // content; the markup itself emits nothing.
            }
            SemanticAction::Transparent => {
                if self.options.preserve_unsupported_tags {
                    self.composer.raw(tok.raw);
                    if !tok.self_closing && !void {
                        self.stack.push(ElementFrame::Passthrough {
                            name: name.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn handle_close(&mut self, tok: &TagToken) {
        let name = tok.name.as_str();

        if self.stack.hidden_depth() > 0 {
            if let Some(index) = self.stack.find_innermost(FrameKind::Hidden, Some(name)) {
                self.pop_through(index);
            }
            return;
        }

        let kind = match classify(name) {
            SemanticAction::Heading(_) => FrameKind::Heading,
            SemanticAction::Paragraph => FrameKind::Paragraph,
            SemanticAction::Blockquote => FrameKind::Blockquote,
            SemanticAction::Preformatted => FrameKind::CodeBlock,
            SemanticAction::Code => {
                if self.stack.in_inline_code() {
                    FrameKind::InlineCode
                } else {
                    FrameKind::FenceCode
                }
            }
            SemanticAction::Strong => FrameKind::Strong,
            SemanticAction::Emphasis => FrameKind::Emphasis,
            SemanticAction::Strikethrough => FrameKind::Strikethrough,
            SemanticAction::Link => FrameKind::Link,
            SemanticAction::List { .. } => FrameKind::List,
            SemanticAction::ListItem => FrameKind::ListItem,
            SemanticAction::Table => FrameKind::Table,
            SemanticAction::TableSection => FrameKind::TableSection,
            SemanticAction::TableRow => FrameKind::TableRow,
            SemanticAction::TableCell { .. } => FrameKind::TableCell,
            SemanticAction::Title => FrameKind::Title,
            SemanticAction::HorizontalRule
            | SemanticAction::LineBreak
            | SemanticAction::Image
            | SemanticAction::Ignore => {
                return;
            }
            SemanticAction::Transparent => {
                if self.options.preserve_unsupported_tags {
                    if let Some(index) = self.stack.find_innermost(FrameKind::Passthrough, Some(name))
                    {
                        self.pop_through(index);
                    }
                }
                return;
            }
        };

        // Tolerant close: pop to the nearest matching frame, closing
        // whatever sits above it on the way; no match is a no-op.
        if let Some(index) = self.stack.find_innermost(kind, None) {
            self.pop_through(index);
        }
    }

    /// Pop and close every frame at or above `index`.
    fn pop_through(&mut self, index: usize) {
        while self.stack.len() > index {
            if let Some(frame) = self.stack.pop() {
                if self.stack.len() > index && !frame.auto_closeable() {
                    // Tag soup: something like </div> arrived while an
                    // inline construct was still open.
                    debug!("implicitly closing mismatched {:?}", frame.kind());
                }
                self.close_frame(frame);
            }
        }
    }

    /// Close a still-open sibling of `kind` (list item, paragraph, table
    /// cell) unless a barrier frame sits above it.
    fn auto_close(&mut self, kind: FrameKind, barriers: &[FrameKind]) {
        if let Some(index) = self.stack.find_above_barrier(kind, barriers) {
            self.pop_through(index);
        }
    }

    /// The one place that knows how to terminate each frame kind; used by
    /// explicit closes, implicit closes and the end-of-input force-close
    /// alike.
    fn close_frame(&mut self, frame: ElementFrame) {
        match frame {
            ElementFrame::Paragraph | ElementFrame::Heading(_) => {
                // Inside a list item a blank line would detach the item
                // from its marker; a plain line break keeps it intact.
                if self.stack.in_list_item() {
                    self.composer.line_break();
                } else {
                    self.composer.block_break();
                }
            }
            ElementFrame::Blockquote => {
                self.sync_prefix();
                self.composer.block_break();
            }
            ElementFrame::List { .. } => {
                if self.stack.list_depth() == 0 {
                    self.composer.block_break();
                } else {
                    self.composer.line_break();
                }
            }
            ElementFrame::ListItem { .. } => self.composer.line_break(),
            ElementFrame::Strong { mark } => self.composer.close_inline("**", mark),
            ElementFrame::Emphasis { mark } => self.composer.close_inline("*", mark),
            ElementFrame::Strikethrough { mark } => self.composer.close_inline("~~", mark),
            ElementFrame::InlineCode { mark } => self.composer.close_inline("`", mark),
            ElementFrame::Link { href, title, mark } => {
                if let Some(href) = href {
                    self.composer.close_link(mark, &href, title.as_deref());
                }
            }
            ElementFrame::CodeBlock => {
                if self.fence_pending {
                    self.composer.raw("\n");
                    self.fence_pending = false;
                }
                self.composer.ensure_line_start();
                self.composer.raw("```");
                self.composer.block_break();
            }
            ElementFrame::FenceCode
            | ElementFrame::TableSection
            | ElementFrame::TableRow
            | ElementFrame::Hidden { .. } => {}
            ElementFrame::TableCell => {
                let captured = self.composer.pop_capture();
                let text = collapse_whitespace_cow(&captured).trim().to_string();
                if let Some(model) = self.tables.last_mut() {
                    model.fill_cell(text);
                }
            }
            ElementFrame::Table => {
                if let Some(model) = self.tables.pop() {
                    if let Some(rendered) = model.render(self.options.max_table_column_width) {
                        self.composer.block_break();
                        self.composer.raw(&rendered);
                        self.composer.block_break();
                    }
                }
            }
            ElementFrame::Title => {
                if self.options.include_title {
                    self.composer.block_break();
                }
            }
            ElementFrame::Passthrough { name } => {
                let mut closing = String::with_capacity(name.len() + 3);
                closing.push_str("</");
                closing.push_str(&name);
                closing.push('>');
                self.composer.raw(&closing);
            }
        }
    }

    /// Request a block boundary, degraded inside a list item: a blank
    /// line right after a `- ` marker would orphan it, and one later in
    /// the item would split the item in two.
    fn block_break_in_flow(&mut self) {
        match self.stack.innermost_list_item_mark() {
            None => self.composer.block_break(),
            Some(mark) if mark == self.composer.position() => {}
            Some(_) => self.composer.line_break(),
        }
    }

    /// Recompute the composer's line prefix from the blockquote depth.
    fn sync_prefix(&mut self) {
        self.composer.set_prefix("> ".repeat(self.stack.blockquote_depth()));
    }

    /// Decode and resolve an `href`/`src` value. Returns `None` for
    /// empty destinations, which drop the construct they belong to.
    fn resolve_url(&self, raw: &str) -> Option<String> {
        let decoded = decode_entities_cow(raw);
        let href = decoded.trim();
        if href.is_empty() {
            return None;
        }

        if let Some(base) = self.options.base_url.as_deref() {
            if !href.starts_with('#') {
                if let Ok(joined) = Url::parse(base).and_then(|base| base.join(href)) {
                    return Some(joined.into());
                }
            }
        }

        Some(href.to_string())
    }
}
