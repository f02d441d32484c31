//! The output sink that turns normalized text runs and markup directives
//! into Markdown.
//!
//! The composer owns the output buffer and all cursor state: whether the
//! cursor sits at a line start, which break is pending, and the line
//! prefix (blockquote markers) to apply when content arrives. Breaks are
//! requested, not written: consecutive requests coalesce so block
//! boundaries never produce more than one blank line.
//!
//! Table cells capture into a side buffer; while a capture is active,
//! break requests degrade to single spaces and `|` is escaped in
//! emitted text.

use crate::text::{collapse_whitespace_cow, escape_markdown_cow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PendingBreak {
    None,
    Line,
    Block,
}

/// Markdown output buffer plus cursor state.
#[derive(Debug)]
pub(crate) struct Composer {
    out: String,
    /// Applied at the start of every emitted line (blockquote markers).
    prefix: String,
    pending: PendingBreak,
    at_line_start: bool,
    /// Whether any block-level construct was emitted; decides the
    /// trailing-newline policy.
    saw_block: bool,
    /// Capture buffers for table cells, innermost last.
    captures: Vec<String>,
}

impl Composer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            prefix: String::new(),
            pending: PendingBreak::None,
            at_line_start: true,
            saw_block: false,
            captures: Vec::new(),
        }
    }

    /// Replace the line prefix applied to subsequent lines.
    pub fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
    }

    /// Begin capturing emissions into a side buffer (table cell).
    pub fn push_capture(&mut self) {
        self.pending = PendingBreak::None;
        self.captures.push(String::new());
    }

    /// End the innermost capture and return its contents.
    pub fn pop_capture(&mut self) -> String {
        self.pending = PendingBreak::None;
        self.captures.pop().unwrap_or_default()
    }

    fn in_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Current length of the active sink; pending breaks do not move it.
    pub fn position(&self) -> usize {
        self.sink_len()
    }

    fn sink_len(&self) -> usize {
        self.captures.last().map_or(self.out.len(), String::len)
    }

    fn sink(&mut self) -> &mut String {
        if let Some(buf) = self.captures.last_mut() {
            buf
        } else {
            &mut self.out
        }
    }

    /// Request a line boundary before the next content.
    pub fn line_break(&mut self) {
        self.pending = self.pending.max(PendingBreak::Line);
    }

    /// Request a block boundary (one blank line) before the next content.
    pub fn block_break(&mut self) {
        self.pending = self.pending.max(PendingBreak::Block);
        if !self.in_capture() {
            self.saw_block = true;
        }
    }

    /// A forced line break: two trailing spaces plus a newline.
    pub fn hard_break(&mut self) {
        if self.in_capture() {
            // Cells are single-line; the driver emits literal `<br>`.
            return;
        }
        self.saw_block = true;
        if self.out.is_empty() {
            self.pending = PendingBreak::None;
            return;
        }
        self.flush_pending();
        while self.out.ends_with(' ') {
            self.out.pop();
        }
        self.out.push_str("  \n");
        self.at_line_start = true;
    }

    /// Force the cursor to a fresh line without requesting a blank one.
    pub fn ensure_line_start(&mut self) {
        if !self.in_capture() && !self.at_line_start {
            self.out.push('\n');
            self.at_line_start = true;
        }
    }

    fn flush_pending(&mut self) {
        let pending = std::mem::replace(&mut self.pending, PendingBreak::None);

        if self.in_capture() {
            if pending != PendingBreak::None {
                let buf = self.sink();
                if !buf.is_empty() && !buf.ends_with(' ') {
                    buf.push(' ');
                }
            }
            return;
        }

        match pending {
            PendingBreak::None => {}
            PendingBreak::Line => {
                if !self.at_line_start {
                    self.out.push('\n');
                    self.at_line_start = true;
                }
            }
            PendingBreak::Block => {
                if self.out.is_empty() {
                    return;
                }
                if !self.at_line_start {
                    self.out.push('\n');
                }
                if !self.out.ends_with("\n\n") {
                    let separator = self.prefix.trim_end();
                    if !separator.is_empty() {
                        self.out.push_str(separator);
                    }
                    self.out.push('\n');
                }
                self.at_line_start = true;
            }
        }
    }

    /// Append structural text (markers, URLs, rendered tables) without
    /// collapsing or escaping. The line prefix is applied at every line
    /// start the chunk crosses.
    pub fn raw(&mut self, chunk: &str) {
        self.flush_pending();
        self.write_chunk(chunk);
    }

    fn write_chunk(&mut self, chunk: &str) {
        if self.in_capture() {
            self.sink().push_str(chunk);
            return;
        }
        for ch in chunk.chars() {
            if self.at_line_start && ch != '\n' && !self.prefix.is_empty() {
                self.out.push_str(&self.prefix);
            }
            self.out.push(ch);
            self.at_line_start = ch == '\n';
        }
    }

    /// Append literal text: whitespace collapsed, boundary spaces
    /// dropped, Markdown-significant characters escaped unless `escape`
    /// is off (code spans).
    pub fn text(&mut self, text: &str, escape: bool) {
        let collapsed = collapse_whitespace_cow(text);
        if collapsed.is_empty() {
            return;
        }

        if collapsed.as_ref() == " " {
            // Whitespace-only run between tags: keep a single separator
            // space unless a break already supersedes it.
            if self.pending != PendingBreak::None {
                return;
            }
            if self.in_capture() {
                let buf = self.sink();
                if !buf.is_empty() && !buf.ends_with(' ') {
                    buf.push(' ');
                }
            } else if !self.at_line_start && !self.out.is_empty() && !self.out.ends_with(' ') {
                self.out.push(' ');
            }
            return;
        }

        self.flush_pending();

        let drop_leading = if self.in_capture() {
            let buf = self.captures.last().map(String::as_str).unwrap_or("");
            buf.is_empty() || buf.ends_with([' ', '[', '('])
        } else {
            self.at_line_start || self.out.is_empty() || self.out.ends_with([' ', '[', '('])
        };

        let mut body = collapsed.as_ref();
        if drop_leading {
            body = body.strip_prefix(' ').unwrap_or(body);
        }
        if body.is_empty() {
            return;
        }

        let escaped = if escape {
            escape_markdown_cow(body)
        } else {
            std::borrow::Cow::Borrowed(body)
        };

        if self.in_capture() {
            // Pipes delimit columns; escape them wherever they appear in
            // cell content, code spans included.
            let piped = escaped.replace('|', "\\|");
            self.sink().push_str(&piped);
        } else {
            self.write_chunk(&escaped);
        }
    }

    /// Open an inline construct by writing its marker. Returns a mark for
    /// [`Self::close_inline`] / [`Self::close_link`] to roll back against.
    pub fn open_inline(&mut self, marker: &str) -> usize {
        self.flush_pending();
        let mark = self.sink_len();
        self.write_chunk(marker);
        mark
    }

    /// Close an inline construct. An empty construct (nothing but the
    /// opening marker since `mark`) is rolled back entirely; a trailing
    /// space is moved outside the closing marker.
    pub fn close_inline(&mut self, marker: &str, mark: usize) {
        if mark > self.sink_len() {
            return;
        }

        if self.rollback_if_empty(marker, mark) {
            return;
        }

        let had_space = self.trim_trailing_spaces();
        self.write_chunk(marker);
        if had_space {
            self.write_chunk(" ");
        }
    }

    /// Close a link opened with `open_inline("[")`, writing the
    /// destination. An empty label rolls the whole link back.
    pub fn close_link(&mut self, mark: usize, href: &str, title: Option<&str>) {
        if mark > self.sink_len() {
            return;
        }

        if self.rollback_if_empty("[", mark) {
            return;
        }

        let had_space = self.trim_trailing_spaces();
        let mut tail = String::with_capacity(href.len() + 4);
        tail.push_str("](");
        tail.push_str(href);
        if let Some(title) = title {
            tail.push_str(" \"");
            tail.push_str(&title.replace('"', "\\\""));
            tail.push('"');
        }
        tail.push(')');
        self.write_chunk(&tail);
        if had_space {
            self.write_chunk(" ");
        }
    }

    /// Roll the sink back to `mark` when nothing but `marker` (and
    /// boundary whitespace) was emitted since. Returns true on rollback.
    fn rollback_if_empty(&mut self, marker: &str, mark: usize) -> bool {
        // Tag soup can pair a close against a mark taken in another sink;
        // never slice mid-character over it.
        if !self.sink_ref().is_char_boundary(mark) {
            return false;
        }
        let since = &self.sink_ref()[mark..];
        // Skip prefix characters a line start may have inserted.
        let body = since.trim_start_matches([' ', '>']);
        let empty = body
            .strip_prefix(marker)
            .is_some_and(|rest| rest.chars().all(|c| c == ' '));
        if empty {
            self.truncate_to(mark);
        }
        empty
    }

    fn sink_ref(&self) -> &str {
        self.captures.last().map_or(self.out.as_str(), String::as_str)
    }

    fn truncate_to(&mut self, mark: usize) {
        self.sink().truncate(mark);
        if !self.in_capture() {
            self.at_line_start = self.out.is_empty() || self.out.ends_with('\n');
        }
    }

    fn trim_trailing_spaces(&mut self) -> bool {
        let buf = self.sink();
        let mut trimmed = false;
        while buf.ends_with(' ') {
            buf.pop();
            trimmed = true;
        }
        trimmed
    }

    /// Final tidy pass: trim line-end whitespace (preserving two-space
    /// hard breaks and fenced-code interiors), collapse blank-line runs
    /// to one, and apply the trailing-newline policy.
    pub fn finalize(self) -> String {
        let mut result = String::with_capacity(self.out.len() + 1);
        let mut blank_run = 0usize;
        let mut in_fence = false;

        for line in self.out.split('\n') {
            let core = line.trim_start_matches([' ', '>']);
            if core.starts_with("```") {
                in_fence = !in_fence;
                result.push_str(line.trim_end());
                result.push('\n');
                blank_run = 0;
                continue;
            }
            if in_fence {
                result.push_str(line);
                result.push('\n');
                continue;
            }

            let has_soft_break = line.ends_with("  ") && !line.trim().is_empty();
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                blank_run += 1;
                if blank_run == 1 && !result.is_empty() {
                    result.push('\n');
                }
            } else {
                blank_run = 0;
                result.push_str(trimmed);
                if has_soft_break {
                    result.push_str("  ");
                }
                result.push('\n');
            }
        }

        let mut output = result.trim_end().to_string();
        if self.saw_block && !output.is_empty() {
            output.push('\n');
        }
        output
    }
}
