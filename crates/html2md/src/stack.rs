//! The stack of currently-open semantic elements.
//!
//! Each conversion owns one [`ElementStack`]. Frames are pushed when an
//! opening tag is classified and popped by the tolerant close algorithm:
//! a closing tag pops everything above the nearest frame of its kind
//! (implicitly closing list items, paragraphs and table cells along the
//! way), and a closing tag with no matching frame anywhere is a no-op.
//! Frames still open at end of input are force-closed in LIFO order so the
//! emitted Markdown never ends with an unterminated construct.

/// One currently-open semantic element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ElementFrame {
    /// `<p>`.
    Paragraph,
    /// `<h1>`–`<h6>` with level.
    Heading(u8),
    /// `<blockquote>`.
    Blockquote,
    /// `<ul>`/`<ol>`; `index` is the next ordinal for ordered lists.
    List { ordered: bool, index: u32 },
    /// `<li>`; `mark` is the sink position right after the item marker,
    /// used to tell whether the item is still empty.
    ListItem { mark: usize },
    /// `<strong>`/`<b>`; `mark` is the sink length at the opening marker,
    /// used to roll back empty constructs.
    Strong { mark: usize },
    /// `<em>`/`<i>`/`<cite>`/`<dfn>`.
    Emphasis { mark: usize },
    /// `<del>`/`<s>`.
    Strikethrough { mark: usize },
    /// `<a>` with its resolved destination. `href` is `None` when the link
    /// wrapper is dropped (empty or missing destination).
    Link {
        href: Option<String>,
        title: Option<String>,
        mark: usize,
    },
    /// `<pre>`.
    CodeBlock,
    /// `<code>` outside `<pre>`.
    InlineCode { mark: usize },
    /// `<code>` inside `<pre>`: fence metadata only, no markers.
    FenceCode,
    /// `<table>`.
    Table,
    /// `<thead>`/`<tbody>`/`<tfoot>`.
    TableSection,
    /// `<tr>`.
    TableRow,
    /// `<td>`/`<th>`.
    TableCell,
    /// `<title>`.
    Title,
    /// A subtree suppressed entirely (hidden attribute or style).
    Hidden { name: String },
    /// An unsupported tag echoed as raw HTML.
    Passthrough { name: String },
}

/// Kind discriminant used to match closing tags against open frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    Paragraph,
    Heading,
    Blockquote,
    List,
    ListItem,
    Strong,
    Emphasis,
    Strikethrough,
    Link,
    CodeBlock,
    InlineCode,
    FenceCode,
    Table,
    TableSection,
    TableRow,
    TableCell,
    Title,
    Hidden,
    Passthrough,
}

impl ElementFrame {
    /// The discriminant this frame matches close requests against.
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Paragraph => FrameKind::Paragraph,
            Self::Heading(_) => FrameKind::Heading,
            Self::Blockquote => FrameKind::Blockquote,
            Self::List { .. } => FrameKind::List,
            Self::ListItem { .. } => FrameKind::ListItem,
            Self::Strong { .. } => FrameKind::Strong,
            Self::Emphasis { .. } => FrameKind::Emphasis,
            Self::Strikethrough { .. } => FrameKind::Strikethrough,
            Self::Link { .. } => FrameKind::Link,
            Self::CodeBlock => FrameKind::CodeBlock,
            Self::InlineCode { .. } => FrameKind::InlineCode,
            Self::FenceCode => FrameKind::FenceCode,
            Self::Table => FrameKind::Table,
            Self::TableSection => FrameKind::TableSection,
            Self::TableRow => FrameKind::TableRow,
            Self::TableCell => FrameKind::TableCell,
            Self::Title => FrameKind::Title,
            Self::Hidden { .. } => FrameKind::Hidden,
            Self::Passthrough { .. } => FrameKind::Passthrough,
        }
    }

    /// HTML permits omitting the closing tag for these; they are closed
    /// silently when an enclosing frame closes over them or a sibling
    /// opens.
    pub fn auto_closeable(&self) -> bool {
        matches!(
            self.kind(),
            FrameKind::ListItem
                | FrameKind::Paragraph
                | FrameKind::TableCell
                | FrameKind::TableRow
                | FrameKind::TableSection
        )
    }
}

/// Push/pop stack of open frames with tolerant lookup.
#[derive(Debug, Default)]
pub(crate) struct ElementStack {
    frames: Vec<ElementFrame>,
}

impl ElementStack {
    pub fn push(&mut self, frame: ElementFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ElementFrame> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Index of the innermost frame of `kind`, scanning from the top.
    ///
    /// For name-carrying kinds (hidden/passthrough subtrees) the stored
    /// tag name must match as well, so `</div>` does not close a
    /// passthrough `<section>`.
    pub fn find_innermost(&self, kind: FrameKind, name: Option<&str>) -> Option<usize> {
        self.frames.iter().enumerate().rev().find_map(|(i, frame)| {
            if frame.kind() != kind {
                return None;
            }
            match (name, frame) {
                (Some(want), ElementFrame::Hidden { name } | ElementFrame::Passthrough { name }) => {
                    (name == want).then_some(i)
                }
                _ => Some(i),
            }
        })
    }

    /// Index of the innermost frame of `kind` reachable without crossing
    /// a barrier frame; used for implicit sibling closes (`<li>` closing
    /// the previous `<li>`, but never one in an enclosing list).
    pub fn find_above_barrier(&self, kind: FrameKind, barriers: &[FrameKind]) -> Option<usize> {
        for (i, frame) in self.frames.iter().enumerate().rev() {
            if frame.kind() == kind {
                return Some(i);
            }
            if barriers.contains(&frame.kind()) {
                return None;
            }
        }
        None
    }

    /// Number of open list frames.
    pub fn list_depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.kind() == FrameKind::List)
            .count()
    }

    /// Number of open blockquote frames.
    pub fn blockquote_depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.kind() == FrameKind::Blockquote)
            .count()
    }

    /// Number of open hidden subtrees.
    pub fn hidden_depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.kind() == FrameKind::Hidden)
            .count()
    }

    /// Is a table currently open?
    pub fn in_table(&self) -> bool {
        self.frames.iter().any(|f| f.kind() == FrameKind::Table)
    }

    /// Is a table cell currently collecting content?
    pub fn in_table_cell(&self) -> bool {
        self.frames.iter().any(|f| f.kind() == FrameKind::TableCell)
    }

    /// Is the cursor inside a `<pre>` block?
    pub fn in_code_block(&self) -> bool {
        self.frames.iter().any(|f| f.kind() == FrameKind::CodeBlock)
    }

    /// Is the cursor inside inline code?
    pub fn in_inline_code(&self) -> bool {
        self.frames.iter().any(|f| f.kind() == FrameKind::InlineCode)
    }

    /// Is the cursor inside the document `<title>`?
    pub fn in_title(&self) -> bool {
        self.frames.iter().any(|f| f.kind() == FrameKind::Title)
    }

    /// Is the cursor inside a list item?
    pub fn in_list_item(&self) -> bool {
        self.frames.iter().any(|f| f.kind() == FrameKind::ListItem)
    }

    /// The `mark` of the innermost open list item, if any.
    pub fn innermost_list_item_mark(&self) -> Option<usize> {
        self.frames.iter().rev().find_map(|f| match f {
            ElementFrame::ListItem { mark } => Some(*mark),
            _ => None,
        })
    }

    /// Mutable access to the innermost ordered/unordered list frame.
    pub fn innermost_list_mut(&mut self) -> Option<&mut ElementFrame> {
        self.frames
            .iter_mut()
            .rev()
            .find(|f| f.kind() == FrameKind::List)
    }
}
