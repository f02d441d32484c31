//! Buffering and rendering of `<table>` structures as GitHub-flavored
//! Markdown tables.
//!
//! Cells are buffered while the table frame is open and flushed in one
//! piece when it closes: only then are the column count, per-column
//! widths and alignments known. Row and column order are always
//! preserved.

/// Column alignment, taken from `align` attributes or `text-align`
/// style hints on `th`/`td`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parse an alignment hint from a cell's `align` attribute or its
    /// inline `style`. The first hint seen for a column wins.
    pub fn from_attrs(align: Option<&str>, style: Option<&str>) -> Option<Self> {
        if let Some(value) = align {
            match value.to_ascii_lowercase().as_str() {
                "left" => return Some(Self::Left),
                "center" => return Some(Self::Center),
                "right" => return Some(Self::Right),
                _ => {}
            }
        }
        if let Some(style) = style {
            let compact: String = style
                .to_ascii_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if compact.contains("text-align:left") {
                return Some(Self::Left);
            }
            if compact.contains("text-align:center") {
                return Some(Self::Center);
            }
            if compact.contains("text-align:right") {
                return Some(Self::Right);
            }
        }
        None
    }
}

#[derive(Debug, Default)]
struct Cell {
    text: String,
    header: bool,
}

#[derive(Debug, Default)]
struct Row {
    cells: Vec<Cell>,
}

/// One `<table>` being buffered.
#[derive(Debug, Default)]
pub(crate) struct TableModel {
    rows: Vec<Row>,
    /// Alignment hint per column index, first hint wins.
    alignments: Vec<Option<Alignment>>,
}

/// Minimum dash count in a separator cell.
const MIN_COLUMN_WIDTH: usize = 3;

impl TableModel {
    /// Begin a new row (`<tr>`).
    pub fn start_row(&mut self) {
        self.rows.push(Row::default());
    }

    /// Begin a new cell in the current row (`<td>`/`<th>`).
    pub fn start_cell(&mut self, header: bool, alignment: Option<Alignment>) {
        if self.rows.is_empty() {
            self.rows.push(Row::default());
        }
        let Some(row) = self.rows.last_mut() else { return };
        let column = row.cells.len();

        if self.alignments.len() <= column {
            self.alignments.resize(column + 1, None);
        }
        if self.alignments[column].is_none() {
            self.alignments[column] = alignment;
        }

        row.cells.push(Cell {
            text: String::new(),
            header,
        });
    }

    /// Store the captured content of the most recently started cell.
    pub fn fill_cell(&mut self, text: String) {
        if let Some(cell) = self.rows.last_mut().and_then(|row| row.cells.last_mut()) {
            cell.text = text;
        }
    }

    /// Render the buffered table, or `None` when there is nothing to
    /// emit (zero rows, or rows without a single cell).
    pub fn render(self, max_column_width: Option<usize>) -> Option<String> {
        let columns = self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
        if columns == 0 {
            return None;
        }

        // The first row becomes the header when any of its cells came
        // from <th>; otherwise a blank header row is synthesized, since
        // the syntax mandates a header plus separator.
        let first_is_header = self
            .rows
            .first()
            .is_some_and(|row| row.cells.iter().any(|cell| cell.header));

        let mut widths = vec![MIN_COLUMN_WIDTH; columns];
        for row in &self.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(display_width(&cell.text));
            }
        }
        if let Some(cap) = max_column_width {
            let cap = cap.max(MIN_COLUMN_WIDTH);
            for width in &mut widths {
                *width = (*width).min(cap);
            }
        }

        let alignment_of = |column: usize| self.alignments.get(column).copied().flatten();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let mut body_rows = self.rows.iter();

        let header_line = if first_is_header {
            body_rows
                .next()
                .map_or_else(String::new, |header| format_row(&header.cells, &widths, &alignment_of))
        } else {
            format_row(&[], &widths, &alignment_of)
        };
        lines.push(header_line);
        lines.push(separator_line(&widths, &alignment_of));

        for row in body_rows {
            lines.push(format_row(&row.cells, &widths, &alignment_of));
        }

        Some(lines.join("\n"))
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn format_row(
    cells: &[Cell],
    widths: &[usize],
    alignment_of: &impl Fn(usize) -> Option<Alignment>,
) -> String {
    let mut line = String::from("|");
    for (column, width) in widths.iter().enumerate() {
        let text = cells.get(column).map(|cell| cell.text.as_str()).unwrap_or("");
        line.push(' ');
        line.push_str(&pad(text, *width, alignment_of(column)));
        line.push_str(" |");
    }
    line
}

fn pad(text: &str, width: usize, alignment: Option<Alignment>) -> String {
    let len = display_width(text);
    if len >= width {
        return text.to_string();
    }
    let fill = width - len;
    match alignment.unwrap_or(Alignment::Left) {
        Alignment::Left => format!("{text}{}", " ".repeat(fill)),
        Alignment::Right => format!("{}{text}", " ".repeat(fill)),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
        }
    }
}

fn separator_line(widths: &[usize], alignment_of: &impl Fn(usize) -> Option<Alignment>) -> String {
    let mut line = String::from("|");
    for (column, width) in widths.iter().enumerate() {
        let dashes = match alignment_of(column) {
            None => "-".repeat(*width),
            Some(Alignment::Left) => format!(":{}", "-".repeat(width.saturating_sub(1))),
            Some(Alignment::Right) => format!("{}:", "-".repeat(width.saturating_sub(1))),
            Some(Alignment::Center) => format!(":{}:", "-".repeat(width.saturating_sub(2))),
        };
        line.push(' ');
        line.push_str(&dashes);
        line.push_str(" |");
    }
    line
}
