//! Integration tests for `<table>` conversion.

use html2md::options::ConversionOptions;
use html2md::{convert, convert_with_options};

#[test]
fn header_separator_and_body() {
    assert_eq!(
        convert("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>")
            .unwrap(),
        "| A   | B   |\n| --- | --- |\n| 1   | 2   |\n"
    );
}

#[test]
fn blank_header_is_synthesized_without_th() {
    assert_eq!(
        convert("<table><tr><td>1</td><td>2</td></tr></table>").unwrap(),
        "|     |     |\n| --- | --- |\n| 1   | 2   |\n"
    );
}

#[test]
fn table_shape_is_rows_plus_separator() {
    let html = "<table>\
        <tr><th>a</th><th>b</th><th>c</th></tr>\
        <tr><td>1</td><td>2</td><td>3</td></tr>\
        <tr><td>4</td><td>5</td><td>6</td></tr>\
        </table>";
    let output = convert(html).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    // 3 source rows -> header + separator + 2 body rows.
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert_eq!(line.matches('|').count(), 4, "line {line:?}");
    }
    assert!(lines[1].contains("---"));
}

#[test]
fn short_rows_are_padded_with_empty_cells() {
    let output = convert(
        "<table><tr><th>a</th><th>b</th><th>c</th></tr><tr><td>only</td></tr></table>",
    )
    .unwrap();
    for line in output.lines() {
        assert_eq!(line.matches('|').count(), 4);
    }
}

#[test]
fn alignment_attributes_shape_the_separator() {
    let output = convert(
        r#"<table><tr><th align="left">l</th><th align="center">c</th><th align="right">r</th></tr></table>"#,
    )
    .unwrap();
    assert_eq!(output.lines().nth(1), Some("| :-- | :-: | --: |"));
}

#[test]
fn style_text_align_is_recognized() {
    let output = convert(
        r#"<table><tr><th style="text-align: center">c</th></tr><tr><td>1</td></tr></table>"#,
    )
    .unwrap();
    assert_eq!(output, "|  c  |\n| :-: |\n|  1  |\n");
}

#[test]
fn pipes_in_cells_are_escaped() {
    let output = convert("<table><tr><th>a|b</th></tr></table>").unwrap();
    assert_eq!(output, "| a\\|b |\n| ---- |\n");
}

#[test]
fn inline_markup_survives_inside_cells() {
    let output =
        convert("<table><tr><th>H</th></tr><tr><td><b>bold</b> and <a href='u'>link</a></td></tr></table>")
            .unwrap();
    assert!(output.contains("**bold** and [link](u)"));
}

#[test]
fn br_inside_a_cell_stays_literal() {
    let output = convert("<table><tr><th>a<br>b</th></tr></table>").unwrap();
    assert!(output.contains("a<br>b"));
}

#[test]
fn zero_row_tables_emit_nothing() {
    assert_eq!(convert("<table></table>").unwrap(), "");
    assert_eq!(convert("<p>a</p><table></table>").unwrap(), "a\n");
}

#[test]
fn cells_with_omitted_closers() {
    assert_eq!(
        convert("<table><tr><td>1<td>2<tr><td>3<td>4</table>").unwrap(),
        "|     |     |\n| --- | --- |\n| 1   | 2   |\n| 3   | 4   |\n"
    );
}

#[test]
fn thead_and_tbody_are_structural() {
    assert_eq!(
        convert(
            "<table><thead><tr><th>H</th></tr></thead><tbody><tr><td>d</td></tr></tbody></table>"
        )
        .unwrap(),
        "| H   |\n| --- |\n| d   |\n"
    );
}

#[test]
fn column_width_cap_limits_padding() {
    let options = ConversionOptions {
        max_table_column_width: Some(5),
        ..ConversionOptions::default()
    };
    let output = convert_with_options(
        "<table><tr><th>wide header text</th></tr><tr><td>x</td></tr></table>",
        &options,
    )
    .unwrap();
    assert_eq!(output, "| wide header text |\n| ----- |\n| x     |\n");
}

#[test]
fn whitespace_between_structure_tags_is_ignored() {
    assert_eq!(
        convert("<table>\n  <tr>\n    <th>A</th>\n  </tr>\n  <tr>\n    <td>1</td>\n  </tr>\n</table>")
            .unwrap(),
        "| A   |\n| --- |\n| 1   |\n"
    );
}

#[test]
fn table_between_paragraphs() {
    assert_eq!(
        convert("<p>before</p><table><tr><th>H</th></tr></table><p>after</p>").unwrap(),
        "before\n\n| H   |\n| --- |\n\nafter\n"
    );
}
