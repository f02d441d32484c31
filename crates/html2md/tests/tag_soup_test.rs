//! Recovery behavior on malformed and mismatched markup.
//!
//! Conversion must terminate with best-effort output on any input; these
//! tests pin the recovery rules down.

use html2md::convert;

#[test]
fn unclosed_tags_are_force_closed_at_end_of_input() {
    assert_eq!(convert("<p>unclosed <b>bold").unwrap(), "unclosed **bold**\n");
}

#[test]
fn unterminated_tag_fragment_degrades_to_text() {
    assert_eq!(convert("<p>a</p><p unclosed").unwrap(), "a\n\n<p unclosed\n");
}

#[test]
fn stray_angle_brackets_are_literal() {
    assert_eq!(convert("a < b > c").unwrap(), "a < b > c");
}

#[test]
fn unmatched_closing_tags_are_no_ops() {
    assert_eq!(convert("a</b></em></div>b").unwrap(), "ab");
    assert_eq!(convert("</p>text").unwrap(), "text");
}

#[test]
fn interleaved_inline_tags_still_balance_markers() {
    let output = convert("<b>a<i>b</b>c</i>").unwrap();
    assert_eq!(output, "**a*b***c");
    assert_eq!(output.matches('*').count() % 2, 0);
}

#[test]
fn block_close_terminates_open_inline_markup() {
    // </p> arrives while <b> is open; the bold marker must still close.
    let output = convert("<p><b>x</p>y").unwrap();
    assert_eq!(output.matches("**").count(), 2);
}

#[test]
fn unclosed_fence_is_terminated() {
    assert_eq!(convert("<pre>code").unwrap(), "```\ncode\n```\n");
}

#[test]
fn unclosed_table_still_flushes() {
    assert_eq!(
        convert("<table><tr><th>A</th><tr><td>1").unwrap(),
        "| A   |\n| --- |\n| 1   |\n"
    );
}

#[test]
fn unquoted_and_broken_attributes() {
    assert_eq!(convert("<a href=x>t</a>").unwrap(), "[t](x)");
    // An unclosed quote swallows the rest of the fragment; the scanner
    // falls back to literal text rather than failing.
    let output = convert("<a href=\"oops>text").unwrap();
    assert!(output.contains("text"));
}

#[test]
fn uppercase_tags_are_recognized() {
    assert_eq!(convert("<P>Hello <B>world</B></P>").unwrap(), "Hello **world**\n");
}

#[test]
fn deeply_nested_soup_terminates() {
    let mut html = String::new();
    for _ in 0..200 {
        html.push_str("<div><ul><li>");
    }
    html.push_str("leaf");
    let output = convert(&html).unwrap();
    assert!(output.contains("leaf"));
}
