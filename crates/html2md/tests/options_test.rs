//! Coverage for each conversion option.

use html2md::options::ConversionOptions;
use html2md::{convert, convert_with_options};

fn with(mutate: impl FnOnce(&mut ConversionOptions)) -> ConversionOptions {
    let mut options = ConversionOptions::default();
    mutate(&mut options);
    options
}

#[test]
fn unordered_list_marker_is_configurable() {
    let options = with(|o| o.unordered_list_marker = '*');
    assert_eq!(
        convert_with_options("<ul><li>a</li><li>b</li></ul>", &options).unwrap(),
        "* a\n* b\n"
    );
}

#[test]
fn ordered_list_marker_is_configurable() {
    let options = with(|o| o.ordered_list_marker = ')');
    assert_eq!(
        convert_with_options("<ol><li>a</li></ol>", &options).unwrap(),
        "1) a\n"
    );
}

#[test]
fn link_titles_can_be_dropped() {
    let html = r#"<a href="https://x.io" title="Hi">go</a>"#;
    assert_eq!(convert(html).unwrap(), "[go](https://x.io \"Hi\")");

    let options = with(|o| o.include_link_title = false);
    assert_eq!(
        convert_with_options(html, &options).unwrap(),
        "[go](https://x.io)"
    );
}

#[test]
fn base_url_resolves_relative_links() {
    let options = with(|o| o.base_url = Some("https://example.com/docs/".into()));
    assert_eq!(
        convert_with_options(r#"<a href="page.html">p</a>"#, &options).unwrap(),
        "[p](https://example.com/docs/page.html)"
    );
    assert_eq!(
        convert_with_options(r#"<img src="img/x.png" alt="pic">"#, &options).unwrap(),
        "![pic](https://example.com/docs/img/x.png)"
    );
}

#[test]
fn base_url_leaves_absolute_and_fragment_links_alone() {
    let options = with(|o| o.base_url = Some("https://example.com/docs/".into()));
    assert_eq!(
        convert_with_options(r#"<a href="https://other.org/page">p</a>"#, &options).unwrap(),
        "[p](https://other.org/page)"
    );
    assert_eq!(
        convert_with_options(r##"<a href="#section">p</a>"##, &options).unwrap(),
        "[p](#section)"
    );
}

#[test]
fn title_heading_can_be_dropped() {
    let html = "<head><title>Doc</title></head><p>b</p>";
    assert_eq!(convert(html).unwrap(), "# Doc\n\nb\n");

    let options = with(|o| o.include_title = false);
    assert_eq!(convert_with_options(html, &options).unwrap(), "b\n");
}

#[test]
fn unsupported_tags_can_be_passed_through() {
    let html = r#"<div class="x">a</div>"#;
    assert_eq!(convert(html).unwrap(), "a");

    let options = with(|o| o.preserve_unsupported_tags = true);
    assert_eq!(
        convert_with_options(html, &options).unwrap(),
        r#"<div class="x">a</div>"#
    );
}

#[test]
fn passthrough_still_converts_known_tags() {
    let options = with(|o| o.preserve_unsupported_tags = true);
    assert_eq!(
        convert_with_options("<section><b>x</b></section>", &options).unwrap(),
        "<section>**x**</section>"
    );
}

#[test]
fn options_round_trip_through_serde() {
    let options = with(|o| {
        o.unordered_list_marker = '+';
        o.base_url = Some("https://example.com/".into());
        o.max_table_column_width = Some(12);
    });

    let json = serde_json::to_string(&options).unwrap();
    let back: ConversionOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn partial_option_documents_fill_in_defaults() {
    let options: ConversionOptions =
        serde_json::from_str(r#"{"preserve_unsupported_tags":true}"#).unwrap();
    assert!(options.preserve_unsupported_tags);
    assert_eq!(options.unordered_list_marker, '-');
    assert!(options.include_link_title);
}
