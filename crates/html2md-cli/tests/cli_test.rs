//! Integration tests for the html2md CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_html2md"))
}

#[test]
fn test_basic_stdin() {
    cli()
        .write_stdin("<h1>Title</h1><p>Content</p>")
        .assert()
        .success()
        .stdout("# Title\n\nContent\n");
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.html");
    fs::write(&input_path, "<p>Test content</p>").unwrap();

    cli()
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .stdout("Test content\n");
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.md");

    cli()
        .arg("-o")
        .arg(output_path.to_str().unwrap())
        .write_stdin("<p>Output test</p>")
        .assert()
        .success();

    let output = fs::read_to_string(&output_path).unwrap();
    assert_eq!(output, "Output test\n");
}

#[test]
fn test_dash_reads_stdin() {
    cli()
        .arg("-")
        .write_stdin("<p>Dash test</p>")
        .assert()
        .success()
        .stdout("Dash test\n");
}

#[test]
fn test_missing_input_file_fails() {
    cli()
        .arg("definitely-not-here.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("html2md:"));
}

#[test]
fn test_bullet_option() {
    cli()
        .args(["--bullet", "*"])
        .write_stdin("<ul><li>a</li><li>b</li></ul>")
        .assert()
        .success()
        .stdout("* a\n* b\n");
}

#[test]
fn test_base_url_option() {
    cli()
        .args(["--base-url", "https://example.com/"])
        .write_stdin(r#"<a href="page">p</a>"#)
        .assert()
        .success()
        .stdout("[p](https://example.com/page)");
}

#[test]
fn test_no_link_titles_option() {
    cli()
        .arg("--no-link-titles")
        .write_stdin(r#"<a href="u" title="t">x</a>"#)
        .assert()
        .success()
        .stdout("[x](u)");
}

#[test]
fn test_keep_unsupported_tags_option() {
    cli()
        .arg("--keep-unsupported-tags")
        .write_stdin("<div>a</div>")
        .assert()
        .success()
        .stdout("<div>a</div>");
}

#[test]
fn test_table_conversion() {
    cli()
        .write_stdin("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>")
        .assert()
        .success()
        .stdout("| A   |\n| --- |\n| 1   |\n");
}

#[test]
fn test_quirky_markup_still_converts() {
    cli()
        .write_stdin("<head><title>Old School</title></head><font><center><h2>Hi</h2><p>Welcome!")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Old School").and(predicate::str::contains("## Hi")));
}
