//! Command-line front end for the `html2md` conversion engine.
//!
//! Reads HTML from a file, `-`, or stdin, converts it, and writes the
//! Markdown to stdout or to a file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use html2md::{ConversionOptions, convert_with_options};
use log::debug;

#[derive(Parser)]
#[command(
    name = "html2md",
    version,
    about = "Convert HTML to Markdown",
    long_about = "Convert HTML to Markdown. Reads from a file (or stdin when the \
                  argument is omitted or '-') and writes to stdout unless -o is given."
)]
struct Cli {
    /// Input HTML file; stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Write the Markdown to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Bullet character for unordered list items.
    #[arg(long, default_value_t = '-', value_name = "CHAR")]
    bullet: char,

    /// Resolve relative links and image sources against this base URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Drop link title attributes instead of appending them.
    #[arg(long)]
    no_link_titles: bool,

    /// Drop the document <title> instead of emitting it as a heading.
    #[arg(long)]
    no_title: bool,

    /// Cap the width table columns are padded to.
    #[arg(long, value_name = "WIDTH")]
    max_table_column_width: Option<usize>,

    /// Pass tags without a Markdown mapping through as raw HTML.
    #[arg(long)]
    keep_unsupported_tags: bool,
}

impl Cli {
    fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            unordered_list_marker: self.bullet,
            include_link_title: !self.no_link_titles,
            include_title: !self.no_title,
            base_url: self.base_url.clone(),
            max_table_column_width: self.max_table_column_width,
            preserve_unsupported_tags: self.keep_unsupported_tags,
            ..ConversionOptions::default()
        }
    }
}

fn read_input(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

fn write_output(output: Option<&PathBuf>, markdown: &str) -> io::Result<()> {
    match output {
        Some(path) => fs::write(path, markdown),
        None => io::stdout().write_all(markdown.as_bytes()),
    }
}

fn run(cli: &Cli) -> io::Result<()> {
    let html = read_input(cli.input.as_ref())?;
    debug!("read {} bytes of HTML", html.len());

    let markdown = convert_with_options(&html, &cli.conversion_options())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    write_output(cli.output.as_ref(), &markdown)
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("html2md: {err}");
            ExitCode::FAILURE
        }
    }
}
