//! Text-level helpers shared by the scanner and the output composer.
//!
//! Everything here is allocation-shy: the helpers return [`Cow`] and only
//! copy when the input actually needs rewriting.

use std::borrow::Cow;

/// Decode the HTML entities that survive into text runs and attribute
/// values.
///
/// Covers the named entities the engine has historically needed plus
/// numeric references (`&#NNN;` and `&#xHH;`). Unknown or malformed
/// references are left untouched rather than dropped.
pub(crate) fn decode_entities_cow(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match decode_one_entity(rest) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode a single entity at the start of `s` (which begins with `&`).
/// Returns the replacement text and the number of bytes consumed.
fn decode_one_entity(s: &str) -> Option<(String, usize)> {
    let end = s[1..].find(';').map(|i| i + 1)?;
    let body = &s[1..end];

    if body.len() > 32 || body.is_empty() {
        return None;
    }

    if let Some(num) = body.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        let ch = char::from_u32(code)?;
        return Some((ch.to_string(), end + 1));
    }

    let replacement = match body {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "copy" => "\u{a9}",
        _ => return None,
    };

    Some((replacement.to_string(), end + 1))
}

/// Collapse runs of HTML whitespace (space, tab, CR, LF) into single
/// spaces, preserving at most one leading and one trailing space.
pub(crate) fn collapse_whitespace_cow(input: &str) -> Cow<'_, str> {
    let needs_work = {
        let mut prev_space = false;
        let mut found = false;
        for ch in input.chars() {
            let is_ws = ch.is_ascii_whitespace();
            if is_ws && (prev_space || ch != ' ') {
                found = true;
                break;
            }
            prev_space = is_ws;
        }
        found
    };

    if !needs_work {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut prev_space = false;
    for ch in input.chars() {
        if ch.is_ascii_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }

    Cow::Owned(out)
}

/// Escape characters that would otherwise be read as Markdown syntax.
///
/// Applied to literal text only; code spans and fenced blocks bypass it.
pub(crate) fn escape_markdown_cow(input: &str) -> Cow<'_, str> {
    if !input.contains(['*', '_', '`', '[', ']', '\\']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 4);
    for ch in input.chars() {
        if matches!(ch, '*' | '_' | '`' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities_cow("a &amp; b"), "a & b");
        assert_eq!(decode_entities_cow("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities_cow("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities_cow("x&nbsp;y"), "x y");
    }

    #[test]
    fn leaves_unknown_references_alone() {
        assert_eq!(decode_entities_cow("&bogus; & more"), "&bogus; & more");
        assert_eq!(decode_entities_cow("tail&"), "tail&");
    }

    #[test]
    fn borrows_when_nothing_to_do() {
        assert!(matches!(decode_entities_cow("plain"), Cow::Borrowed(_)));
        assert!(matches!(collapse_whitespace_cow("a b"), Cow::Borrowed(_)));
        assert!(matches!(escape_markdown_cow("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(collapse_whitespace_cow("a   b"), "a b");
        assert_eq!(collapse_whitespace_cow("a\n\t b"), "a b");
        assert_eq!(collapse_whitespace_cow(" a "), " a ");
    }

    #[test]
    fn escapes_markdown_significant_characters() {
        assert_eq!(escape_markdown_cow("2 * 3"), "2 \\* 3");
        assert_eq!(escape_markdown_cow("a_b [c]"), "a\\_b \\[c\\]");
        assert_eq!(escape_markdown_cow("back`tick"), "back\\`tick");
    }
}
