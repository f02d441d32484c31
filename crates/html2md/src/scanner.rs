//! Character-level scanner over the HTML input.
//!
//! The scanner is a single left-to-right cursor that recognizes tag
//! boundaries, comments and raw-text regions, and surfaces everything else
//! as text runs. It never fails: any fragment that does not parse as a tag
//! (an unterminated `<`, a quote running to end of input, `<` followed by
//! something that is not a name) degrades to literal text and scanning
//! continues after it.

use log::trace;

/// A parsed `<...>` region.
#[derive(Debug)]
pub(crate) struct TagToken<'a> {
    /// Lower-cased tag name.
    pub name: String,
    /// Attributes in source order, names lower-cased, values still
    /// entity-encoded.
    pub attributes: Vec<(String, String)>,
    /// True for `</name>` tags.
    pub closing: bool,
    /// True for `<name ... />` tags.
    pub self_closing: bool,
    /// The full source span including the angle brackets, for passthrough.
    pub raw: &'a str,
}

impl TagToken<'_> {
    /// Look up an attribute value by (lower-cased) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One scanner event.
#[derive(Debug)]
pub(crate) enum Event<'a> {
    /// A run of literal text, entities not yet decoded.
    Text(&'a str),
    /// The opaque contents of a raw-text element (`script`, `style`).
    RawText(&'a str),
    /// A tag boundary.
    Tag(TagToken<'a>),
    /// A comment, doctype or processing instruction; always skipped.
    Comment(&'a str),
}

/// Elements whose content is never tag-scanned.
fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

/// Lazy, finite, non-restartable event sequence over `input`.
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    /// When set, the cursor is inside a raw-text element and only the
    /// matching close tag ends the region.
    raw_text_until: Option<String>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_until: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Scan the contents of a raw-text element up to its closing tag.
    fn next_raw_text(&mut self, name: &str) -> Event<'a> {
        let rest = &self.input[self.pos..];
        let needle_len = name.len() + 2;

        let mut idx = 0;
        let close_at = loop {
            match rest[idx..].find('<') {
                Some(off) => {
                    let at = idx + off;
                    let candidate = &rest[at..];
                    if candidate.starts_with("</")
                        && candidate
                            .get(2..needle_len)
                            .is_some_and(|n| n.eq_ignore_ascii_case(name))
                    {
                        break Some(at);
                    }
                    idx = at + 1;
                }
                None => break None,
            }
        };

        match close_at {
            Some(at) => {
                let content = &rest[..at];
                self.pos += at;
                Event::RawText(content)
            }
            None => {
                // Unterminated raw-text element: everything to the end of
                // input belongs to it.
                self.pos = self.input.len();
                Event::RawText(rest)
            }
        }
    }

    /// Parse a comment (`<!--`), doctype or processing instruction
    /// starting at `self.pos`.
    fn next_markup_declaration(&mut self) -> Event<'a> {
        let rest = &self.input[self.pos..];

        if rest.starts_with("<!--") {
            match rest[4..].find("-->") {
                Some(end) => {
                    let body = &rest[4..4 + end];
                    self.pos += 4 + end + 3;
                    Event::Comment(body)
                }
                None => {
                    self.pos = self.input.len();
                    Event::Comment(&rest[4..])
                }
            }
        } else {
            // <!DOCTYPE ...> or <?...?>: skip to the next '>'.
            match rest.find('>') {
                Some(end) => {
                    let body = &rest[..=end];
                    self.pos += end + 1;
                    Event::Comment(body)
                }
                None => {
                    self.pos = self.input.len();
                    Event::Comment(rest)
                }
            }
        }
    }

    /// Parse a closing tag starting at `self.pos`. Returns `None` when the
    /// fragment is malformed and should be treated as text.
    fn next_closing_tag(&mut self) -> Option<Event<'a>> {
        let start = self.pos;
        let bytes = self.bytes();
        let mut i = start + 2;

        let name_start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &self.input[name_start..i];

        // Anything between the name and '>' is discarded; closing tags
        // carry no attributes worth keeping.
        while i < bytes.len() && bytes[i] != b'>' {
            i += 1;
        }
        if i >= bytes.len() {
            trace!("unterminated closing tag at byte {start}; emitting as text");
            return None;
        }

        self.pos = i + 1;
        Some(Event::Tag(TagToken {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            closing: true,
            self_closing: false,
            raw: &self.input[start..self.pos],
        }))
    }

    /// Parse an opening tag starting at `self.pos`. Returns `None` when
    /// the fragment is malformed and should be treated as text.
    fn next_opening_tag(&mut self) -> Option<Event<'a>> {
        let start = self.pos;
        let bytes = self.bytes();
        let mut i = start + 1;

        let name_start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                trace!("unterminated tag <{name} at byte {start}; emitting as text");
                return None;
            }

            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    self_closing = true;
                    i += 1;
                }
                _ => {
                    let attr_start = i;
                    while i < bytes.len() && !matches!(bytes[i], b'=' | b'>' | b'/') && !bytes[i].is_ascii_whitespace()
                    {
                        i += 1;
                    }
                    let attr_name = self.input[attr_start..i].to_ascii_lowercase();

                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }

                    let mut value = String::new();
                    if i < bytes.len() && bytes[i] == b'=' {
                        i += 1;
                        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                            i += 1;
                        }
                        if i >= bytes.len() {
                            return None;
                        }
                        match bytes[i] {
                            quote @ (b'"' | b'\'') => {
                                i += 1;
                                let value_start = i;
                                while i < bytes.len() && bytes[i] != quote {
                                    i += 1;
                                }
                                if i >= bytes.len() {
                                    trace!("unterminated attribute quote in <{name}; emitting as text");
                                    return None;
                                }
                                value.push_str(&self.input[value_start..i]);
                                i += 1;
                            }
                            _ => {
                                let value_start = i;
                                while i < bytes.len() && bytes[i] != b'>' && !bytes[i].is_ascii_whitespace() {
                                    i += 1;
                                }
                                value.push_str(&self.input[value_start..i]);
                            }
                        }
                    }

                    if !attr_name.is_empty() {
                        attributes.push((attr_name, value));
                    }
                }
            }
        }

        self.pos = i;
        if !self_closing && is_raw_text_element(&name) {
            self.raw_text_until = Some(name.clone());
        }

        Some(Event::Tag(TagToken {
            name,
            attributes,
            closing: false,
            self_closing,
            raw: &self.input[start..self.pos],
        }))
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }

        if let Some(name) = self.raw_text_until.take() {
            let event = self.next_raw_text(&name);
            // An empty region (e.g. <style></style>) carries no content
            // worth an event; fall through to the closing tag.
            if let Event::RawText("") = event {
                return self.next();
            }
            return Some(event);
        }

        let rest = &self.input[self.pos..];
        let Some(lt) = rest.find('<') else {
            let text = rest;
            self.pos = self.input.len();
            return Some(Event::Text(text));
        };

        if lt > 0 {
            let text = &rest[..lt];
            self.pos += lt;
            return Some(Event::Text(text));
        }

        let bytes = self.bytes();
        let after = self.pos + 1;

        let parsed = if after >= bytes.len() {
            None
        } else if bytes[after] == b'!' || bytes[after] == b'?' {
            return Some(self.next_markup_declaration());
        } else if bytes[after] == b'/' && after + 1 < bytes.len() && bytes[after + 1].is_ascii_alphabetic() {
            self.next_closing_tag()
        } else if bytes[after].is_ascii_alphabetic() {
            self.next_opening_tag()
        } else {
            None
        };

        match parsed {
            Some(event) => Some(event),
            None => {
                // Not a tag after all: the '<' is literal text.
                let text = &self.input[self.pos..=self.pos];
                self.pos += 1;
                Some(Event::Text(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<String> {
        Scanner::new(input)
            .map(|event| match event {
                Event::Text(t) => format!("text:{t}"),
                Event::RawText(t) => format!("raw:{t}"),
                Event::Comment(c) => format!("comment:{c}"),
                Event::Tag(t) => format!(
                    "{}{}{}",
                    if t.closing { "/" } else { "" },
                    t.name,
                    if t.self_closing { "/" } else { "" }
                ),
            })
            .collect()
    }

    #[test]
    fn splits_text_and_tags() {
        assert_eq!(collect("a<b>c</b>"), ["text:a", "b", "text:c", "/b"]);
    }

    #[test]
    fn parses_attributes_with_either_quote_style() {
        let events: Vec<_> = Scanner::new(r#"<a href="x" title='t u' id=z>"#).collect();
        let Event::Tag(tag) = &events[0] else {
            panic!("expected tag event");
        };
        assert_eq!(tag.attr("href"), Some("x"));
        assert_eq!(tag.attr("title"), Some("t u"));
        assert_eq!(tag.attr("id"), Some("z"));
    }

    #[test]
    fn script_content_is_never_tag_scanned() {
        assert_eq!(
            collect("<script>if (a < b) { x = \"<p>\"; }</script>"),
            ["script", "raw:if (a < b) { x = \"<p>\"; }", "/script"]
        );
    }

    #[test]
    fn unterminated_raw_text_runs_to_end_of_input() {
        assert_eq!(collect("<style>p { color"), ["style", "raw:p { color"]);
    }

    #[test]
    fn comments_and_doctypes_are_skipped_events() {
        assert_eq!(
            collect("<!doctype html><!-- note -->x"),
            ["comment:<!doctype html>", "comment: note ", "text:x"]
        );
    }

    #[test]
    fn malformed_fragments_degrade_to_text() {
        assert_eq!(collect("a < b"), ["text:a ", "text:<", "text: b"]);
        assert_eq!(collect("<p unclosed"), ["text:<", "text:p unclosed"]);
        assert_eq!(collect("<a href=\"oops>text"), ["text:<", "text:a href=\"oops>text"]);
    }

    #[test]
    fn self_closing_and_uppercase_names() {
        assert_eq!(collect("<BR/><IMG SRC=x>"), ["br/", "img"]);
    }
}
