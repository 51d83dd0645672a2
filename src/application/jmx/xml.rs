//! Minimal indented XML writer.
//!
//! Only what JMX documents need: a declaration, nested elements with
//! attributes, text-only elements and self-closing elements.

use std::borrow::Cow;

pub struct XmlWriter {
    out: String,
    indent: usize,
    depth: usize,
}

impl XmlWriter {
    pub fn new(indent: usize) -> Self {
        Self {
            out: String::with_capacity(4096),
            indent,
            depth: 0,
        }
    }

    pub fn declaration(&mut self) {
        self.out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }

    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start_line();
        self.push_tag(tag, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.start_line();
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    pub fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start_line();
        self.push_tag(tag, attrs);
        self.out.push_str("/>\n");
    }

    /// `<tag attrs>text</tag>` on one line; empty text keeps both tags.
    pub fn text(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        self.start_line();
        self.push_tag(tag, attrs);
        self.out.push('>');
        self.out.push_str(&escape(text));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn start_line(&mut self) {
        for _ in 0..self.depth * self.indent {
            self.out.push(' ');
        }
    }

    fn push_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attr(value));
            self.out.push('"');
        }
    }
}

/// Escape text content: the five XML special characters, plus `\r` as a
/// character reference so parsers do not fold it into `\n`.
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, false)
}

/// Escape an attribute value. Like [`escape`], and also keeps `\n` and `\t`
/// as character references, which attribute normalization would turn into
/// spaces.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, true)
}

fn escape_with(s: &str, attr: bool) -> Cow<'_, str> {
    let special = |c: char| {
        matches!(c, '&' | '<' | '>' | '"' | '\'' | '\r') || (attr && matches!(c, '\n' | '\t'))
    };
    if !s.contains(special) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\r' => escaped.push_str("&#13;"),
            '\n' if attr => escaped.push_str("&#10;"),
            '\t' if attr => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
