//! Output buffer that only accepts structural markup and escaped content.
//!
//! Structural markup is restricted to `&'static str` so no input-derived
//! string can be written without passing through the escaping layer. Each
//! escape function has exactly one call site, in this file.

use std::fmt::Write;

use crate::escape::{escape_attribute, escape_cdata, escape_text};

/// Storage-format output buffer.
#[derive(Debug, Default)]
pub(crate) struct MarkupWriter {
    out: String,
}

impl MarkupWriter {
    pub(crate) fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
        }
    }

    /// Write structural markup generated by the emitter itself.
    pub(crate) fn markup(&mut self, markup: &'static str) {
        self.out.push_str(markup);
    }

    /// Write element content.
    pub(crate) fn text(&mut self, text: &str) {
        self.out.push_str(escape_text(text).as_str());
    }

    /// Write ` name="value"` inside an open tag.
    pub(crate) fn attribute(&mut self, name: &'static str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(escape_attribute(value).as_str());
        self.out.push('"');
    }

    /// Write a complete CDATA section holding `literal`.
    pub(crate) fn cdata(&mut self, literal: &str) {
        self.out.push_str("<![CDATA[");
        self.out.push_str(escape_cdata(literal).as_str());
        self.out.push_str("]]>");
    }

    /// Write a decimal number.
    pub(crate) fn number(&mut self, n: u64) {
        // Writing to a String cannot fail.
        let _ = write!(self.out, "{n}");
    }

    /// Append everything another writer produced.
    pub(crate) fn append(&mut self, other: MarkupWriter) {
        self.out.push_str(&other.out);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let mut writer = MarkupWriter::new();
        writer.markup("<p>");
        writer.text("a < b & c");
        writer.markup("</p>");
        assert_eq!(writer.finish(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_attribute_is_escaped() {
        let mut writer = MarkupWriter::new();
        writer.markup("<a");
        writer.attribute("href", r#"x" onclick="y"#);
        writer.markup(">");
        assert_eq!(
            writer.finish(),
            r#"<a href="x&quot; onclick=&quot;y">"#
        );
    }

    #[test]
    fn test_cdata() {
        let mut writer = MarkupWriter::new();
        writer.cdata("a]]>b");
        assert_eq!(writer.finish(), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn test_number() {
        let mut writer = MarkupWriter::new();
        writer.number(42);
        assert_eq!(writer.finish(), "42");
    }
}
