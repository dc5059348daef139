//! Escaping of text, attribute values and CDATA sections.
//!
//! Every string that leaves the document tree passes through exactly one of
//! these functions. The result is an [`Escaped`] value, the only kind of
//! dynamic content [`MarkupWriter`](crate::markup::MarkupWriter) accepts.
//!
//! Escaping is mechanical: already-escaped-looking input is escaped again.
//! Applying a function twice therefore corrupts content.

use std::fmt;

/// String that has been escaped for one specific markup position.
///
/// Can only be produced by the functions in this module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    /// Borrow the escaped content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the escaped content.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape text for use as element content.
///
/// Escapes `&`, `<` and `>`.
///
/// # Examples
///
/// ```
/// use conflux_storage::escape_text;
///
/// assert_eq!(escape_text("a < b & c").as_str(), "a &lt; b &amp; c");
/// ```
#[must_use]
pub fn escape_text(s: &str) -> Escaped {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            c => result.push(xml_char(c)),
        }
    }
    Escaped(result)
}

/// Escape text for use inside a double- or single-quoted attribute value.
///
/// Escapes everything [`escape_text`] does plus both quote characters.
#[must_use]
pub fn escape_attribute(s: &str) -> Escaped {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            c => result.push(xml_char(c)),
        }
    }
    Escaped(result)
}

/// Prepare literal text for a `<![CDATA[...]]>` section.
///
/// The section terminator `]]>` is split across two sections so the
/// literal survives unchanged when the document is read back.
#[must_use]
pub fn escape_cdata(s: &str) -> Escaped {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("]]>") {
        push_xml_chars(&mut result, &rest[..pos]);
        result.push_str("]]]]><![CDATA[>");
        rest = &rest[pos + 3..];
    }
    push_xml_chars(&mut result, rest);
    Escaped(result)
}

fn push_xml_chars(out: &mut String, s: &str) {
    out.extend(s.chars().map(xml_char));
}

/// Replace characters that cannot appear in an XML 1.0 document.
///
/// No escape form makes these well-formed, so they become U+FFFD.
fn xml_char(c: char) -> char {
    match c {
        '\t' | '\n' | '\r' => c,
        '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => char::REPLACEMENT_CHARACTER,
        c => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("<script>").as_str(), "&lt;script&gt;");
        assert_eq!(escape_text("a & b").as_str(), "a &amp; b");
        assert_eq!(escape_text(r#""quoted""#).as_str(), r#""quoted""#);
        assert_eq!(escape_text("it's").as_str(), "it's");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#""quoted""#).as_str(),
            "&quot;quoted&quot;"
        );
        assert_eq!(escape_attribute("it's").as_str(), "it&#x27;s");
        assert_eq!(escape_attribute("a<b>&c").as_str(), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn test_escaping_is_not_idempotent() {
        let once = escape_text("&");
        let twice = escape_text(once.as_str());
        assert_eq!(once.as_str(), "&amp;");
        assert_eq!(twice.as_str(), "&amp;amp;");
    }

    #[test]
    fn test_already_escaped_input_is_escaped_again() {
        assert_eq!(escape_text("&lt;").as_str(), "&amp;lt;");
        assert_eq!(escape_attribute("&quot;").as_str(), "&amp;quot;");
    }

    #[test]
    fn test_escape_cdata_terminator() {
        assert_eq!(
            escape_cdata("if (a]]>b) { }").as_str(),
            "if (a]]]]><![CDATA[>b) { }"
        );
        assert_eq!(
            escape_cdata("]]>]]>").as_str(),
            "]]]]><![CDATA[>]]]]><![CDATA[>"
        );
    }

    #[test]
    fn test_escape_cdata_leaves_markup_alone() {
        assert_eq!(escape_cdata("<a href=\"x\">&</a>").as_str(), "<a href=\"x\">&</a>");
    }

    #[test]
    fn test_invalid_xml_chars_replaced() {
        assert_eq!(escape_text("a\u{0}b").as_str(), "a\u{fffd}b");
        assert_eq!(escape_attribute("\u{1b}[0m").as_str(), "\u{fffd}[0m");
        assert_eq!(escape_cdata("x\u{8}").as_str(), "x\u{fffd}");
        assert_eq!(escape_text("tab\there\r\n").as_str(), "tab\there\r\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(escape_text("").as_str(), "");
        assert_eq!(escape_attribute("").as_str(), "");
        assert_eq!(escape_cdata("").as_str(), "");
    }
}
