//! Markdown parser.
//!
//! Two phases: a line-driven block phase builds the block structure, then an
//! inline phase parses the text of each leaf block. Neither phase can fail;
//! anything unrecognized stays literal text, and containers nested beyond
//! [`ParseOptions::max_nesting_depth`] are kept as [`Block::RawBlock`].
//!
//! [`Block::RawBlock`]: crate::Block::RawBlock

mod block;
mod inline;
mod table;

use crate::model::Document;

use self::block::BlockParser;

/// Default container nesting limit.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Parser settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest container level (block quotes, list items) that is parsed.
    /// Deeper containers become raw text.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Markdown parser with fixed options.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse Markdown source into a document.
    #[must_use]
    pub fn parse(&self, source: &str) -> Document {
        Document::new(BlockParser::new(&self.options).parse_document(source))
    }
}

/// Parse Markdown with default options.
///
/// # Examples
///
/// ```
/// use conflux_storage::{Block, parse};
///
/// let doc = parse("# Title\n\nBody");
/// assert_eq!(doc.blocks.len(), 2);
/// assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
/// ```
#[must_use]
pub fn parse(source: &str) -> Document {
    Parser::default().parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Inline};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_code_block_scenario() {
        let doc = parse("```python\nprint('hi')\n```");
        assert_eq!(
            doc.blocks,
            vec![Block::CodeBlock {
                language: Some("python".to_owned()),
                literal: "print('hi')".to_owned(),
            }]
        );
    }

    #[test]
    fn test_unterminated_emphasis_is_text() {
        let doc = parse("*unterminated");
        assert_eq!(doc.blocks, vec![Block::text("*unterminated")]);
    }

    #[test]
    fn test_literals_are_stored_unescaped() {
        let doc = parse("a < b & c");
        assert_eq!(doc.blocks, vec![Block::text("a < b & c")]);
    }

    #[test]
    fn test_deep_nesting_degrades() {
        let source = format!("{}deep", "> ".repeat(DEFAULT_MAX_NESTING_DEPTH + 10));
        let doc = parse(&source);

        let mut depth = 0;
        let mut blocks = &doc.blocks;
        loop {
            match blocks.as_slice() {
                [Block::BlockQuote { blocks: inner }] => {
                    depth += 1;
                    blocks = inner;
                }
                [Block::RawBlock { text }] => {
                    assert!(text.ends_with("deep"));
                    break;
                }
                other => panic!("unexpected blocks at depth {depth}: {other:?}"),
            }
        }
        assert_eq!(depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_custom_nesting_depth() {
        let parser = Parser::new(ParseOptions {
            max_nesting_depth: 1,
        });
        let doc = parser.parse("> > x");
        assert_eq!(
            doc.blocks,
            vec![Block::BlockQuote {
                blocks: vec![Block::RawBlock {
                    text: "> x".to_owned(),
                }],
            }]
        );
    }

    #[test]
    fn test_mixed_document() {
        let doc = parse(
            "# Guide\n\nSome *intro* text.\n\n- [x] done\n- [ ] todo\n\n| k | v |\n|---|---|\n| a | 1 |\n",
        );
        assert_eq!(doc.blocks.len(), 4);
        assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
        assert_eq!(
            doc.blocks[1],
            Block::paragraph(vec![
                Inline::Text("Some ".to_owned()),
                Inline::Emphasis(vec![Inline::Text("intro".to_owned())]),
                Inline::Text(" text.".to_owned()),
            ])
        );
        assert!(matches!(doc.blocks[2], Block::List(_)));
        assert!(matches!(doc.blocks[3], Block::Table(_)));
    }

    proptest! {
        #[test]
        fn parse_is_total(source in "\\PC{0,200}") {
            let _ = parse(&source);
        }

        #[test]
        fn parse_is_total_on_markdown_punctuation(source in "[-*_`~#>|\\[\\]()!<>\\\\ \\n0-9a-z.:]{0,200}") {
            let _ = parse(&source);
        }

        #[test]
        fn parse_is_deterministic(source in "[-*_`#>|\\[\\]() \\na-z]{0,120}") {
            prop_assert_eq!(parse(&source), parse(&source));
        }

        #[test]
        fn tables_have_uniform_rows(
            header in prop::collection::vec("[a-z]{1,5}", 1..5),
            rows in prop::collection::vec(prop::collection::vec("[a-z]{0,5}", 0..8), 0..5),
        ) {
            let mut source = format!("| {} |\n|{}\n", header.join(" | "), "---|".repeat(header.len()));
            for row in &rows {
                source.push_str(&format!("| {} |\n", row.join(" | ")));
            }
            let doc = parse(&source);
            if let Some(Block::Table(table)) = doc.blocks.first() {
                prop_assert_eq!(table.columns(), header.len());
                prop_assert_eq!(table.alignments().len(), header.len());
                for row in table.rows() {
                    prop_assert_eq!(row.len(), header.len());
                }
            } else {
                prop_assert!(false, "expected a table, got {:?}", doc.blocks);
            }
        }
    }
}
