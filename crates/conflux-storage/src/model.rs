//! Intermediate document tree.
//!
//! Produced by the parser, consumed by the emitter. Every literal is stored
//! exactly as it appeared in the source; escaping happens only on output.

use indexmap::IndexMap;

use crate::registry::{BodyKind, MacroKind};

/// Parsed Markdown document: an ordered sequence of blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Top-level blocks in source order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a document from blocks.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Whether the document has any heading at any nesting level.
    #[must_use]
    pub fn has_headings(&self) -> bool {
        fn any_heading(blocks: &[Block]) -> bool {
            blocks.iter().any(|block| match block {
                Block::Heading { .. } => true,
                Block::BlockQuote { blocks } => any_heading(blocks),
                Block::List(list) => list.items.iter().any(|item| any_heading(item.blocks())),
                _ => false,
            })
        }
        any_heading(&self.blocks)
    }
}

/// Structural node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Block {
    /// Paragraph of inline content.
    Paragraph { content: Vec<Inline> },
    /// Heading with level 1-6.
    Heading { level: u8, content: Vec<Inline> },
    /// Fenced or indented code.
    CodeBlock {
        language: Option<String>,
        literal: String,
    },
    /// Ordered or unordered list.
    List(List),
    /// Table with a fixed column count.
    Table(Table),
    /// Block quote with nested blocks.
    BlockQuote { blocks: Vec<Block> },
    /// Horizontal rule.
    ThematicBreak,
    /// Source the parser gave up on; always emitted as escaped text.
    RawBlock { text: String },
}

impl Block {
    /// Paragraph from inline content.
    #[must_use]
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::Paragraph { content }
    }

    /// Paragraph holding a single text run.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Paragraph {
            content: vec![Inline::Text(text.into())],
        }
    }
}

/// List of items.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct List {
    /// Whether the list is numbered.
    pub ordered: bool,
    /// Number of the first item for ordered lists.
    pub start: Option<u64>,
    /// Tight lists render item paragraphs without `<p>` wrappers.
    pub tight: bool,
    /// Items in source order.
    pub items: Vec<ListItem>,
}

/// Single list item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ListItem {
    /// Regular item.
    Plain { blocks: Vec<Block> },
    /// Task item (`- [ ]` / `- [x]`).
    Task { checked: bool, blocks: Vec<Block> },
}

impl ListItem {
    /// Item content regardless of kind.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        match self {
            Self::Plain { blocks } | Self::Task { blocks, .. } => blocks,
        }
    }
}

/// Column alignment from the separator row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Table cell content.
pub type TableCell = Vec<Inline>;

/// Table whose rows all have the header's column count.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawTable"))]
pub struct Table {
    alignments: Vec<Alignment>,
    header: Vec<TableCell>,
    rows: Vec<Vec<TableCell>>,
}

impl Table {
    /// Build a table, normalizing every row to the header width.
    ///
    /// Short rows are padded with empty cells, long rows are truncated.
    /// Alignments are normalized the same way.
    #[must_use]
    pub fn new(
        header: Vec<TableCell>,
        mut alignments: Vec<Alignment>,
        mut rows: Vec<Vec<TableCell>>,
    ) -> Self {
        let columns = header.len();
        alignments.resize(columns, Alignment::None);
        for row in &mut rows {
            row.resize_with(columns, Vec::new);
        }
        Self {
            alignments,
            header,
            rows,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.header.len()
    }

    #[must_use]
    pub fn header(&self) -> &[TableCell] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<TableCell>] {
        &self.rows
    }

    #[must_use]
    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }
}

/// Deserialized table before row normalization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTable {
    alignments: Vec<Alignment>,
    header: Vec<TableCell>,
    rows: Vec<Vec<TableCell>>,
}

#[cfg(feature = "serde")]
impl From<RawTable> for Table {
    fn from(raw: RawTable) -> Self {
        Self::new(raw.header, raw.alignments, raw.rows)
    }
}

/// Text-flow node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    CodeSpan(String),
    Link {
        label: Vec<Inline>,
        url: String,
        title: Option<String>,
    },
    Image {
        alt: String,
        url: String,
        title: Option<String>,
    },
    LineBreak,
    SoftBreak,
}

impl Inline {
    /// Plain text of this node, as used for image alt text.
    pub(crate) fn push_plain_text(&self, out: &mut String) {
        match self {
            Self::Text(text) | Self::CodeSpan(text) => out.push_str(text),
            Self::Emphasis(children) | Self::Strong(children) | Self::Strikethrough(children) => {
                children.iter().for_each(|child| child.push_plain_text(out));
            }
            Self::Link { label, .. } => label.iter().for_each(|child| child.push_plain_text(out)),
            Self::Image { alt, .. } => out.push_str(alt),
            Self::LineBreak | Self::SoftBreak => out.push(' '),
        }
    }
}

/// Plain text of an inline sequence.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.push_plain_text(&mut out);
    }
    out
}

/// Macro parameters in insertion order with unique keys.
pub type MacroParameters = IndexMap<String, String>;

/// Body of a macro instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum MacroBody {
    /// No body element.
    None,
    /// Literal text, emitted as CDATA.
    PlainText(String),
    /// Nested blocks, emitted as markup.
    RichBody(Vec<Block>),
}

impl MacroBody {
    /// Whether the body carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::PlainText(text) => text.is_empty(),
            Self::RichBody(blocks) => blocks.is_empty(),
        }
    }

    /// Body kind this value carries.
    #[must_use]
    pub fn kind(&self) -> BodyKind {
        match self {
            Self::None => BodyKind::None,
            Self::PlainText(_) => BodyKind::PlainText,
            Self::RichBody(_) => BodyKind::RichBody,
        }
    }

    /// Empty body of the given kind.
    #[must_use]
    pub fn empty(kind: BodyKind) -> Self {
        match kind {
            BodyKind::None => Self::None,
            BodyKind::PlainText => Self::PlainText(String::new()),
            BodyKind::RichBody => Self::RichBody(Vec::new()),
        }
    }
}

/// One storage-format macro instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroElement {
    /// Registry entry this instance belongs to.
    pub kind: MacroKind,
    /// Parameters, serialized in insertion order.
    pub parameters: MacroParameters,
    /// Body content.
    pub body: MacroBody,
}

impl MacroElement {
    /// Create a macro with no parameters.
    #[must_use]
    pub fn new(kind: MacroKind, body: MacroBody) -> Self {
        Self {
            kind,
            parameters: MacroParameters::new(),
            body,
        }
    }

    /// Add a parameter, replacing an existing value for the same key in place.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
