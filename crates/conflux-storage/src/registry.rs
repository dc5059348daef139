//! Closed registry of storage-format macros.
//!
//! Each [`MacroKind`] has exactly one row in [`REGISTRY`]. Adding a macro
//! means adding a variant, a row, and (if it is derived from parsed
//! structure) a case in [`macro_for`]. The parser and the escaping layer
//! never change.

use std::fmt;
use std::str::FromStr;

use crate::error::MacroError;
use crate::model::{Block, ListItem, MacroBody, MacroElement};

/// Kind of body a macro carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// No body element.
    None,
    /// `<ac:plain-text-body>` with CDATA content.
    PlainText,
    /// `<ac:rich-text-body>` with nested markup.
    RichBody,
}

impl BodyKind {
    /// Name of the body element.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PlainText => "plain-text-body",
            Self::RichBody => "rich-text-body",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known macro kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MacroKind {
    Code,
    TaskListItem,
    NoFormat,
    Info,
    Note,
    Tip,
    Warning,
    Panel,
    Expand,
    Toc,
}

/// One registry row.
#[derive(Clone, Copy, Debug)]
pub struct MacroSpec {
    pub kind: MacroKind,
    /// Value of the `ac:name` attribute.
    pub name: &'static str,
    pub body: BodyKind,
}

/// The registry table.
pub const REGISTRY: &[MacroSpec] = &[
    MacroSpec {
        kind: MacroKind::Code,
        name: "code",
        body: BodyKind::PlainText,
    },
    MacroSpec {
        kind: MacroKind::TaskListItem,
        name: "task-list-item",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::NoFormat,
        name: "noformat",
        body: BodyKind::PlainText,
    },
    MacroSpec {
        kind: MacroKind::Info,
        name: "info",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::Note,
        name: "note",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::Tip,
        name: "tip",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::Warning,
        name: "warning",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::Panel,
        name: "panel",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::Expand,
        name: "expand",
        body: BodyKind::RichBody,
    },
    MacroSpec {
        kind: MacroKind::Toc,
        name: "toc",
        body: BodyKind::None,
    },
];

impl MacroKind {
    /// Registry row for this kind.
    #[must_use]
    pub fn spec(self) -> &'static MacroSpec {
        let row = match self {
            Self::Code => 0,
            Self::TaskListItem => 1,
            Self::NoFormat => 2,
            Self::Info => 3,
            Self::Note => 4,
            Self::Tip => 5,
            Self::Warning => 6,
            Self::Panel => 7,
            Self::Expand => 8,
            Self::Toc => 9,
        };
        &REGISTRY[row]
    }

    /// Macro name as written in `ac:name`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Body kind from the registry.
    #[must_use]
    pub fn body_kind(self) -> BodyKind {
        self.spec().body
    }

    /// Look up a kind by its exact, case-sensitive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.kind)
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MacroKind {
    type Err = MacroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| MacroError::UnknownMacro(s.to_owned()))
    }
}

/// Construct that may map to a macro.
#[derive(Clone, Copy, Debug)]
pub enum MacroSource<'a> {
    Block(&'a Block),
    Item(&'a ListItem),
}

impl<'a> From<&'a Block> for MacroSource<'a> {
    fn from(block: &'a Block) -> Self {
        Self::Block(block)
    }
}

impl<'a> From<&'a ListItem> for MacroSource<'a> {
    fn from(item: &'a ListItem) -> Self {
        Self::Item(item)
    }
}

/// Macro for a parsed construct, or `None` when it maps to native markup.
///
/// # Examples
///
/// ```
/// use conflux_storage::{Block, MacroKind, macro_for};
///
/// let block = Block::CodeBlock {
///     language: Some("rust".to_owned()),
///     literal: "fn main() {}".to_owned(),
/// };
/// let element = macro_for(&block).unwrap();
/// assert_eq!(element.kind, MacroKind::Code);
/// assert_eq!(element.parameters["language"], "rust");
///
/// assert!(macro_for(&Block::ThematicBreak).is_none());
/// ```
pub fn macro_for<'a>(source: impl Into<MacroSource<'a>>) -> Option<MacroElement> {
    match source.into() {
        MacroSource::Block(Block::CodeBlock { language, literal }) => {
            let element = MacroElement::new(MacroKind::Code, MacroBody::PlainText(literal.clone()));
            Some(match language {
                Some(language) => element.with_parameter("language", language.clone()),
                None => element,
            })
        }
        MacroSource::Item(ListItem::Task { checked, blocks }) => Some(
            MacroElement::new(MacroKind::TaskListItem, MacroBody::RichBody(blocks.clone()))
                .with_parameter("checked", if *checked { "true" } else { "false" }),
        ),
        MacroSource::Block(_) | MacroSource::Item(ListItem::Plain { .. }) => None,
    }
}
