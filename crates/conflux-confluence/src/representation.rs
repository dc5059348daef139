//! Content representation tags accepted at the conversion boundary.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Named content encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Confluence storage format (XHTML with `ac:` macros).
    Storage,
    /// Editor format.
    Editor,
    /// Rendered HTML view.
    View,
    /// Legacy wiki markup.
    Wiki,
    /// Markdown source. Only ever a source, never a conversion target.
    Markdown,
}

impl Representation {
    /// All tags, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Storage,
        Self::Editor,
        Self::View,
        Self::Wiki,
        Self::Markdown,
    ];

    /// Lowercase tag used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Editor => "editor",
            Self::View => "view",
            Self::Wiki => "wiki",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag outside the closed representation set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown representation: {0}")]
pub struct UnknownRepresentation(pub String);

impl FromStr for Representation {
    type Err = UnknownRepresentation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|repr| repr.as_str() == s)
            .ok_or_else(|| UnknownRepresentation(s.to_owned()))
    }
}
