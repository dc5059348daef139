//! Error types for macro rendering.
//!
//! Parsing and emission have no failure path; only a caller naming a macro
//! explicitly can get something wrong.

use crate::registry::BodyKind;

/// Error from [`render_macro`](crate::render_macro).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MacroError {
    /// Name is not in the macro registry.
    #[error("unknown macro: {0}")]
    UnknownMacro(String),

    /// Body of the wrong kind for this macro.
    #[error("macro {name} expects {expected}, got {found}")]
    BodyKindMismatch {
        /// Macro name.
        name: &'static str,
        /// Body kind from the registry.
        expected: BodyKind,
        /// Body kind that was passed.
        found: BodyKind,
    },
}
