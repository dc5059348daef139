//! Markdown to Confluence storage format compiler.
//!
//! The pipeline is `parse` → [`Document`] → `emit`. Parsing and emission
//! are total: any input produces a document, and any document produces
//! well-formed storage markup. Input-derived text reaches the output only
//! through the escaping layer.
//!
//! # Example
//!
//! ```
//! use conflux_storage::{Compiler, EmitOptions, ParseOptions};
//!
//! let compiler = Compiler::new(ParseOptions::default(), EmitOptions::default());
//! let result = compiler.compile("Use `cargo` **carefully**.");
//! assert_eq!(
//!     result.storage,
//!     "<p>Use <code>cargo</code> <strong>carefully</strong>.</p>"
//! );
//! ```
//!
//! Macros that do not come from Markdown syntax (panels, notes, expand
//! sections) are rendered by name with [`render_macro`].

mod emit;
mod error;
mod escape;
mod markup;
mod model;
mod parser;
mod registry;
mod render;
#[cfg(test)]
mod testing;

pub use emit::{EmitOptions, EmitResult, Emitter, emit};
pub use error::MacroError;
pub use escape::{Escaped, escape_attribute, escape_cdata, escape_text};
pub use model::{
    Alignment, Block, Document, Inline, List, ListItem, MacroBody, MacroElement, MacroParameters,
    Table, TableCell, plain_text,
};
pub use parser::{DEFAULT_MAX_NESTING_DEPTH, ParseOptions, Parser, parse};
pub use registry::{BodyKind, MacroKind, MacroSource, MacroSpec, REGISTRY, macro_for};
pub use render::{Compiler, compile, render_macro};
