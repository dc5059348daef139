//! Entry points: compile Markdown, or render one named macro.

use crate::emit::{EmitOptions, EmitResult, Emitter, emit, emit_macro};
use crate::error::MacroError;
use crate::model::{MacroBody, MacroElement, MacroParameters};
use crate::parser::{ParseOptions, Parser, parse};
use crate::registry::MacroKind;

/// Render a single macro by registry name.
///
/// Parameters are written in the order given. An empty body of any kind is
/// accepted and written as the registry's body kind; a non-empty body of the
/// wrong kind is an error.
///
/// # Errors
///
/// * [`MacroError::UnknownMacro`] if `name` is not a registry name.
/// * [`MacroError::BodyKindMismatch`] if `body` does not fit the macro.
///
/// # Examples
///
/// ```
/// use conflux_storage::{MacroBody, MacroParameters, render_macro};
///
/// let mut parameters = MacroParameters::new();
/// parameters.insert("language".to_owned(), "python".to_owned());
///
/// let storage = render_macro("code", parameters, MacroBody::PlainText("print('hi')".to_owned()))?;
/// assert!(storage.starts_with(r#"<ac:structured-macro ac:name="code""#));
/// # Ok::<(), conflux_storage::MacroError>(())
/// ```
pub fn render_macro(
    name: &str,
    parameters: MacroParameters,
    body: MacroBody,
) -> Result<String, MacroError> {
    let kind: MacroKind = name.parse()?;
    let expected = kind.body_kind();

    let body = if body.is_empty() {
        MacroBody::empty(expected)
    } else if body.kind() == expected {
        body
    } else {
        return Err(MacroError::BodyKindMismatch {
            name: kind.name(),
            expected,
            found: body.kind(),
        });
    };

    Ok(emit_macro(&MacroElement {
        kind,
        parameters,
        body,
    }))
}

/// Compile Markdown to storage format with default options.
///
/// # Examples
///
/// ```
/// assert_eq!(conflux_storage::compile("a < b & c"), "<p>a &lt; b &amp; c</p>");
/// ```
#[must_use]
pub fn compile(markdown: &str) -> String {
    emit(&parse(markdown))
}

/// Parser and emitter settings for one compilation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Compiler {
    pub parse: ParseOptions,
    pub emit: EmitOptions,
}

impl Compiler {
    #[must_use]
    pub fn new(parse: ParseOptions, emit: EmitOptions) -> Self {
        Self { parse, emit }
    }

    /// Parse and emit.
    #[must_use]
    pub fn compile(&self, markdown: &str) -> EmitResult {
        let document = Parser::new(self.parse).parse(markdown);
        Emitter::new(self.emit).emit(&document)
    }
}
