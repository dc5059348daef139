//! `conflux macro` command implementation.

use std::path::PathBuf;

use clap::Args;
use conflux_storage::{
    BodyKind, MacroBody, MacroKind, MacroParameters, ParseOptions, Parser, render_macro,
};

use super::CompileArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the macro command.
#[derive(Args, Debug)]
pub(crate) struct MacroArgs {
    /// Macro name, e.g. `info`, `code`, `expand`.
    name: String,

    /// Macro parameter as `key=value`; repeatable, order is kept.
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Body text.
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the body from a file.
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// Treat the body as Markdown and render it as a rich body.
    #[arg(long)]
    rich: bool,

    #[command(flatten)]
    compile: CompileArgs,
}

impl MacroArgs {
    /// Execute the macro command.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown macros, body mismatches or unreadable files.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.compile.load_config(None)?;
        let text = match (&self.body, &self.body_file) {
            (Some(body), _) => Some(body.clone()),
            (None, Some(path)) => Some(std::fs::read_to_string(path)?),
            (None, None) => None,
        };

        if text.is_none()
            && let Ok(kind) = self.name.parse::<MacroKind>()
            && kind.body_kind() != BodyKind::None
        {
            output.warning(&format!("No body given, rendering an empty {}", kind.body_kind()));
        }

        let body = match text {
            None => MacroBody::None,
            Some(text) if self.rich => {
                let parser = Parser::new(ParseOptions {
                    max_nesting_depth: config.compiler.max_nesting_depth,
                });
                MacroBody::RichBody(parser.parse(&text).blocks)
            }
            Some(text) => MacroBody::PlainText(text),
        };

        let parameters: MacroParameters = self.params.into_iter().collect();
        let storage = render_macro(&self.name, parameters, body)?;
        output.result(&storage)?;
        Ok(())
    }
}

/// Parse a `key=value` parameter. The value may contain `=`.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(clap::Parser)]
    struct Harness {
        #[command(flatten)]
        args: MacroArgs,
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("title=a=b"),
            Ok(("title".to_owned(), "a=b".to_owned()))
        );
        assert_eq!(parse_param("flag="), Ok(("flag".to_owned(), String::new())));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_params_keep_order() {
        let harness = Harness::try_parse_from([
            "macro", "panel", "-p", "title=T", "--param", "borderStyle=solid", "--rich", "--body",
            "*x*",
        ])
        .unwrap();
        assert_eq!(harness.args.name, "panel");
        assert_eq!(
            harness.args.params,
            vec![
                ("title".to_owned(), "T".to_owned()),
                ("borderStyle".to_owned(), "solid".to_owned()),
            ]
        );
        assert!(harness.args.rich);
        assert_eq!(harness.args.body.as_deref(), Some("*x*"));
    }

    #[test]
    fn test_body_and_body_file_conflict() {
        assert!(
            Harness::try_parse_from(["macro", "code", "--body", "x", "--body-file", "f.txt"])
                .is_err()
        );
    }
}
