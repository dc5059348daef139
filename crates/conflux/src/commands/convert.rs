//! `conflux convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use conflux_confluence::{ConfluenceClient, Converter, Representation};

use super::{CompileArgs, compiler, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args, Debug)]
pub(crate) struct ConvertArgs {
    /// Input file (default: stdin).
    input: Option<PathBuf>,

    /// Source representation: markdown, storage, editor, view or wiki.
    #[arg(long, default_value = "markdown")]
    from: Representation,

    /// Target representation: storage, editor, view or wiki.
    #[arg(long, default_value = "storage")]
    to: Representation,

    /// Confluence base URL (overrides config).
    #[arg(long, env = "CONFLUENCE_BASE_URL")]
    base_url: Option<String>,

    #[command(flatten)]
    compile: CompileArgs,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if config loading, reading input or conversion fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.compile.load_config(self.base_url.clone())?;
        let compiler = compiler(&config.compiler);

        if let Some(path) = &self.input {
            output.info(&format!("Converting {}...", path.display()));
        }
        let content = read_input(self.input.as_deref())?;

        // Local compile also yields the extracted title.
        if self.from == Representation::Markdown && self.to == Representation::Storage {
            let result = compiler.compile(&content);
            if let Some(title) = &result.title {
                output.highlight(&format!("Title: {title}"));
            }
            output.result(&result.storage)?;
            return Ok(());
        }

        let client = match &config.confluence {
            Some(_) => Some(ConfluenceClient::from_config(config.require_confluence()?)),
            None => None,
        };
        let converter = Converter::with_compiler(client, compiler);
        let converted = converter.convert(&content, self.from, self.to)?;
        output.result(&converted)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ConvertArgs,
    }

    #[test]
    fn test_defaults_to_markdown_storage() {
        let harness = Harness::try_parse_from(["convert"]).unwrap();
        assert_eq!(harness.args.from, Representation::Markdown);
        assert_eq!(harness.args.to, Representation::Storage);
        assert!(harness.args.input.is_none());
    }

    #[test]
    fn test_parses_representations() {
        let harness =
            Harness::try_parse_from(["convert", "page.txt", "--from", "wiki", "--to", "view"])
                .unwrap();
        assert_eq!(harness.args.from, Representation::Wiki);
        assert_eq!(harness.args.to, Representation::View);
        assert_eq!(harness.args.input, Some(PathBuf::from("page.txt")));
    }

    #[test]
    fn test_rejects_unknown_representation() {
        assert!(Harness::try_parse_from(["convert", "--to", "pdf"]).is_err());
    }
}
