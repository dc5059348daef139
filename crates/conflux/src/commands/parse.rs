//! `conflux parse` command implementation.

use std::path::PathBuf;

use clap::Args;
use conflux_storage::{ParseOptions, Parser};

use super::{CompileArgs, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the parse command.
#[derive(Args, Debug)]
pub(crate) struct ParseArgs {
    /// Input file (default: stdin).
    input: Option<PathBuf>,

    #[command(flatten)]
    compile: CompileArgs,
}

impl ParseArgs {
    /// Execute the parse command.
    ///
    /// # Errors
    ///
    /// Returns an error if config loading or reading input fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.compile.load_config(None)?;
        let markdown = read_input(self.input.as_deref())?;

        let document = Parser::new(ParseOptions {
            max_nesting_depth: config.compiler.max_nesting_depth,
        })
        .parse(&markdown);

        output.result(&serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }
}
