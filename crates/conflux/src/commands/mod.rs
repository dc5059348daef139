//! CLI command implementations.

mod convert;
mod macro_cmd;
mod parse;

pub(crate) use convert::ConvertArgs;
pub(crate) use macro_cmd::MacroArgs;
pub(crate) use parse::ParseArgs;

use std::path::{Path, PathBuf};

use clap::Args;
use conflux_config::{CliSettings, CompilerConfig, Config};
use conflux_storage::{Compiler, EmitOptions, ParseOptions};

use crate::error::CliError;

/// Compiler and config flags shared by commands that compile Markdown.
#[derive(Args, Debug, Default)]
pub(crate) struct CompileArgs {
    /// Path to configuration file (default: auto-discover conflux.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deepest container nesting the parser builds (overrides config).
    #[arg(long)]
    max_nesting_depth: Option<usize>,

    /// Prepend a table of contents macro when the page has headings.
    #[arg(long)]
    toc: bool,

    /// Use the first H1 as the page title and drop it from the body.
    #[arg(long)]
    extract_title: bool,
}

impl CompileArgs {
    /// Load config with these flags applied on top.
    pub(crate) fn load_config(&self, base_url: Option<String>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            max_nesting_depth: self.max_nesting_depth,
            prepend_toc: self.toc.then_some(true),
            extract_title: self.extract_title.then_some(true),
            base_url,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Compiler for the `[compiler]` section.
pub(crate) fn compiler(config: &CompilerConfig) -> Compiler {
    Compiler::new(
        ParseOptions {
            max_nesting_depth: config.max_nesting_depth,
        },
        EmitOptions {
            prepend_toc: config.prepend_toc,
            extract_title: config.extract_title,
        },
    )
}

/// Read a file, or stdin when the path is absent or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compiler_from_config() {
        let config = CompilerConfig {
            max_nesting_depth: 5,
            prepend_toc: true,
            extract_title: false,
        };
        let compiler = compiler(&config);
        assert_eq!(compiler.parse.max_nesting_depth, 5);
        assert!(compiler.emit.prepend_toc);
        assert!(!compiler.emit.extract_title);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conflux.toml");
        std::fs::write(&path, "[compiler]\nmax_nesting_depth = 10\n").unwrap();

        let args = CompileArgs {
            config: Some(path),
            max_nesting_depth: None,
            toc: true,
            extract_title: false,
        };
        let config = args.load_config(None).unwrap();
        assert_eq!(config.compiler.max_nesting_depth, 10);
        assert!(config.compiler.prepend_toc);
        assert!(!config.compiler.extract_title);
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.md");
        std::fs::write(&path, "# Page\n").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "# Page\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("absent.md"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
