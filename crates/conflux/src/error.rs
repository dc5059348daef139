//! CLI error types.

use conflux_config::ConfigError;
use conflux_confluence::ConvertError;
use conflux_storage::MacroError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Macro(#[from] MacroError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
