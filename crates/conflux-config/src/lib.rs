//! Configuration management for Conflux.
//!
//! Parses `conflux.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.token`
//! - `confluence.email`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "conflux.toml";

/// Default container nesting limit for the parser.
const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Upper bound for `compiler.max_nesting_depth`.
const MAX_NESTING_DEPTH: usize = 512;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override parser nesting limit.
    pub max_nesting_depth: Option<usize>,
    /// Override TOC prepending.
    pub prepend_toc: Option<bool>,
    /// Override title extraction.
    pub extract_title: Option<bool>,
    /// Override Confluence base URL.
    pub base_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler configuration.
    pub compiler: CompilerConfig,
    /// Confluence configuration (optional section, needed for remote conversion).
    pub confluence: Option<ConfluenceConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown compiler configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Deepest container level the parser builds; deeper content stays raw text.
    pub max_nesting_depth: usize,
    /// Prepend a table of contents macro when the page has headings.
    pub prepend_toc: bool,
    /// Use the first H1 as the page title and remove it from the body.
    pub extract_title: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            prepend_toc: false,
            extract_title: false,
        }
    }
}

/// How requests to Confluence are authenticated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Personal access token, sent as a bearer token (Server / Data Center).
    Pat,
    /// API token with account email, sent as basic auth (Cloud).
    Cloud,
}

/// Confluence configuration.
#[derive(Debug, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence server base URL.
    pub base_url: String,
    /// Personal access token or Cloud API token.
    pub token: String,
    /// Account email, required for Cloud.
    #[serde(default)]
    pub email: Option<String>,
    /// Authentication scheme; inferred from `email` when omitted.
    #[serde(default)]
    pub auth_type: Option<AuthType>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.token, "confluence.token")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.auth_type() == AuthType::Cloud {
            let email = self.email.as_deref().unwrap_or_default();
            if email.is_empty() {
                return Err(ConfigError::Validation(
                    "confluence.email is required for cloud authentication".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Effective authentication scheme.
    ///
    /// An explicit `auth_type` wins; otherwise a configured email selects Cloud.
    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        match (self.auth_type, &self.email) {
            (Some(auth_type), _) => auth_type,
            (None, Some(email)) if !email.is_empty() => AuthType::Cloud,
            (None, _) => AuthType::Pat,
        }
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `conflux.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(depth) = settings.max_nesting_depth {
            self.compiler.max_nesting_depth = depth;
        }
        if let Some(prepend_toc) = settings.prepend_toc {
            self.compiler.prepend_toc = prepend_toc;
        }
        if let Some(extract_title) = settings.extract_title {
            self.compiler.extract_title = extract_title;
        }
        if let Some(base_url) = &settings.base_url
            && let Some(confluence) = &mut self.confluence
        {
            confluence.base_url = normalize_base_url(base_url);
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Returns the Confluence config if the `[confluence]` section is present
    /// and all fields are valid. Use this instead of accessing the `confluence`
    /// field directly when the command requires Confluence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("[confluence] section required in config".into())
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        if let Some(confluence) = &mut config.confluence {
            confluence.base_url = normalize_base_url(&confluence.base_url);
        }
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[confluence]` section is only checked by [`Config::require_confluence`],
    /// so local compilation works without credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.compiler.max_nesting_depth;
        if depth == 0 {
            return Err(ConfigError::Validation(
                "compiler.max_nesting_depth must be greater than 0".to_owned(),
            ));
        }
        if depth > MAX_NESTING_DEPTH {
            return Err(ConfigError::Validation(format!(
                "compiler.max_nesting_depth cannot exceed {MAX_NESTING_DEPTH}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.token = expand::expand_env(&confluence.token, "confluence.token")?;
            if let Some(ref email) = confluence.email {
                confluence.email = Some(expand::expand_env(email, "confluence.email")?);
            }
        }
        Ok(())
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}
