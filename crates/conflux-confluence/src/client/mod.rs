//! Confluence REST API client.
//!
//! Provides a sync HTTP client for the Confluence content body conversion
//! endpoint with personal access token (Server / Data Center) or API token
//! (Cloud) authentication.

mod convert;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use ureq::Agent;

use conflux_config::{AuthType, ConfluenceConfig};

/// Request credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Personal access token sent as `Bearer <token>`.
    Bearer(String),
    /// Cloud API token sent as `Basic base64(email:token)`.
    Basic { email: String, token: String },
}

impl Auth {
    /// `Authorization` header value.
    pub(crate) fn header(&self) -> String {
        match self {
            Self::Bearer(token) => format!("Bearer {token}"),
            Self::Basic { email, token } => {
                format!("Basic {}", BASE64_STANDARD.encode(format!("{email}:{token}")))
            }
        }
    }
}

// Tokens must never end up in logs.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(..)"),
            Self::Basic { email, .. } => f
                .debug_struct("Basic")
                .field("email", email)
                .finish_non_exhaustive(),
        }
    }
}

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth: Auth,
}

impl ConfluenceClient {
    /// Create client for `base_url` with the given credentials and timeout.
    pub fn new(base_url: &str, auth: Auth, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
        }
    }

    /// Create client from a validated `[confluence]` section.
    pub fn from_config(config: &ConfluenceConfig) -> Self {
        let auth = match config.auth_type() {
            AuthType::Pat => Auth::Bearer(config.token.clone()),
            AuthType::Cloud => Auth::Basic {
                email: config.email.clone().unwrap_or_default(),
                token: config.token.clone(),
            },
        };
        Self::new(&config.base_url, auth, config.timeout())
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }
}
