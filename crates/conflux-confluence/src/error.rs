//! Error types for representation conversion.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::representation::Representation;

/// Longest response body kept in an error, in characters.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Credentials echoed back by a server inside an error body.
static CREDENTIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(Bearer|Basic)\s+[^\s"',;]+"#).unwrap());

/// Error from a conversion request.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The pair cannot be converted: identical tags, a Markdown target, or a
    /// tag outside the closed set.
    #[error("invalid representation pair: {from} -> {to}")]
    InvalidRepresentationPair {
        /// Source tag as given.
        from: String,
        /// Target tag as given.
        to: String,
    },

    /// The pair needs the remote service but none is configured.
    #[error("converting {from} to {to} requires a [confluence] section in conflux.toml")]
    ServiceUnavailable {
        from: Representation,
        to: Representation,
    },

    /// The remote service did not answer within the configured timeout.
    #[error("timeout converting content")]
    Timeout,

    /// HTTP request failed (network, TLS, protocol).
    #[error("HTTP request failed")]
    HttpRequest(#[source] ureq::Error),

    /// The server rejected the credentials (401).
    #[error("authentication failed, check the Confluence token in conflux.toml")]
    Unauthorized,

    /// The credentials lack access (403).
    #[error("permission denied")]
    Forbidden,

    /// Unknown endpoint or content (404).
    #[error("resource not found")]
    NotFound,

    /// Too many requests (429).
    #[error("rate limit exceeded")]
    RateLimited,

    /// 400 with a `message` explaining what was wrong with the input.
    #[error("validation error: {0}")]
    Validation(String),

    /// 400 without a usable message.
    #[error("bad request: {body}")]
    BadRequest {
        /// Truncated, redacted response body.
        body: String,
    },

    /// Any other error status.
    #[error("Confluence API error ({status}): {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Truncated, redacted response body.
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Successful response without a `value` field.
    #[error("conversion response has no value")]
    MissingValue,
}

/// Error payload of a 400 response.
#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

impl ConvertError {
    /// Map an error status and its response body to an error safe to show
    /// or log.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            400 => match serde_json::from_str::<ErrorPayload>(body) {
                Ok(payload) if !payload.message.is_empty() => {
                    Self::Validation(safe_error_body(&payload.message))
                }
                _ => Self::BadRequest {
                    body: safe_error_body(body),
                },
            },
            _ => Self::HttpResponse {
                status,
                body: safe_error_body(body),
            },
        }
    }
}

impl From<ureq::Error> for ConvertError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => Self::Timeout,
            other => Self::HttpRequest(other),
        }
    }
}

/// Truncate a response body and strip credentials.
fn safe_error_body(body: &str) -> String {
    let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    CREDENTIAL_RE
        .replace_all(&truncated, "[REDACTED]")
        .into_owned()
}
