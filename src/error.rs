//! Error types returned by every fallible operation of the client.

use serde_json::Value;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a client or performing a call.
///
/// - [`Error::Configuration`]: credentials or options rejected at construction
/// - [`Error::RequestTooLarge`]: body over the request size ceiling, nothing was sent
/// - [`Error::Transport`]: network failure, not retried
/// - [`Error::MalformedResponse`]: a JSON response that could not be decoded
/// - [`Error::Provider`]: Midtrans reported a failure; branch on its status code
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or invalid.
    #[error("{0}")]
    Configuration(String),

    /// Serialized request body exceeds the maximum request size.
    #[error("Request size of {size} bytes exceeds the {limit} byte limit")]
    RequestTooLarge { size: usize, limit: usize },

    /// The HTTP exchange itself failed (DNS, connection reset, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response claimed to be JSON, or was expected to decode into a type, and did not.
    #[error("Malformed response (HTTP {status}): {source}")]
    MalformedResponse {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// Midtrans reported a failure through the HTTP status or the embedded `status_code`.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The request could not be built from the given inputs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Returns the provider error if this is one.
    pub fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            Error::Provider(e) => Some(e),
            _ => None,
        }
    }
}

/// A failure reported by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderError {
    /// Provider message when the body carried one, otherwise a generic HTTP reason.
    pub message: String,
    /// HTTP status line code of the exchange.
    pub http_status: Option<u16>,
    /// The embedded `status_code` field exactly as sent (e.g. `"404"`).
    pub provider_status_code: Option<String>,
    /// Decoded body; text bodies are kept as a JSON string.
    pub raw_body: Option<Value>,
}

impl ProviderError {
    /// Numeric form of the embedded status code, falling back to the HTTP status.
    pub fn status_code(&self) -> Option<u16> {
        self.provider_status_code
            .as_deref()
            .and_then(parse_status_code)
            .or(self.http_status)
    }
}

/// Accepts integer and float forms (`"404"`, `"404.0"`) that fit a status code.
fn parse_status_code(code: &str) -> Option<u16> {
    let code = code.trim();
    code.parse::<u16>().ok().or_else(|| {
        code.parse::<f64>()
            .ok()
            .filter(|c| c.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(c))
            .map(|c| c as u16)
    })
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Midtrans error: {}", self.message)?;
        match (&self.provider_status_code, self.http_status) {
            (Some(code), Some(http)) => write!(f, " (status_code {}, HTTP {})", code, http),
            (Some(code), None) => write!(f, " (status_code {})", code),
            (None, Some(http)) => write!(f, " (HTTP {})", http),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for ProviderError {}
