//! Client configuration and its resolution from options and environment.
//!
//! Precedence for every setting: explicit [`ClientOptions`] field, then the
//! sandbox-specific variable (sandbox mode only), then the production variable.

mod env;

use std::collections::HashMap;

use log::debug;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};

pub use env::{Env, SystemEnv};

#[cfg(test)]
pub use env::MockEnv;

pub const ENV_SANDBOX: &str = "MIDTRANS_SANDBOX";
pub const ENV_SERVER_KEY: &str = "MIDTRANS_SERVER_KEY";
pub const ENV_CLIENT_KEY: &str = "MIDTRANS_CLIENT_KEY";
pub const ENV_SANDBOX_SERVER_KEY: &str = "MIDTRANS_SANDBOX_SERVER_KEY";
pub const ENV_SANDBOX_CLIENT_KEY: &str = "MIDTRANS_SANDBOX_CLIENT_KEY";
pub const ENV_THROW_HTTP_ERRORS: &str = "MIDTRANS_THROW_HTTP_ERRORS";

const MISSING_KEYS: &str = "Midtrans server and client key is required";

/// One of the remote services the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Core transaction API.
    Core,
    /// Snap checkout API.
    Snap,
    /// Iris payout API.
    Iris,
}

impl Target {
    pub fn base_url(self, sandbox: bool) -> &'static str {
        match (self, sandbox) {
            (Target::Core, true) => "https://api.sandbox.midtrans.com",
            (Target::Core, false) => "https://api.midtrans.com",
            (Target::Snap | Target::Iris, true) => "https://app.sandbox.midtrans.com",
            (Target::Snap | Target::Iris, false) => "https://app.midtrans.com",
        }
    }

    /// Payout requests carry an `Idempotency-Key` so retried calls are deduplicated.
    pub fn uses_idempotency_key(self) -> bool {
        matches!(self, Target::Iris)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Target::Core => "core API",
            Target::Snap => "Snap API",
            Target::Iris => "payout API",
        };
        write!(f, "{}", name)
    }
}

/// Options accepted by [`MidtransClient`](crate::MidtransClient); unset fields
/// fall back to the environment.
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Use the sandbox endpoints. Defaults to `MIDTRANS_SANDBOX`, then `true`.
    pub sandbox: Option<bool>,
    pub client_key: Option<String>,
    pub server_key: Option<String>,
    /// Fail with [`Error::Provider`] on HTTP or embedded status codes of 400 and above.
    pub throw_http_errors: Option<bool>,
    /// Headers sent with every request, e.g. `X-Payment-Locale`.
    pub headers: HashMap<String, String>,
    pub core_api_base_url: Option<String>,
    pub snap_api_base_url: Option<String>,
    pub iris_api_base_url: Option<String>,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("sandbox", &self.sandbox)
            .field("client_key", &self.client_key.as_ref().map(|_| "<redacted>"))
            .field("server_key", &self.server_key.as_ref().map(|_| "<redacted>"))
            .field("throw_http_errors", &self.throw_http_errors)
            .field("headers", &self.headers)
            .field("core_api_base_url", &self.core_api_base_url)
            .field("snap_api_base_url", &self.snap_api_base_url)
            .field("iris_api_base_url", &self.iris_api_base_url)
            .finish()
    }
}

/// Resolved keys; immutable once the client is built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_key: String,
    pub server_key: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_key", &"<redacted>")
            .field("server_key", &"<redacted>")
            .finish()
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub sandbox: bool,
    pub credentials: ClientCredentials,
    pub throw_http_errors: bool,
    pub headers: HeaderMap,
    base_urls: HashMap<Target, String>,
}

impl Config {
    /// Resolves options against `env`. Fails when either key is missing or an
    /// explicit base URL or header is invalid.
    #[tracing::instrument(skip(options, env))]
    pub fn resolve(options: ClientOptions, env: &dyn Env) -> Result<Self> {
        let sandbox = options
            .sandbox
            .or_else(|| env.var(ENV_SANDBOX).as_deref().and_then(parse_flag))
            .unwrap_or(true);

        let server_key = resolve_key(
            options.server_key,
            env,
            sandbox,
            ENV_SANDBOX_SERVER_KEY,
            ENV_SERVER_KEY,
        );
        let client_key = resolve_key(
            options.client_key,
            env,
            sandbox,
            ENV_SANDBOX_CLIENT_KEY,
            ENV_CLIENT_KEY,
        );

        let (Some(server_key), Some(client_key)) = (server_key, client_key) else {
            return Err(Error::Configuration(MISSING_KEYS.to_string()));
        };

        let throw_http_errors = options
            .throw_http_errors
            .or_else(|| env.var(ENV_THROW_HTTP_ERRORS).as_deref().and_then(parse_flag))
            .unwrap_or(false);

        let mut base_urls = HashMap::new();
        for (target, explicit) in [
            (Target::Core, options.core_api_base_url),
            (Target::Snap, options.snap_api_base_url),
            (Target::Iris, options.iris_api_base_url),
        ] {
            let url = match explicit {
                Some(url) => validate_base_url(target, url)?,
                None => target.base_url(sandbox).to_string(),
            };
            base_urls.insert(target, url);
        }

        let headers = header_map(&options.headers)?;

        debug!(
            "Resolved Midtrans configuration (sandbox: {}, throw_http_errors: {})",
            sandbox, throw_http_errors
        );

        Ok(Self {
            sandbox,
            credentials: ClientCredentials {
                client_key,
                server_key,
            },
            throw_http_errors,
            headers,
            base_urls,
        })
    }

    pub fn base_url(&self, target: Target) -> &str {
        self.base_urls
            .get(&target)
            .map(String::as_str)
            .unwrap_or_else(|| target.base_url(self.sandbox))
    }
}

/// Returns the first candidate that is present and non-empty.
pub fn resolve_first<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn resolve_key(
    explicit: Option<String>,
    env: &dyn Env,
    sandbox: bool,
    sandbox_var: &str,
    production_var: &str,
) -> Option<String> {
    resolve_first([
        explicit,
        if sandbox { env.var(sandbox_var) } else { None },
        env.var(production_var),
    ])
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn validate_base_url(target: Target, url: String) -> Result<String> {
    Url::parse(&url)
        .map_err(|e| Error::Configuration(format!("Invalid base URL for {}: {}", target, e)))?;
    Ok(url.trim_end_matches('/').to_string())
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::Configuration(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Configuration(format!("Invalid value for header {}", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}
