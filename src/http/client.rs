//! HTTP transport: one request in, one classified response out.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use log::debug;
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};

use super::classify::{Decoded, Response, classify};
use super::request::{Request, join_url};
use crate::error::{Error, Result};

/// `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    concat!("midtrans-client-rust/", env!("MIDTRANS_CLIENT_VERSION"));

/// Upper bound on generated idempotency keys.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 100;

/// Header name of the per-request idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Length of the random part of an idempotency key.
const IDEMPOTENCY_ENTROPY_LEN: usize = 64;

/// Sends a single request and classifies the outcome.
///
/// Implementations perform exactly one network exchange per call and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// [`Transport`] backed by a reqwest [`Client`] bound to one base URL.
///
/// Authorization, base URL, extra headers and policy flags are fixed at
/// construction; concurrent calls share nothing else.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    authorization: Option<HeaderValue>,
    extra_headers: HeaderMap,
    idempotency: bool,
    throw_http_errors: bool,
}

impl HttpTransport {
    /// Creates a transport that sends every request to `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: None,
            extra_headers: HeaderMap::new(),
            idempotency: false,
            throw_http_errors: false,
        }
    }

    /// Authenticates every request with HTTP Basic, the server key as user and no password.
    pub fn with_server_key(mut self, server_key: &str) -> Result<Self> {
        let encoded = BASE64.encode(format!("{}:", server_key));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|_| Error::Configuration("Server key is not a valid header value".into()))?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(self)
    }

    /// Attaches a fresh `Idempotency-Key` to every request when enabled.
    pub fn with_idempotency(mut self, enabled: bool) -> Self {
        self.idempotency = enabled;
        self
    }

    /// Turns provider failures into [`Error::Provider`] when enabled.
    pub fn with_throw_http_errors(mut self, enabled: bool) -> Self {
        self.throw_http_errors = enabled;
        self
    }

    /// Headers added to every request after the defaults.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers = headers;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the outgoing header set. Later layers win per header name:
    /// defaults, idempotency key, authorization, client-wide extras, `overrides`.
    pub fn build_headers(&self, overrides: &HeaderMap) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        if self.idempotency {
            headers.insert(
                HeaderName::from_static(IDEMPOTENCY_KEY_HEADER),
                idempotency_header(&idempotency_key())?,
            );
        }

        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }

        for (name, value) in self.extra_headers.iter().chain(overrides.iter()) {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: Request) -> Result<Response> {
        // Size guard runs before any I/O
        let body = request.encoded_body()?;
        let url = join_url(&self.base_url, &request.path);
        let headers = self.build_headers(&request.headers)?;

        debug!("{} {}...", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let raw = response.text().await?;

        debug!("{} {} -> {} ({} bytes)", request.method, url, status, raw.len());

        let payload = classify(
            status,
            Decoded::parse(content_type.as_deref(), raw),
            self.throw_http_errors,
        )?;

        Ok(Response::new(status, payload))
    }
}

fn idempotency_header(key: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(key)
        .map_err(|_| Error::InvalidRequest(format!("Invalid idempotency key: {:?}", key)))
}

/// Generates an idempotency key: millisecond timestamp followed by random
/// alphanumerics, at most [`MAX_IDEMPOTENCY_KEY_LEN`] characters.
pub fn idempotency_key() -> String {
    let entropy: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(IDEMPOTENCY_ENTROPY_LEN)
        .map(char::from)
        .collect();

    let mut key = format!("{}{}", Utc::now().timestamp_millis(), entropy);
    key.truncate(MAX_IDEMPOTENCY_KEY_LEN);
    key
}
