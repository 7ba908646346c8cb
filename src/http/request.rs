//! Request envelope: verb, path, query, headers and JSON body of one call.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum allowed size of a serialized request body (16 KiB).
pub const MAX_REQUEST_SIZE: usize = 16 * 1024;

/// Header carrying the preferred language of provider messages.
pub const PAYMENT_LOCALE_HEADER: &str = "x-payment-locale";

/// Languages accepted by the `X-Payment-Locale` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Indonesian,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::English => "en-EN",
            Locale::Indonesian => "id-ID",
        }
    }
}

/// One outgoing call, built fresh for every request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends query parameters from a flat serializable map.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        self.query.extend(query_pairs(query)?);
        Ok(self)
    }

    /// Sets the JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::InvalidRequest(format!("Failed to serialize request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Sets a per-call header, replacing any default with the same name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidRequest(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidRequest(format!("Invalid value for header {}", name)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.headers.insert(
            HeaderName::from_static(PAYMENT_LOCALE_HEADER),
            HeaderValue::from_static(locale.as_str()),
        );
        self
    }

    /// Serializes the body to its wire form, rejecting bodies over [`MAX_REQUEST_SIZE`].
    pub fn encoded_body(&self) -> Result<Option<Vec<u8>>> {
        let Some(body) = &self.body else {
            return Ok(None);
        };

        let bytes = serde_json::to_vec(body)
            .map_err(|e| Error::InvalidRequest(format!("Failed to serialize request body: {}", e)))?;

        if bytes.len() > MAX_REQUEST_SIZE {
            return Err(Error::RequestTooLarge {
                size: bytes.len(),
                limit: MAX_REQUEST_SIZE,
            });
        }

        Ok(Some(bytes))
    }
}

/// Flattens a serializable map into query pairs.
///
/// `null` entries are dropped, strings are used verbatim and every other value
/// is rendered as JSON text (`1`, `true`, ...).
pub fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(query)
        .map_err(|e| Error::InvalidRequest(format!("Failed to serialize query: {}", e)))?;

    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(Error::InvalidRequest(format!(
                "Query parameters must be a map, got {}",
                other
            )));
        }
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Joins a base URL and a resource path with exactly one slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
