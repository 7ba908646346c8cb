//! HTTP transport, request envelope and response classification.

mod classify;
mod client;
mod endpoint;
mod request;

pub use classify::{Decoded, Payload, Response, classify};
pub use client::{
    DEFAULT_USER_AGENT, HttpTransport, IDEMPOTENCY_KEY_HEADER, MAX_IDEMPOTENCY_KEY_LEN, Transport,
    idempotency_key,
};
pub use endpoint::Http;
pub use request::{Locale, MAX_REQUEST_SIZE, PAYMENT_LOCALE_HEADER, Request, join_url, query_pairs};
pub use reqwest::Method;

#[cfg(test)]
pub use client::MockTransport;
