//! Typed verbs over a [`Transport`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::Transport;
use super::request::Request;
use crate::error::Result;

/// Typed access to one remote target.
///
/// Every verb builds a fresh [`Request`] and funnels it through [`Http::send`],
/// so serialization, size checks and classification live in one place.
#[derive(Clone)]
pub struct Http {
    transport: Arc<dyn Transport>,
    client_key: Option<String>,
}

impl Http {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            client_key: None,
        }
    }

    /// Client key appended to tokenization and card registration queries.
    pub fn with_client_key(mut self, client_key: impl Into<String>) -> Self {
        self.client_key = Some(client_key.into());
        self
    }

    pub fn client_key(&self) -> Option<&str> {
        self.client_key.as_deref()
    }

    /// Sends a prepared request and decodes the payload into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        self.transport.send(request).await?.decode()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Request::get(path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Request::get(path).query(query)?).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Request::post(path).json(body)?).await
    }

    /// POST without a body, used by the order action endpoints.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Request::post(path)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Request::patch(path).json(body)?).await
    }

    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Request::patch(path)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Request::delete(path)).await
    }

    pub async fn delete_with_body<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Request::delete(path).json(body)?).await
    }
}
