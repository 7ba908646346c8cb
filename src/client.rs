//! The Midtrans client: one transport per target plus facade accessors.

use std::sync::Arc;

use log::debug;
use reqwest::Client;

use crate::config::{ClientOptions, Config, Env, SystemEnv, Target};
use crate::error::{Error, Result};
use crate::http::{Http, HttpTransport};
use crate::{iris, snap};

/// Entry point for all Midtrans APIs.
///
/// Cheap to clone; clones share the connection pool and immutable configuration,
/// and may be used from concurrent tasks.
#[derive(Clone)]
pub struct MidtransClient {
    sandbox: bool,
    core: Http,
    snap: Http,
    iris: Http,
}

impl MidtransClient {
    /// Builds a client from options, falling back to process environment variables.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::with_env(options, &SystemEnv)
    }

    /// Builds a client resolving missing options from `env`.
    pub fn with_env(options: ClientOptions, env: &dyn Env) -> Result<Self> {
        let config = Config::resolve(options, env)?;
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Self::from_config(&config, client)
    }

    /// Builds a client from an already resolved configuration and HTTP client.
    #[tracing::instrument(skip(config, client))]
    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        let http = |target: Target| -> Result<Http> {
            let transport = HttpTransport::new(client.clone(), config.base_url(target))
                .with_server_key(&config.credentials.server_key)?
                .with_idempotency(target.uses_idempotency_key())
                .with_throw_http_errors(config.throw_http_errors)
                .with_headers(config.headers.clone());

            debug!("Configured {} at {}", target, transport.base_url());

            Ok(Http::new(Arc::new(transport)).with_client_key(&config.credentials.client_key))
        };

        Ok(Self {
            sandbox: config.sandbox,
            core: http(Target::Core)?,
            snap: http(Target::Snap)?,
            iris: http(Target::Iris)?,
        })
    }

    /// Assembles a client from prebuilt targets, e.g. custom [`Transport`](crate::http::Transport)s.
    pub fn from_parts(sandbox: bool, core: Http, snap: Http, iris: Http) -> Self {
        Self {
            sandbox,
            core,
            snap,
            iris,
        }
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    /// Raw typed access to a target, for endpoints without a facade method.
    pub fn http(&self, target: Target) -> &Http {
        match target {
            Target::Core => &self.core,
            Target::Snap => &self.snap,
            Target::Iris => &self.iris,
        }
    }

    /// Core API: charges, transaction actions, subscriptions, payment links, invoices.
    pub fn core(&self) -> crate::core::Api<'_> {
        crate::core::Api::new(&self.core)
    }

    /// Snap checkout API.
    pub fn snap(&self) -> snap::Api<'_> {
        snap::Api::new(&self.snap)
    }

    /// Iris payout API.
    pub fn iris(&self) -> iris::Api<'_> {
        iris::Api::new(&self.iris)
    }
}
