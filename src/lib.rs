//! Typed async client for the Midtrans payment APIs.
//!
//! ```no_run
//! use midtrans::{ClientOptions, MidtransClient};
//!
//! # async fn run() -> midtrans::Result<()> {
//! let client = MidtransClient::new(ClientOptions {
//!     sandbox: Some(true),
//!     server_key: Some("SB-Mid-server-xxx".into()),
//!     client_key: Some("SB-Mid-client-xxx".into()),
//!     ..Default::default()
//! })?;
//!
//! let status = client.core().status("order-id-123").await?;
//! println!("{:?}", status.transaction_status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod http;
pub mod iris;
pub mod snap;

pub use client::MidtransClient;
pub use config::{ClientOptions, Target};
pub use error::{Error, ProviderError, Result};
