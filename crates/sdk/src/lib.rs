//! Client SDK for the Strata Cloud services API.
//!
//! [`StrataClient`] covers the platform's REST surface (service inventory and
//! compliance operations) plus the GraphQL endpoint. Responses come back as
//! raw bytes so callers decide how to decode them; most endpoints return
//! JSON.
//!
//! # Quick start
//!
//! ```no_run
//! use strata_sdk::StrataClient;
//!
//! # async fn run() -> strata_sdk::Result<()> {
//! let client = StrataClient::new("https://api.strata.example", "s3cr3t")?;
//! let instances = client.list_service_instances().await?;
//! println!("{}", String::from_utf8_lossy(&instances));
//! # Ok(())
//! # }
//! ```
//!
//! Every request carries `Authorization: Token <token>` and
//! `Content-Type: application/json`. Server rejections (status >= 400) become
//! [`StrataError::Api`] with the response body preserved verbatim; anything
//! that prevented a response becomes [`StrataError::Transport`].

pub mod client;
pub mod error;

pub use client::{StrataClient, StrataClientBuilder, DEFAULT_FRAMEWORK, DEFAULT_TIMEOUT};
pub use error::{Result, StrataError};
