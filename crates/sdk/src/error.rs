//! Error types for the Strata API client.
//!
//! Every fallible SDK call resolves to one of exactly two cases: the request
//! never produced an HTTP response, or the server answered with a status of
//! 400 or above. Responses below 400 are never errors, whatever their body
//! contains.

use thiserror::Error;

/// Convenience alias for SDK results.
pub type Result<T> = std::result::Result<T, StrataError>;

/// Errors produced by [`StrataClient`](crate::StrataClient) operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// The request could not be completed at the transport level: connection
    /// refused, DNS failure, timeout, or an interrupted body read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request with status >= 400. Carries the
    /// response body verbatim, unparsed.
    #[error("Strata API error: {0}")]
    Api(String),
}
