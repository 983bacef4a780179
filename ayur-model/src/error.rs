//! Error types for model invocation.
//!
//! These errors are internal to the gateway: `ModelGateway::generate`
//! absorbs every variant and converts it into textual output, so callers
//! above the gateway never see them.

use thiserror::Error;

/// A failed model invocation, classified for the gateway's tiering.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The endpoint rejected our credentials (HTTP 401/403). Switches the
    /// gateway into local degraded mode.
    #[error("authentication rejected by model endpoint: {message}")]
    Auth {
        /// Detail from the endpoint, for logs.
        message: String,
    },

    /// The endpoint answered with a non-auth error status.
    #[error("model endpoint returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Detail from the endpoint.
        message: String,
    },

    /// The request never completed (connect, timeout, TLS...).
    #[error("transport error calling model endpoint: {0}")]
    Transport(String),

    /// The endpoint answered 2xx but the body was not the expected shape.
    #[error("could not decode model response: {0}")]
    Decode(String),
}

impl ModelError {
    /// Whether this failure should flip the gateway into degraded mode.
    pub fn is_auth(&self) -> bool {
        matches!(self, ModelError::Auth { .. })
    }
}
