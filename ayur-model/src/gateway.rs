//! The model gateway: remote call → fallback model → local template →
//! apology.
//!
//! The gateway exists so that upstream failure never reaches an
//! interactive flow as an exception. `generate` always returns text; the
//! tiers below degrade explicitly and observably (each transition is a
//! `tracing` event):
//!
//! 1. the requested model on the remote endpoint,
//! 2. on a non-auth failure with a non-default model, one retry with the
//!    default model (one level, no cascading),
//! 3. on an auth failure at any point, the local template table
//!    ([`degraded`](crate::degraded)) — the endpoint is not called again
//!    within the invocation,
//! 4. otherwise a fixed apologetic string.

use std::sync::Arc;

use tracing::{error, warn};

use crate::backend::ChatBackend;
use crate::degraded;
use crate::message::{ConversationMessage, GenerationParams};

/// The designated fallback model, and the model for routine requests.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The higher-capability model used for full plan generation.
pub const PLAN_MODEL: &str = "deepseek-r1";

/// Terminal soft-failure text. User-visible, never an exception.
pub const APOLOGY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

/// Fallback-chaining front over a [`ChatBackend`].
pub struct ModelGateway {
    backend: Arc<dyn ChatBackend>,
    default_model: String,
}

impl ModelGateway {
    /// Create a gateway over `backend` with [`DEFAULT_MODEL`] as the
    /// fallback model.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_default_model(backend, DEFAULT_MODEL)
    }

    /// Create a gateway with a custom fallback model.
    pub fn with_default_model(backend: Arc<dyn ChatBackend>, default_model: impl Into<String>) -> Self {
        Self { backend, default_model: default_model.into() }
    }

    /// The model used for fallback retries.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Run one generation through the degradation tiers. Always yields
    /// text.
    pub async fn generate(
        &self,
        messages: &[ConversationMessage],
        model: &str,
        params: GenerationParams,
    ) -> String {
        match self.backend.complete(model, messages, params).await {
            Ok(text) => text,
            Err(err) if err.is_auth() => {
                warn!(model, error = %err, "authentication failed, switching to degraded mode");
                degraded::respond(messages)
            }
            Err(err) if model != self.default_model => {
                warn!(
                    model,
                    fallback = %self.default_model,
                    error = %err,
                    "model call failed, retrying with default model"
                );
                match self.backend.complete(&self.default_model, messages, params).await {
                    Ok(text) => text,
                    Err(retry_err) if retry_err.is_auth() => {
                        warn!(error = %retry_err, "fallback hit auth failure, degrading locally");
                        degraded::respond(messages)
                    }
                    Err(retry_err) => {
                        error!(error = %retry_err, "fallback model also failed");
                        APOLOGY.to_string()
                    }
                }
            }
            Err(err) => {
                error!(model, error = %err, "default model failed");
                APOLOGY.to_string()
            }
        }
    }
}
