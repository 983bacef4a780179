//! The chat-completion capability the gateway is built over.

use async_trait::async_trait;

use crate::error::ModelError;
use crate::message::{ConversationMessage, GenerationParams};

/// "Send a message list plus parameters, receive generated text or a
/// classified failure."
///
/// [`InferenceClient`](crate::client::InferenceClient) implements this
/// over HTTP; [`MockChatBackend`](crate::mock::MockChatBackend) scripts
/// outcomes for tests. The gateway's fallback logic lives entirely above
/// this trait.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one chat completion against `model`.
    async fn complete(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        params: GenerationParams,
    ) -> Result<String, ModelError>;
}
