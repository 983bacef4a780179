//! Conversation message and generation parameter types.

use serde::{Deserialize, Serialize};

/// The author of a [`ConversationMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the model's behavior.
    System,
    /// Content from the end user (or the orchestration layer on their behalf).
    User,
    /// Content produced by the model.
    Assistant,
}

/// One turn of a conversation. Never mutated after construction; an
/// ordered sequence of these forms a request to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who authored this message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl ConversationMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Generation parameters forwarded to the model endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.7, max_output_tokens: 1000 }
    }
}

impl GenerationParams {
    /// Convenience constructor.
    pub fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self { temperature, max_output_tokens }
    }
}
