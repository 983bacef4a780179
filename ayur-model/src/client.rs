//! HTTP chat-completion client for OpenAI-compatible inference endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::backend::ChatBackend;
use crate::error::ModelError;
use crate::message::{ConversationMessage, GenerationParams};

/// The default inference endpoint (GitHub Models via Azure AI Inference).
pub const DEFAULT_ENDPOINT: &str = "https://models.inference.ai.azure.com";

/// A [`ChatBackend`] speaking the OpenAI-compatible `/chat/completions`
/// protocol. Any compatible host satisfies the contract; the endpoint is
/// configurable.
pub struct InferenceClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl InferenceClient {
    /// Create a client for the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Auth`] if the API key is empty — there is no
    /// point attempting remote calls that can only 401.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModelError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::Auth { message: "API key must not be empty".into() });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
        })
    }

    /// Override the endpoint base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

// ── wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Whether a failure status or message amounts to a credential rejection.
fn is_auth_failure(status: u16, detail: &str) -> bool {
    if status == 401 || status == 403 {
        return true;
    }
    let lower = detail.to_lowercase();
    lower.contains("authentication") || lower.contains("unauthorized")
}

#[async_trait]
impl ChatBackend for InferenceClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        params: GenerationParams,
    ) -> Result<String, ModelError> {
        debug!(model, message_count = messages.len(), "sending chat completion");

        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_output_tokens,
            top_p: 1.0,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model, error = %e, "chat completion request failed");
                ModelError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(model, status = status.as_u16(), "chat completion API error");

            if is_auth_failure(status.as_u16(), &detail) {
                return Err(ModelError::Auth { message: detail });
            }
            return Err(ModelError::Api { status: status.as_u16(), message: detail });
        }

        let chat: ChatResponse =
            response.json().await.map_err(|e| ModelError::Decode(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ModelError::Decode("response contained no choices".into()))
    }
}
