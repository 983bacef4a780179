//! Scripted chat backend for tests and examples.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::ChatBackend;
use crate::error::ModelError;
use crate::message::{ConversationMessage, GenerationParams};

/// A [`ChatBackend`] that replays scripted outcomes and records which
/// models were called, in order.
///
/// Once the scripted outcomes are exhausted, every further call fails
/// with the configured repeat error (a transient 503 by default).
pub struct MockChatBackend {
    outcomes: Mutex<VecDeque<Result<String, ModelError>>>,
    repeat_error: ModelError,
    calls: Mutex<Vec<String>>,
}

impl MockChatBackend {
    /// A backend that yields the given outcomes in order.
    pub fn with_outcomes(
        outcomes: impl IntoIterator<Item = Result<String, ModelError>>,
    ) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            repeat_error: ModelError::Api { status: 503, message: "mock exhausted".into() },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that answers successfully with the given texts in order.
    pub fn with_responses<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self::with_outcomes(responses.into_iter().map(|s| Ok(s.into())))
    }

    /// A backend where every call fails with a clone of `error`.
    pub fn always_failing(error: ModelError) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            repeat_error: error,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Model names of every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(
        &self,
        model: &str,
        _messages: &[ConversationMessage],
        _params: GenerationParams,
    ) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push(model.to_string());
        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Err(self.repeat_error.clone()),
        }
    }
}
