//! Error types for plan orchestration.

use thiserror::Error;

/// Errors crossing from the plan layer to the caller.
///
/// Model-invocation failures never appear here — the gateway converts
/// them to text below this layer. What remains is configuration and
/// retrieval trouble, the "no knowledge base" terminal state, and
/// structured output that would not parse.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Generated structured text failed to parse as the expected schema.
    /// Carries the raw text so the caller can surface it for inspection
    /// instead of silently discarding it.
    #[error("model response did not parse as a structured profile")]
    ProfileParse {
        /// The raw generated text that failed to parse.
        raw: String,
    },

    /// No knowledge base documents were found at startup, so retrieval
    /// (and therefore plan generation) is unavailable.
    #[error("knowledge base is empty; add documents to the source directory and rebuild")]
    NoKnowledgeBase,

    /// A retrieval-layer failure (configuration, store, embedding).
    #[error(transparent)]
    Rag(#[from] ayur_rag::RagError),
}

/// A convenience result type for plan operations.
pub type Result<T> = std::result::Result<T, PlanError>;
