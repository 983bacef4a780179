//! Semantic lookup capability behind which the plan layer sees the index.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::index::KnowledgeIndex;

/// A piece of retrieved context, ready to drop into a prompt.
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    /// The chunk text.
    pub text: String,
    /// Metadata carried from the source document.
    pub metadata: HashMap<String, String>,
    /// Similarity to the query (higher is more relevant).
    pub score: f32,
}

/// Semantic lookup by text: "give me the `k` most relevant passages".
///
/// Decouples callers from the concrete index type; anything that can rank
/// passages against a query can stand behind this trait.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `k` context passages ordered by descending relevance.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedContext>>;
}

#[async_trait]
impl Retriever for KnowledgeIndex {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedContext>> {
        let results = self.query(query, k).await?;
        Ok(results
            .into_iter()
            .map(|r| RetrievedContext {
                text: r.chunk.text,
                metadata: r.chunk.metadata,
                score: r.score,
            })
            .collect())
    }
}
