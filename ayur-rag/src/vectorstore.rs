//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s. A collection
/// records its dimensionality at creation time and rejects vectors of any
/// other length with [`RagError::DimensionMismatch`](crate::RagError),
/// which is how a changed embedding function between ingestion and query
/// is surfaced.
///
/// Entries are created at ingestion time and never mutated; the only way
/// to remove them is a full collection rebuild via
/// [`delete_collection`](VectorStore::delete_collection). Concurrent
/// `search` calls are safe; `upsert` concurrent with `search` makes no
/// visibility guarantee.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection with the given dimensionality.
    ///
    /// Idempotent: a no-op if the collection already exists with the same
    /// dimensionality, an error if it exists with a different one.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Upsert chunks into a collection. Chunks must have embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending cosine similarity; at most
    /// `top_k` and at most the number of stored entries. An empty
    /// collection yields an empty `Vec`, not an error.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Number of entries stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
