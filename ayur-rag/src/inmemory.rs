//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. Nothing survives the process; use
//! [`FileVectorStore`](crate::filestore::FileVectorStore) for a durable
//! collection.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, cosine_similarity};

/// A collection of chunks keyed by chunk ID, with its fixed dimensionality.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collection {
    pub(crate) dimensions: usize,
    pub(crate) chunks: HashMap<String, Chunk>,
}

impl Collection {
    pub(crate) fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        self.check_dimensions(embedding)?;

        let mut scored: Vec<SearchResult> = self
            .chunks
            .values()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// An in-memory [`VectorStore`] using cosine similarity for search.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing_collection(name: &str) -> RagError {
    RagError::VectorStore {
        backend: "in-memory".to_string(),
        message: format!("collection '{name}' does not exist"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        match collections.get(name) {
            Some(existing) if existing.dimensions != dimensions => {
                Err(RagError::DimensionMismatch {
                    expected: existing.dimensions,
                    actual: dimensions,
                })
            }
            Some(_) => Ok(()),
            None => {
                collections
                    .insert(name.to_string(), Collection { dimensions, chunks: HashMap::new() });
                Ok(())
            }
        }
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for chunk in chunks {
            store.check_dimensions(&chunk.embedding)?;
            store.chunks.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        store.search(embedding, top_k)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(store.chunks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: id.to_string(),
            text: format!("text for {id}"),
            embedding,
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        }
    }

    #[tokio::test]
    async fn search_orders_by_descending_similarity() {
        let store = InMemoryVectorStore::new();
        store.create_collection("kb", 2).await.unwrap();
        store
            .upsert(
                "kb",
                &[
                    chunk("a", vec![1.0, 0.0]),
                    chunk("b", vec![0.0, 1.0]),
                    chunk("c", vec![0.7, 0.7]),
                ],
            )
            .await
            .unwrap();

        let results = store.search("kb", &[1.0, 0.0], 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[1].chunk.id, "c");
        assert_eq!(results[2].chunk.id, "b");
    }

    #[tokio::test]
    async fn search_caps_at_top_k_and_entry_count() {
        let store = InMemoryVectorStore::new();
        store.create_collection("kb", 2).await.unwrap();
        store.upsert("kb", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();

        assert_eq!(store.search("kb", &[1.0, 0.0], 5).await.unwrap().len(), 1);
        assert!(store.search("kb", &[1.0, 0.0], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_collection_searches_to_empty() {
        let store = InMemoryVectorStore::new();
        store.create_collection("kb", 4).await.unwrap();
        assert!(store.search("kb", &[0.0; 4], 3).await.unwrap().is_empty());
        assert_eq!(store.count("kb").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let store = InMemoryVectorStore::new();
        store.create_collection("kb", 3).await.unwrap();

        let err = store.upsert("kb", &[chunk("a", vec![1.0, 0.0])]).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));

        let err = store.search("kb", &[1.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));

        let err = store.create_collection("kb", 5).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 5 }));
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = InMemoryVectorStore::new();
        store.create_collection("kb", 2).await.unwrap();
        store.upsert("kb", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert("kb", &[chunk("a", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(store.count("kb").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_collection_is_an_error() {
        let store = InMemoryVectorStore::new();
        assert!(store.search("nope", &[1.0], 1).await.is_err());
        assert!(store.upsert("nope", &[]).await.is_err());
        assert!(store.count("nope").await.is_err());
    }
}
