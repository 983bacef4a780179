//! The knowledge index: one embedding provider + one vector store +
//! one named collection.
//!
//! [`KnowledgeIndex`] guarantees that the embedding function used for
//! queries is the one used at ingestion, because both paths go through
//! the same provider instance. Ingestion is batched: each batch is
//! embedded and committed independently, so a failure partway through
//! leaves previously committed batches intact — at-least-once,
//! non-atomic ingestion.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::RagConfig;
use crate::document::{Chunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// A queryable knowledge collection bound to a fixed embedding function.
pub struct KnowledgeIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    collection: String,
    batch_size: usize,
    default_top_k: usize,
}

impl KnowledgeIndex {
    /// Open the index, creating its collection if needed.
    ///
    /// Idempotent: opening an existing collection is a no-op provided the
    /// embedder's dimensionality matches the one the collection was
    /// created with.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`](crate::RagError) on invalid
    /// configuration and [`RagError::DimensionMismatch`](crate::RagError)
    /// if the collection exists with a different dimensionality.
    pub async fn open(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        config: &RagConfig,
    ) -> Result<Self> {
        config.validate()?;
        store.create_collection(&config.collection, embedder.dimensions()).await?;
        Ok(Self {
            embedder,
            store,
            collection: config.collection.clone(),
            batch_size: config.batch_size,
            default_top_k: config.top_k,
        })
    }

    /// Name of the backing collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Embed and store chunks, committing one bounded batch at a time.
    ///
    /// Returns the number of chunks stored. If a batch fails, the error
    /// propagates and the chunks of earlier batches stay committed.
    pub async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            let embedded: Vec<Chunk> = batch
                .iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| Chunk { embedding, ..chunk.clone() })
                .collect();

            self.store.upsert(&self.collection, &embedded).await?;
            debug!(batch_size = embedded.len(), "committed ingestion batch");
        }
        Ok(chunks.len())
    }

    /// Embed `text` with the ingestion embedder and return the `k` most
    /// similar stored chunks, ordered by descending similarity.
    ///
    /// `k` is capped by the number of stored entries; an empty index
    /// yields an empty result, never an error.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if self.store.count(&self.collection).await? == 0 {
            info!(collection = %self.collection, "query against empty index");
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(text).await?;
        self.store.search(&self.collection, &embedding, k).await
    }

    /// [`query`](Self::query) with the configured default `top_k`.
    pub async fn query_default(&self, text: &str) -> Result<Vec<SearchResult>> {
        self.query(text, self.default_top_k).await
    }

    /// Number of stored entries.
    pub async fn len(&self) -> Result<usize> {
        self.store.count(&self.collection).await
    }

    /// Whether the index holds no entries.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::RagError;
    use crate::hashing::HashEmbeddingProvider;
    use crate::inmemory::InMemoryVectorStore;

    fn chunk(id: &str, text: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            text: text.to_string(),
            embedding: Vec::new(),
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        }
    }

    fn config(batch_size: usize) -> RagConfig {
        RagConfig::builder().batch_size(batch_size).collection("kb").build().unwrap()
    }

    async fn open_index(batch_size: usize) -> (KnowledgeIndex, Arc<InMemoryVectorStore>) {
        let store = Arc::new(InMemoryVectorStore::new());
        let index = KnowledgeIndex::open(
            Arc::new(HashEmbeddingProvider::with_dimensions(64)),
            store.clone(),
            &config(batch_size),
        )
        .await
        .unwrap();
        (index, store)
    }

    #[tokio::test]
    async fn add_then_query_round_trip() {
        let (index, _) = open_index(100).await;
        index
            .add(&[
                chunk("a", "daily routine and sleep hygiene"),
                chunk("b", "seasonal diet for kapha"),
            ])
            .await
            .unwrap();

        assert_eq!(index.len().await.unwrap(), 2);
        let results = index.query("sleep routine", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "a");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn empty_index_queries_to_empty() {
        let (index, _) = open_index(100).await;
        assert!(index.is_empty().await.unwrap());
        assert!(index.query("anything", 4).await.unwrap().is_empty());
    }

    /// A store that starts failing upserts after a set number of calls.
    struct FlakyStore {
        inner: InMemoryVectorStore,
        upserts: AtomicUsize,
        fail_from: usize,
    }

    #[async_trait]
    impl VectorStore for FlakyStore {
        async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
            self.inner.create_collection(name, dimensions).await
        }
        async fn delete_collection(&self, name: &str) -> Result<()> {
            self.inner.delete_collection(name).await
        }
        async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
            let call = self.upserts.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_from {
                return Err(RagError::VectorStore {
                    backend: "flaky".to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.inner.upsert(collection, chunks).await
        }
        async fn search(
            &self,
            collection: &str,
            embedding: &[f32],
            top_k: usize,
        ) -> Result<Vec<SearchResult>> {
            self.inner.search(collection, embedding, top_k).await
        }
        async fn count(&self, collection: &str) -> Result<usize> {
            self.inner.count(collection).await
        }
    }

    #[tokio::test]
    async fn failed_batch_leaves_committed_batches_intact() {
        let store = Arc::new(FlakyStore {
            inner: InMemoryVectorStore::new(),
            upserts: AtomicUsize::new(0),
            fail_from: 2,
        });
        let index = KnowledgeIndex::open(
            Arc::new(HashEmbeddingProvider::with_dimensions(16)),
            store.clone(),
            &config(2),
        )
        .await
        .unwrap();

        let chunks: Vec<Chunk> =
            (0..6).map(|i| chunk(&format!("c{i}"), &format!("chunk number {i}"))).collect();

        let err = index.add(&chunks).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStore { .. }));
        // Two batches of two committed before the third failed.
        assert_eq!(index.len().await.unwrap(), 4);
    }
}
