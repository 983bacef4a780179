//! Durable vector store persisting each collection to a JSON file.
//!
//! [`FileVectorStore`] keeps the same in-memory shape as
//! [`InMemoryVectorStore`](crate::inmemory::InMemoryVectorStore) but
//! hydrates it from a data directory at open time and flushes a
//! collection back to its file on every mutation. A collection therefore
//! survives process restarts, and re-running ingestion against it appends
//! (upserts by chunk ID) rather than replacing. A rebuild is an explicit
//! [`delete_collection`](crate::VectorStore::delete_collection) followed
//! by fresh ingestion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::inmemory::Collection;
use crate::vectorstore::VectorStore;

/// On-disk form of one collection.
#[derive(Serialize, Deserialize)]
struct PersistedCollection {
    dimensions: usize,
    chunks: Vec<Chunk>,
}

/// A [`VectorStore`] persisting each collection as `{root}/{name}.json`.
pub struct FileVectorStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, Collection>>,
}

fn io_error(message: impl std::fmt::Display) -> RagError {
    RagError::VectorStore { backend: "file".to_string(), message: message.to_string() }
}

fn missing_collection(name: &str) -> RagError {
    RagError::VectorStore {
        backend: "file".to_string(),
        message: format!("collection '{name}' does not exist"),
    }
}

impl FileVectorStore {
    /// Open (or create) a store rooted at `root`, loading every persisted
    /// collection found there.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStore`] if the directory cannot be
    /// created or an existing collection file cannot be read or parsed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(io_error)?;

        let mut collections = HashMap::new();
        let mut entries = tokio::fs::read_dir(&root).await.map_err(io_error)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let collection = load_collection(&path).await?;
            debug!(collection = name, entries = collection.chunks.len(), "loaded collection");
            collections.insert(name.to_string(), collection);
        }

        info!(root = %root.display(), collections = collections.len(), "opened file vector store");
        Ok(Self { root, collections: RwLock::new(collections) })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    async fn flush(&self, name: &str, collection: &Collection) -> Result<()> {
        let persisted = PersistedCollection {
            dimensions: collection.dimensions,
            chunks: collection.chunks.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec(&persisted).map_err(io_error)?;
        tokio::fs::write(self.collection_path(name), bytes).await.map_err(io_error)
    }
}

async fn load_collection(path: &Path) -> Result<Collection> {
    let bytes = tokio::fs::read(path).await.map_err(io_error)?;
    let persisted: PersistedCollection = serde_json::from_slice(&bytes)
        .map_err(|e| io_error(format!("corrupt collection file {}: {e}", path.display())))?;
    let chunks = persisted.chunks.into_iter().map(|c| (c.id.clone(), c)).collect();
    Ok(Collection { dimensions: persisted.dimensions, chunks })
}

#[async_trait]
impl VectorStore for FileVectorStore {
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
                let collection = Collection { dimensions, chunks: HashMap::new() };
                self.flush(name, &collection).await?;
                collections.insert(name.to_string(), collection);
                Ok(())
            }
        }
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        match tokio::fs::remove_file(self.collection_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for chunk in chunks {
            store.check_dimensions(&chunk.embedding)?;
            store.chunks.insert(chunk.id.clone(), chunk.clone());
        }
        // Flush under the write lock so concurrent upserts cannot write
        // stale snapshots over each other.
        self.flush(collection, store).await
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
    async fn collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileVectorStore::open(dir.path()).await.unwrap();
            store.create_collection("kb", 2).await.unwrap();
            store
                .upsert("kb", &[chunk("a", vec![1.0, 0.0]), chunk("b", vec![0.0, 1.0])])
                .await
                .unwrap();
        }

        let reopened = FileVectorStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.count("kb").await.unwrap(), 2);

        let results = reopened.search("kb", &[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, "a");

        // Dimensionality is persisted too.
        let err = reopened.search("kb", &[1.0, 0.0, 0.0], 1).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[tokio::test]
    async fn reingestion_appends_rather_than_replacing() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileVectorStore::open(dir.path()).await.unwrap();
            store.create_collection("kb", 2).await.unwrap();
            store.upsert("kb", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();
        }

        let reopened = FileVectorStore::open(dir.path()).await.unwrap();
        reopened.create_collection("kb", 2).await.unwrap();
        reopened.upsert("kb", &[chunk("c", vec![0.5, 0.5])]).await.unwrap();
        assert_eq!(reopened.count("kb").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_collection_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileVectorStore::open(dir.path()).await.unwrap();
            store.create_collection("kb", 2).await.unwrap();
            store.delete_collection("kb").await.unwrap();
            // Deleting a collection that never existed is fine.
            store.delete_collection("other").await.unwrap();
        }

        let reopened = FileVectorStore::open(dir.path()).await.unwrap();
        assert!(reopened.count("kb").await.is_err());
    }
}
