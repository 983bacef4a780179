//! Data types for source documents, chunks, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A source document produced by a loader.
///
/// Immutable once created. For paged formats (PDF) each page becomes its
/// own `Document` with a `page` metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier, derived from the source file (and page, if any).
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata: at minimum the `source` file name.
    pub metadata: HashMap<String, String>,
}

/// A bounded text segment derived from exactly one [`Document`].
///
/// Produced without an embedding; the knowledge index attaches the vector
/// at ingestion time. Never mutated after insertion into a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, stable within an ingestion run
    /// (`{document_id}_{chunk_index}`).
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the parent document plus `chunk_index`.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A stored [`Chunk`] paired with its similarity to a query vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}
