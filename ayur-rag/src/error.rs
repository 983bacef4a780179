//! Error types for the `ayur-rag` crate.

use thiserror::Error;

/// Errors that can occur in knowledge-base operations.
#[derive(Debug, Clone, Error)]
pub enum RagError {
    /// Invalid chunking or index parameters. Raised before any I/O.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding function changed between ingestion and query.
    ///
    /// A vector whose dimensionality does not match the collection's was
    /// passed to `upsert` or `search`.
    #[error("embedding dimension mismatch: collection expects {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality the collection was created with.
        expected: usize,
        /// The dimensionality of the offending vector.
        actual: usize,
    },

    /// A document could not be loaded from disk.
    #[error("Document load error ({path}): {message}")]
    DocumentLoad {
        /// Path of the file that failed to load.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for knowledge-base operations.
pub type Result<T> = std::result::Result<T, RagError>;
