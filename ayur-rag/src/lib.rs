//! # ayur-rag
//!
//! Knowledge-base retrieval for the AYUSH lifestyle coach: document
//! chunking, embeddings, vector search, and ingestion.
//!
//! ## Overview
//!
//! - [`chunking`] — [`BoundaryChunker`]: fixed-size windows with exact
//!   overlap, cut at structural boundaries
//! - [`embedding`] — the [`EmbeddingProvider`] trait;
//!   [`HashEmbeddingProvider`] (deterministic, offline) and
//!   [`RemoteEmbeddingProvider`] (OpenAI-compatible API, `remote` feature)
//! - [`vectorstore`] — the [`VectorStore`] trait;
//!   [`InMemoryVectorStore`] and the durable [`FileVectorStore`]
//! - [`index`] — [`KnowledgeIndex`]: embedder + store + collection, with
//!   batched ingestion and similarity query
//! - [`ingest`] — [`Ingestor`]: directory scan → load → chunk → index
//! - [`retriever`] — the [`Retriever`] capability the plan layer consumes
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ayur_rag::{FileVectorStore, HashEmbeddingProvider, Ingestor, RagConfig, Retriever};
//!
//! let store = Arc::new(FileVectorStore::open("./data").await?);
//! let embedder = Arc::new(HashEmbeddingProvider::new());
//! let ingestor = Ingestor::new(RagConfig::default(), embedder, store)?;
//!
//! match ingestor.build("./knowledge_base".as_ref()).await? {
//!     Some(index) => {
//!         let hits = index.retrieve("daily routine for high stress", 4).await?;
//!     }
//!     None => println!("no knowledge base documents found"),
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod filestore;
pub mod hashing;
pub mod index;
pub mod ingest;
pub mod inmemory;
#[cfg(feature = "remote")]
pub mod remote;
pub mod retriever;
pub mod vectorstore;

pub use chunking::{BoundaryChunker, Chunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use filestore::FileVectorStore;
pub use hashing::HashEmbeddingProvider;
pub use index::KnowledgeIndex;
pub use ingest::{DocumentLoader, Ingestor, TextLoader, TextSegment};
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "remote")]
pub use remote::RemoteEmbeddingProvider;
pub use retriever::{RetrievedContext, Retriever};
pub use vectorstore::VectorStore;

#[cfg(feature = "pdf")]
pub use ingest::PdfLoader;
