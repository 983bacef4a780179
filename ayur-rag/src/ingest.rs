//! Ingestion pipeline: scan a source directory, load documents, chunk
//! them, and feed the knowledge index in batches.
//!
//! An empty source directory is a valid terminal state — `build` returns
//! `Ok(None)` ("no knowledge available") rather than an error, and
//! callers are expected to keep running without retrieval.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::chunking::{BoundaryChunker, Chunker};
use crate::config::RagConfig;
use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::KnowledgeIndex;
use crate::vectorstore::VectorStore;

/// One ordered piece of text produced by a loader, with its position in
/// the source file when the format has one (PDF pages).
#[derive(Debug, Clone)]
pub struct TextSegment {
    /// The extracted text.
    pub text: String,
    /// 1-based page number, for paged formats.
    pub page: Option<usize>,
}

/// Capability: given a file path, produce ordered text segments.
pub trait DocumentLoader: Send + Sync {
    /// Whether this loader handles the given path (by extension).
    fn supports(&self, path: &Path) -> bool;

    /// Load the file into ordered text segments.
    fn load(&self, path: &Path) -> Result<Vec<TextSegment>>;
}

fn load_error(path: &Path, message: impl std::fmt::Display) -> RagError {
    RagError::DocumentLoad { path: path.display().to_string(), message: message.to_string() }
}

/// Loads plain-text and markdown files as a single segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn supports(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some(ext) if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("md")
        )
    }

    fn load(&self, path: &Path) -> Result<Vec<TextSegment>> {
        let text = std::fs::read_to_string(path).map_err(|e| load_error(path, e))?;
        Ok(vec![TextSegment { text, page: None }])
    }
}

/// Loads PDF files via `pdf-extract`. Only available with the `pdf`
/// feature.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

#[cfg(feature = "pdf")]
impl DocumentLoader for PdfLoader {
    fn supports(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some(ext) if ext.eq_ignore_ascii_case("pdf")
        )
    }

    fn load(&self, path: &Path) -> Result<Vec<TextSegment>> {
        let text = pdf_extract::extract_text(path).map_err(|e| load_error(path, e))?;
        Ok(vec![TextSegment { text, page: None }])
    }
}

/// Drives loaders, the chunker, and the knowledge index to build a
/// queryable collection from a directory of documents.
pub struct Ingestor {
    config: RagConfig,
    chunker: BoundaryChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl Ingestor {
    /// Create an ingestor with the default loaders (text/markdown, plus
    /// PDF when the `pdf` feature is on).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] on invalid chunking parameters,
    /// before any I/O happens.
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        let chunker = BoundaryChunker::new(config.chunk_size, config.chunk_overlap)?;
        let mut loaders: Vec<Box<dyn DocumentLoader>> = Vec::new();
        loaders.push(Box::new(TextLoader));
        #[cfg(feature = "pdf")]
        loaders.push(Box::new(PdfLoader));
        Ok(Self { config, chunker, embedder, store, loaders })
    }

    /// Register an additional document loader.
    pub fn with_loader(mut self, loader: Box<dyn DocumentLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Build the knowledge index from every supported file in
    /// `source_dir`.
    ///
    /// Returns `Ok(None)` when the directory holds no supported
    /// documents — the "no knowledge available" signal, not an error.
    /// The directory is created if missing, mirroring first-run setups
    /// where operators drop documents in later.
    pub async fn build(&self, source_dir: &Path) -> Result<Option<KnowledgeIndex>> {
        tokio::fs::create_dir_all(source_dir).await.map_err(|e| load_error(source_dir, e))?;

        let files = self.scan(source_dir).await?;
        if files.is_empty() {
            warn!(dir = %source_dir.display(), "no supported documents found, knowledge base unavailable");
            return Ok(None);
        }

        let index =
            KnowledgeIndex::open(self.embedder.clone(), self.store.clone(), &self.config).await?;

        let mut documents = 0usize;
        let mut chunks = 0usize;
        for path in &files {
            let Some(loader) = self.loaders.iter().find(|l| l.supports(path)) else {
                continue;
            };
            for segment in loader.load(path)? {
                if segment.text.trim().is_empty() {
                    continue;
                }
                let document = segment_document(path, segment);
                chunks += index.add(&self.chunker.chunk(&document)).await?;
            }
            documents += 1;
        }

        info!(documents, chunks, collection = index.collection(), "knowledge base built");
        Ok(Some(index))
    }

    /// Drop the existing collection and build it again from scratch.
    ///
    /// This is the explicit rebuild path; a plain [`build`](Self::build)
    /// against an existing collection appends by chunk ID instead.
    pub async fn rebuild(&self, source_dir: &Path) -> Result<Option<KnowledgeIndex>> {
        self.store.delete_collection(&self.config.collection).await?;
        self.build(source_dir).await
    }

    /// Supported files in `dir`, sorted by name for a deterministic
    /// ingestion order (and therefore deterministic chunk IDs).
    async fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| load_error(dir, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| load_error(dir, e))? {
            let path = entry.path();
            if path.is_file() && self.loaders.iter().any(|l| l.supports(&path)) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Build the [`Document`] for one loaded segment.
fn segment_document(path: &Path, segment: TextSegment) -> Document {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or(stem);

    let mut metadata = HashMap::from([("source".to_string(), file_name.to_string())]);
    let id = match segment.page {
        Some(page) => {
            metadata.insert("page".to_string(), page.to_string());
            format!("{stem}_p{page}")
        }
        None => stem.to_string(),
    };

    Document { id, text: segment.text, metadata }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_loader_supports_txt_and_md_only() {
        let loader = TextLoader;
        assert!(loader.supports(Path::new("a.txt")));
        assert!(loader.supports(Path::new("b.MD")));
        assert!(!loader.supports(Path::new("c.pdf")));
        assert!(!loader.supports(Path::new("no_extension")));
    }

    #[test]
    fn segment_document_carries_source_and_page() {
        let doc = segment_document(
            Path::new("/kb/charaka.txt"),
            TextSegment { text: "body".into(), page: Some(3) },
        );
        assert_eq!(doc.id, "charaka_p3");
        assert_eq!(doc.metadata["source"], "charaka.txt");
        assert_eq!(doc.metadata["page"], "3");

        let doc = segment_document(
            Path::new("/kb/charaka.txt"),
            TextSegment { text: "body".into(), page: None },
        );
        assert_eq!(doc.id, "charaka");
        assert!(!doc.metadata.contains_key("page"));
    }
}
