//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`BoundaryChunker`], a
//! splitter that emits fixed-size windows with an exact character overlap
//! while preferring to cut at structural boundaries (paragraph, then
//! sentence, then whitespace) over hard mid-word cuts.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the knowledge index.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into windows of at most `chunk_size` characters with an
/// exact `overlap`-character overlap between consecutive chunks.
///
/// The end of each window is pulled back to the best structural boundary
/// available inside it — a paragraph break first, then a sentence end,
/// then any whitespace — and only falls back to a hard character cut when
/// the window contains no boundary at all. Because the next window always
/// starts exactly `overlap` characters before the previous end, the
/// overlap invariant holds on the emitted text regardless of which
/// boundary was chosen. The final chunk may be shorter.
///
/// All offsets are computed in character space, so multi-byte text is
/// never split inside a scalar value.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata plus a `chunk_index` field.
///
/// # Example
///
/// ```rust,ignore
/// use ayur_rag::BoundaryChunker;
///
/// let chunker = BoundaryChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

/// Boundary classes tried in order of preference. Each entry is a set of
/// separators; a window end is acceptable when the text up to it ends
/// with one of the separators.
const BOUNDARY_LEVELS: [&[&str]; 2] = [&["\n\n"], &[". ", "! ", "? ", "\n"]];

impl BoundaryChunker {
    /// Create a new `BoundaryChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — exact number of overlapping characters between
    ///   consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] unless both parameters are positive
    /// and `chunk_overlap < chunk_size`. Raised before any I/O.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap == 0 {
            return Err(RagError::Config(
                "chunk_size and chunk_overlap must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

/// Find the best window end in `[min_end, max_end]` (character indices).
///
/// Scans each boundary class from the right so the window stays as full
/// as possible, then falls back to cutting after any whitespace char.
/// Returns `None` when the range contains no boundary of any class.
fn find_boundary(
    text: &str,
    offsets: &[usize],
    min_end: usize,
    max_end: usize,
) -> Option<usize> {
    for separators in BOUNDARY_LEVELS {
        for end in (min_end..=max_end).rev() {
            let prefix = &text[..offsets[end]];
            if separators.iter().any(|sep| prefix.ends_with(sep)) {
                return Some(end);
            }
        }
    }
    for end in (min_end..=max_end).rev() {
        let last_char = text[offsets[end - 1]..offsets[end]].chars().next();
        if last_char.is_some_and(char::is_whitespace) {
            return Some(end);
        }
    }
    None
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let text = &document.text;
        // Byte offset of every char boundary, with a sentinel at the end,
        // so char-index windows can be sliced without re-scanning.
        let offsets: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let total_chars = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut chunk_index = 0usize;

        loop {
            let hard_end = (start + self.chunk_size).min(total_chars);
            let end = if hard_end == total_chars {
                total_chars
            } else {
                // The window must end strictly after start + overlap or the
                // next window would not advance.
                let min_end = start + self.chunk_overlap + 1;
                find_boundary(text, &offsets, min_end, hard_end).unwrap_or(hard_end)
            };

            let mut metadata = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), chunk_index.to_string());

            chunks.push(Chunk {
                id: format!("{}_{chunk_index}", document.id),
                text: text[offsets[start]..offsets[end]].to_string(),
                embedding: Vec::new(),
                metadata,
                document_id: document.id.clone(),
            });

            if end == total_chars {
                break;
            }
            start = end - self.chunk_overlap;
            chunk_index += 1;
        }

        chunks
    }
}
