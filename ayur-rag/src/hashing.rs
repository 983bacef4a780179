//! Deterministic local embedding provider.
//!
//! [`HashEmbeddingProvider`] embeds text without any model download or
//! network call by feature-hashing word tokens into a fixed number of
//! buckets. Texts that share vocabulary land in overlapping buckets and
//! therefore score closer under cosine similarity, which is enough for
//! offline operation and for tests. It is not a substitute for a learned
//! embedding model.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Default dimensionality, matching the small sentence-embedding models
/// this provider stands in for.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// A deterministic [`EmbeddingProvider`] based on token feature hashing.
///
/// Each lowercased alphanumeric token is hashed twice: once to pick a
/// bucket, once to pick a sign. The resulting vector is L2-normalised so
/// cosine similarity reduces to a dot product. Same text in, same vector
/// out, on every platform.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self { dimensions: DEFAULT_DIMENSIONS }
    }
}

impl HashEmbeddingProvider {
    /// Create a provider with the default dimensionality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with a custom dimensionality.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

/// FNV-1a over the token bytes. Stable across platforms and releases,
/// unlike `DefaultHasher`.
fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn embed_tokens(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions];

    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        let hash = fnv1a(&token);
        let bucket = (hash % dimensions as u64) as usize;
        let sign = if hash & (1u64 << 63) == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(embed_tokens(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
