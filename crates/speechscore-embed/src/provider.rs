//! Trait for embedding backends.
//!
//! The rubric loader and the scoring engine only depend on this trait, so the
//! Candle model can be swapped for a deterministic mock in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{EmbedError, Result};

/// Maps text to fixed-length vectors.
///
/// Implementations must return vectors of one fixed dimension and the same
/// vector for the same text, otherwise embeddings computed at rubric load
/// time are not comparable with transcript embeddings.
pub trait Embedder: Send + Sync {
    /// Embed many texts at once. Output order matches input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::InvalidInput("No embedding produced".to_string()))
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Deterministic bag-of-words embedder.
///
/// Each lower-cased alphanumeric token is hashed into one of `dim` buckets,
/// so texts sharing words get a positive cosine similarity and the empty
/// string maps to the zero vector. Fixed vectors can be pinned per text with
/// [`MockEmbedder::with`].
pub struct MockEmbedder {
    dim: usize,
    pinned: HashMap<String, Vec<f32>>,
    batch_calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim: dim.max(1),
            pinned: HashMap::new(),
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// Return `vector` whenever exactly `text` is embedded.
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.to_string(), vector);
        self
    }

    /// Number of `embed_batch` calls served so far.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    fn hash_vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            v[fnv1a(token) as usize % self.dim] += 1.0;
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Embedder for MockEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| self.pinned.get(t).cloned().unwrap_or_else(|| self.hash_vector(t)))
            .collect())
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
