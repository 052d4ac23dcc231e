//! Configuration for the embedding service.

use serde::{Deserialize, Serialize};

/// Configuration for the sentence embedder.
///
/// Every field has a serde default so a partial `[embedding]` table in
/// `speechscore.toml` is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Hugging Face model ID
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Maximum sequence length in tokens (default: 256)
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Batch size for inference (default: 32)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// L2-normalize embeddings (default: true)
    #[serde(default = "default_true")]
    pub normalize: bool,

    /// Pooling strategy (default: mean)
    #[serde(default)]
    pub pooling: super::PoolingStrategy,

    /// Use GPU if available (default: false)
    #[serde(default)]
    pub use_gpu: bool,

    /// Cache directory for downloaded models
    #[serde(default)]
    pub cache_dir: Option<String>,

    /// Maximum number of cached embeddings, 0 disables the cache
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

fn default_model_id() -> String { "sentence-transformers/all-MiniLM-L6-v2".to_string() }
fn default_max_length() -> usize { 256 }
fn default_batch_size() -> usize { 32 }
fn default_true() -> bool { true }
fn default_cache_size() -> usize { 1024 }

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            max_length: default_max_length(),
            batch_size: default_batch_size(),
            normalize: true,
            pooling: super::PoolingStrategy::Mean,
            use_gpu: false,
            cache_dir: None,
            cache_size: default_cache_size(),
        }
    }
}

impl EmbeddingConfig {
    /// Create config for GPU inference.
    pub fn gpu() -> Self {
        Self {
            use_gpu: true,
            ..Default::default()
        }
    }

    /// Use a custom model.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Set batch size. Values below 1 are raised to 1.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the embedding cache capacity.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }
}
