//! Shared, lazily-initialised embedding model handle.
//!
//! One `EmbeddingService` is created per process and passed by `Arc` to the
//! rubric loader and the scoring engine. The Candle model is loaded on first
//! use, exactly once, even if several callers race on that first use.

use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::{info, warn};

use crate::provider::Embedder;
use crate::{EmbeddingConfig, Result, SentenceEmbedder};

pub struct EmbeddingService {
    config: EmbeddingConfig,
    model: OnceLock<SentenceEmbedder>,
    init_lock: Mutex<()>,
}

impl EmbeddingService {
    /// Create the handle without loading anything.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            config,
            model: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Get the model, loading it if this is the first use.
    ///
    /// A failed load is returned to the caller and attempted again on the
    /// next call.
    pub fn model(&self) -> Result<&SentenceEmbedder> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let loaded = SentenceEmbedder::load(self.config.clone()).inspect_err(|e| {
            warn!(model = %self.config.model_id, "Embedding model failed to load: {}", e);
        })?;
        info!(model = loaded.model_name(), gpu = loaded.is_gpu(), "Embedding model ready");
        Ok(self.model.get_or_init(|| loaded))
    }

    /// The model, only if an earlier call already loaded it.
    pub fn loaded(&self) -> Option<&SentenceEmbedder> {
        self.model.get()
    }

    /// Whether the model has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

impl Embedder for EmbeddingService {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.model()?.embed_texts(texts)
    }
}
