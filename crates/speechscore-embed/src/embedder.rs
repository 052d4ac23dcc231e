//! Sentence embedder using Candle.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::sync::{Api, ApiBuilder};
use hf_hub::{Repo, RepoType};
use lru::LruCache;
use tokenizers::Tokenizer;
use tracing::{debug, info, instrument};

use crate::pooling::l2_normalize;
use crate::provider::Embedder;
use crate::{EmbedError, EmbeddingConfig, Result};

/// BERT-family sentence embedder (all-MiniLM-L6-v2 by default).
///
/// Loads the model from Hugging Face Hub and runs batched inference on the
/// selected device. Repeated texts are served from an LRU cache.
pub struct SentenceEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    config: EmbeddingConfig,
    dimension: usize,
    cache: Option<Mutex<LruCache<String, Vec<f32>>>>,
}

impl SentenceEmbedder {
    /// Download (or reuse the hub cache) and load the model.
    ///
    /// This blocks on network and disk; async callers should run it on a
    /// blocking thread.
    pub fn load(config: EmbeddingConfig) -> Result<Self> {
        let start = Instant::now();
        info!(model = %config.model_id, "Loading sentence embedding model");

        let device = Self::select_device(&config);
        debug!("Using device: {:?}", device);

        let api = match &config.cache_dir {
            Some(dir) => ApiBuilder::new().with_cache_dir(PathBuf::from(dir)).build()?,
            None => Api::new()?,
        };
        let repo = api.repo(Repo::new(config.model_id.clone(), RepoType::Model));

        let config_path = repo.get("config.json")
            .map_err(|e| EmbedError::Download(format!("config.json: {}", e)))?;
        let bert_config = Self::load_config(&config_path)?;

        let tokenizer_path = repo.get("tokenizer.json")
            .map_err(|e| EmbedError::Download(format!("tokenizer.json: {}", e)))?;
        let tokenizer = Tokenizer::from_file(&tokenizer_path)?;

        let weights_path = repo.get("model.safetensors")
            .or_else(|_| repo.get("pytorch_model.bin"))
            .map_err(|e| EmbedError::Download(format!("model weights: {}", e)))?;
        debug!("Weights at: {:?}", weights_path);

        let vb = if weights_path.extension().map(|e| e == "safetensors").unwrap_or(false) {
            // SAFETY: the hub cache file is not modified while mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, &device)?
        };

        let model = BertModel::load(vb, &bert_config)
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;
        info!(
            dimension = bert_config.hidden_size,
            "Model loaded in {:.2}s",
            start.elapsed().as_secs_f32()
        );

        let cache = NonZeroUsize::new(config.cache_size).map(|n| Mutex::new(LruCache::new(n)));

        Ok(Self {
            model,
            tokenizer,
            device,
            dimension: bert_config.hidden_size,
            config,
            cache,
        })
    }

    fn select_device(config: &EmbeddingConfig) -> Device {
        if !config.use_gpu {
            return Device::Cpu;
        }

        #[cfg(feature = "cuda")]
        {
            match Device::new_cuda(0) {
                Ok(device) => return device,
                Err(e) => debug!("CUDA not available: {}, falling back to CPU", e),
            }
        }

        #[cfg(feature = "metal")]
        {
            match Device::new_metal(0) {
                Ok(device) => return device,
                Err(e) => debug!("Metal not available: {}, falling back to CPU", e),
            }
        }

        Device::Cpu
    }

    fn load_config(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Embed texts, serving cached entries and batching the rest.
    #[instrument(skip(self, texts), fields(n = texts.len()))]
    pub fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let mut out: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut pending: Vec<usize> = Vec::new();

        match &self.cache {
            Some(cache) => {
                let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
                for (i, text) in texts.iter().enumerate() {
                    match guard.get(text) {
                        Some(hit) => out[i] = Some(hit.clone()),
                        None => pending.push(i),
                    }
                }
            }
            None => pending.extend(0..texts.len()),
        }

        for chunk in pending.chunks(self.config.batch_size.max(1)) {
            let batch: Vec<&str> = chunk.iter().map(|&i| texts[i].as_str()).collect();
            let vectors = self.forward_batch(&batch)?;

            if let Some(cache) = &self.cache {
                let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
                for (&i, v) in chunk.iter().zip(&vectors) {
                    guard.put(texts[i].clone(), v.clone());
                }
            }
            for (&i, v) in chunk.iter().zip(vectors) {
                out[i] = Some(v);
            }
        }

        debug!(
            cached = texts.len() - pending.len(),
            "Embedded {} texts in {:.2}ms",
            texts.len(),
            start.elapsed().as_secs_f32() * 1000.0
        );

        out.into_iter()
            .map(|v| v.ok_or_else(|| EmbedError::Inference("missing embedding in batch output".to_string())))
            .collect()
    }

    /// Run one forward pass over a batch.
    fn forward_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let encodings = self.tokenizer.encode_batch(texts.to_vec(), true)?;

        let max_tokens = self.config.max_length.min(512).max(1);
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len().min(max_tokens))
            .max()
            .unwrap_or(0)
            .max(1);

        let batch = encodings.len();
        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        let mut type_ids = Vec::with_capacity(batch * seq_len);

        for encoding in &encodings {
            let len = encoding.get_ids().len().min(seq_len);
            ids.extend_from_slice(&encoding.get_ids()[..len]);
            mask.extend(encoding.get_attention_mask()[..len].iter().map(|&m| m as f32));
            type_ids.extend_from_slice(&encoding.get_type_ids()[..len]);

            let pad = seq_len - len;
            ids.extend(std::iter::repeat_n(0u32, pad));
            mask.extend(std::iter::repeat_n(0.0f32, pad));
            type_ids.extend(std::iter::repeat_n(0u32, pad));
        }

        let input_ids = Tensor::from_vec(ids, (batch, seq_len), &self.device)?;
        let token_type_ids = Tensor::from_vec(type_ids, (batch, seq_len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask, (batch, seq_len), &self.device)?;

        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = self.config.pooling.apply(&hidden, &attention_mask)?;
        let pooled = if self.config.normalize { l2_normalize(&pooled)? } else { pooled };

        Ok(pooled.to_vec2::<f32>()?)
    }

    /// Embedding dimension (hidden size of the loaded model).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_id
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self.device, Device::Cuda(_) | Device::Metal(_))
    }
}

impl Embedder for SentenceEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_texts(texts)
    }
}
