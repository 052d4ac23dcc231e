//! Speechscore Embedding Service
//!
//! Pure Rust sentence embeddings using Candle (Hugging Face), used to compare
//! transcripts against rubric criterion descriptions.
//!
//! # Features
//! - 384-dim embeddings from sentence-transformers/all-MiniLM-L6-v2 by default
//! - GPU support (CUDA, Metal) with automatic fallback to CPU
//! - Lazy, single-instance model loading behind [`EmbeddingService`]
//! - L2-normalized embeddings for cosine similarity
//!
//! # Example
//! ```no_run
//! use speechscore_embed::{Embedder, EmbeddingConfig, EmbeddingService, cosine_similarity};
//!
//! fn main() -> anyhow::Result<()> {
//!     let service = EmbeddingService::new(EmbeddingConfig::default());
//!
//!     let texts = vec![
//!         "Explain the refund policy".to_string(),
//!         "Returns are accepted within thirty days".to_string(),
//!     ];
//!
//!     let embeddings = service.embed_batch(&texts)?;
//!     println!("similarity: {}", cosine_similarity(&embeddings[0], &embeddings[1]));
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod embedder;
pub mod error;
pub mod pooling;
pub mod provider;
pub mod service;
pub mod similarity;

pub use config::EmbeddingConfig;
pub use embedder::SentenceEmbedder;
pub use error::{EmbedError, Result};
pub use pooling::PoolingStrategy;
pub use provider::{Embedder, MockEmbedder};
pub use service::EmbeddingService;
pub use similarity::cosine_similarity;
