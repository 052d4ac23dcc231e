//! Pooling of token embeddings into one sentence vector.

use candle_core::{Tensor, D};
use serde::{Deserialize, Serialize};

/// How token embeddings are reduced to a sentence embedding.
///
/// sentence-transformers models are trained with mean pooling, so that is
/// the default; `Cls` exists for BERT checkpoints fine-tuned on the first
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PoolingStrategy {
    #[default]
    Mean,
    Cls,
}

impl PoolingStrategy {
    /// `hidden`: (batch, seq_len, dim), `mask`: (batch, seq_len) as F32.
    /// Returns (batch, dim).
    pub fn apply(&self, hidden: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            PoolingStrategy::Mean => masked_mean(hidden, mask),
            PoolingStrategy::Cls => hidden.narrow(1, 0, 1)?.squeeze(1),
        }
    }
}

/// Average of the non-padding token vectors.
fn masked_mean(hidden: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
    let weights = mask.unsqueeze(D::Minus1)?;
    let summed = hidden.broadcast_mul(&weights)?.sum(1)?;
    // an all-padding row would divide by zero
    let counts = weights.sum(1)?.clamp(1e-9f32, f32::MAX)?;
    summed.broadcast_div(&counts)
}

/// Scale each row of a (batch, dim) tensor to unit length.
pub fn l2_normalize(rows: &Tensor) -> candle_core::Result<Tensor> {
    let norms = rows.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-9f32, f32::MAX)?;
    rows.broadcast_div(&norms)
}
