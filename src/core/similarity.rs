//! Similarity decision logic: cosine similarity plus threshold verdict.

use ndarray::Array1;

use crate::error::{AppError, Result};
use crate::models::comparison::ComparisonResult;

/// Compute cosine similarity between two embeddings of equal length
///
/// The score is `dot(a, b) / (||a|| * ||b||)` and is not clamped. Inputs with a
/// zero or non-finite norm are rejected with [`AppError::DegenerateEmbedding`].
pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AppError::Internal(format!(
            "Embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();

    if !(norm_a.is_finite() && norm_a > 0.0) {
        return Err(AppError::DegenerateEmbedding(format!(
            "first embedding has norm {}",
            norm_a
        )));
    }
    if !(norm_b.is_finite() && norm_b > 0.0) {
        return Err(AppError::DegenerateEmbedding(format!(
            "second embedding has norm {}",
            norm_b
        )));
    }

    Ok(a.dot(b) / (norm_a * norm_b))
}

/// Reduce an embedding to `dim` elements by mean pooling over contiguous chunks
///
/// Chunk boundaries are `floor(i * len / dim)`, so the whole input contributes
/// even when `len` is not a multiple of `dim`. Returns the input unchanged when
/// it is already no longer than `dim`.
pub fn pool_to_dim(v: &Array1<f32>, dim: usize) -> Array1<f32> {
    let len = v.len();
    if dim == 0 || len <= dim {
        return v.clone();
    }

    let mut pooled = Vec::with_capacity(dim);
    for i in 0..dim {
        let start = i * len / dim;
        let end = (i + 1) * len / dim;
        let sum: f32 = (start..end).map(|j| v[j]).sum();
        pooled.push(sum / (end - start) as f32);
    }

    Array1::from(pooled)
}

/// Decides whether two embeddings match, given a similarity threshold
///
/// Embeddings of different lengths are aligned first by pooling the longer one
/// down to the shorter one's length, so a 2048-dim image embedding can be scored
/// against a 768-dim text embedding without discarding any image features.
#[derive(Clone, Debug)]
pub struct SimilarityJudge {
    threshold: f32,
}

impl SimilarityJudge {
    /// Create a judge with the given match threshold
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// The configured match threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score two embeddings and derive the match verdict
    pub fn compare(&self, sender: &Array1<f32>, receiver: &Array1<f32>) -> Result<ComparisonResult> {
        let dim = sender.len().min(receiver.len());
        let sender = pool_to_dim(sender, dim);
        let receiver = pool_to_dim(receiver, dim);

        let similarity = cosine_similarity(&sender, &receiver)?;

        Ok(ComparisonResult {
            similarity,
            is_match: similarity >= self.threshold,
        })
    }
}

impl Default for SimilarityJudge {
    fn default() -> Self {
        Self::new(crate::state::DEFAULT_MATCH_THRESHOLD)
    }
}
