//! Text embedding extraction using a TorchScript BERT model.

use std::path::Path;
use std::sync::Mutex;

use anyhow::anyhow;
use ndarray::Array1;
use tch::{CModule, Device, Kind, Tensor};
use tokenizers::Tokenizer;

use super::{TextEmbedder, TEXT_EMBEDDING_DIM};
use crate::error::{AppError, Result};

/// Token budget per input; anything longer is truncated by the tokenizer
pub const MAX_TOKENS: usize = 128;

/// BERT text embedder backed by a TorchScript export
///
/// The module takes `input_ids` and `attention_mask` and returns the last
/// hidden state; the CLS token vector is used as the sentence embedding.
pub struct BertEmbedder {
    // CModule is not Sync, so inference is serialized behind a mutex
    module: Mutex<CModule>,
    tokenizer: Tokenizer,
    device: Device,
}

impl std::fmt::Debug for BertEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmbedder")
            .field("device", &self.device)
            .finish()
    }
}

impl BertEmbedder {
    /// Load a TorchScript BERT module and its tokenizer config
    pub fn load<P: AsRef<Path>>(model_path: P, tokenizer_path: P) -> Result<Self> {
        let device = Device::cuda_if_available();

        let module = CModule::load_on_device(model_path.as_ref(), device).map_err(|e| {
            AppError::ModelLoad(format!(
                "failed to load BERT module from {}: {}",
                model_path.as_ref().display(),
                e
            ))
        })?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path.as_ref()).map_err(|e| {
            AppError::ModelLoad(format!(
                "failed to load tokenizer from {}: {}",
                tokenizer_path.as_ref().display(),
                e
            ))
        })?;

        let truncation = tokenizers::utils::truncation::TruncationParams {
            max_length: MAX_TOKENS,
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| AppError::ModelLoad(format!("invalid truncation config: {}", e)))?;

        log::info!(
            "Loaded BERT module from {} on {:?}",
            model_path.as_ref().display(),
            device
        );

        Ok(Self {
            module: Mutex::new(module),
            tokenizer,
            device,
        })
    }
}

impl TextEmbedder for BertEmbedder {
    fn embed_text(&self, text: &str) -> Result<Array1<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("tokenization failed: {}", e))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| x as i64)
            .collect();

        let ids = Tensor::of_slice(&ids).unsqueeze(0).to_device(self.device);
        let mask = Tensor::of_slice(&mask).unsqueeze(0).to_device(self.device);

        let module = self
            .module
            .lock()
            .map_err(|_| AppError::Internal("text model lock poisoned".to_string()))?;
        let hidden = tch::no_grad(|| module.forward_ts(&[&ids, &mask]))?;

        // CLS pooling: last_hidden_state[:, 0, :]
        let cls = hidden.select(1, 0).squeeze().to_kind(Kind::Float);
        let embedding = Vec::<f32>::try_from(cls.to_device(Device::Cpu))?;
        debug_assert_eq!(embedding.len(), TEXT_EMBEDDING_DIM);

        Ok(Array1::from(embedding))
    }
}
