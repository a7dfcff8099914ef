use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::embeddings::{ImageEmbedder, TextEmbedder};
use crate::core::similarity::SimilarityJudge;

/// Default cosine similarity cutoff for declaring a match
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.5;

/// Configuration for the application
#[derive(Clone, Debug)]
pub struct Config {
    /// Cosine similarity cutoff above which two embeddings match
    pub match_threshold: f32,
    /// Path to the ResNet-50 weights file (`.ot`)
    pub resnet_weights: PathBuf,
    /// Path to the TorchScript BERT module
    pub bert_model: PathBuf,
    /// Path to the BERT tokenizer config (`tokenizer.json`)
    pub bert_tokenizer: PathBuf,
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            resnet_weights: PathBuf::from("models/resnet50.ot"),
            bert_model: PathBuf::from("models/bert.pt"),
            bert_tokenizer: PathBuf::from("models/tokenizer.json"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Config {
    /// Build a configuration from `IMAGEMATCH_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> crate::error::Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("IMAGEMATCH_THRESHOLD") {
            config.match_threshold = value.parse().map_err(|_| {
                crate::error::AppError::Config(format!(
                    "IMAGEMATCH_THRESHOLD is not a valid float: {}",
                    value
                ))
            })?;
        }
        if let Ok(value) = std::env::var("IMAGEMATCH_RESNET_WEIGHTS") {
            config.resnet_weights = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("IMAGEMATCH_BERT_MODEL") {
            config.bert_model = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("IMAGEMATCH_BERT_TOKENIZER") {
            config.bert_tokenizer = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("IMAGEMATCH_BIND_ADDR") {
            config.bind_addr = value.parse().map_err(|_| {
                crate::error::AppError::Config(format!(
                    "IMAGEMATCH_BIND_ADDR is not a valid socket address: {}",
                    value
                ))
            })?;
        }

        Ok(config)
    }
}

/// Application state shared across handlers
///
/// Models are loaded once at startup and injected here; handlers only see the
/// embedder traits, which keeps them testable without model weights.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Shared vision embedder
    pub image_embedder: Arc<dyn ImageEmbedder>,
    /// Shared text embedder
    pub text_embedder: Arc<dyn TextEmbedder>,
    /// Similarity decision component
    pub judge: SimilarityJudge,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("judge", &self.judge)
            .finish()
    }
}

impl AppState {
    /// Create application state with the given configuration, loading the
    /// pretrained models from the configured paths
    #[cfg(feature = "embeddings")]
    pub fn new(config: Config) -> crate::error::Result<Arc<Self>> {
        use crate::core::embeddings::ResNetEmbedder;
        use crate::core::text::BertEmbedder;

        let image_embedder = Arc::new(ResNetEmbedder::load(&config.resnet_weights)?);
        let text_embedder = Arc::new(BertEmbedder::load(
            config.bert_model.clone(),
            config.bert_tokenizer.clone(),
        )?);

        Ok(Self::with_embedders(config, image_embedder, text_embedder))
    }

    /// Create application state with explicitly injected embedders
    pub fn with_embedders(
        config: Config,
        image_embedder: Arc<dyn ImageEmbedder>,
        text_embedder: Arc<dyn TextEmbedder>,
    ) -> Arc<Self> {
        let judge = SimilarityJudge::new(config.match_threshold);

        Arc::new(Self {
            config,
            image_embedder,
            text_embedder,
            judge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.match_threshold, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(config.bind_addr.port(), 3000);
    }
}
