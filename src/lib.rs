#![doc(html_root_url = "https://docs.rs/imagematch/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! # ImageMatch
//!
//! A similarity-scoring library and service that decides whether a receiver
//! image plausibly matches a sender's textual description or reference image,
//! using pretrained embedding models and cosine similarity against a
//! configurable threshold. Intended as a fraud/duplicate check in a
//! submission-validation flow.
//!
//! ## Features
//!
//! - **Vision embeddings**: 2048-dim ResNet-50 features via libtorch
//! - **Text embeddings**: 768-dim BERT CLS features via a TorchScript export
//! - **Similarity decision**: cosine similarity plus a configurable match threshold
//! - **Web API**: HTTP server with a single comparison endpoint
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! imagematch = { version = "0.1", features = ["full"] }
//! ```
//!
//! Basic usage:
//! ```rust,no_run
//! use imagematch::{SimilarityJudge, Result};
//! use ndarray::Array1;
//!
//! fn main() -> Result<()> {
//!     let judge = SimilarityJudge::new(0.5);
//!     let a = Array1::from(vec![1.0_f32, 0.0]);
//!     let b = Array1::from(vec![0.6_f32, 0.8]);
//!     let result = judge.compare(&a, &b)?;
//!     println!("similarity {:.4}, match {}", result.similarity, result.is_match);
//!     Ok(())
//! }
//! ```

// Internal modules
pub mod api;
pub mod core;
/// Defines the application's error types and result aliases.
pub mod error;
pub mod models;
mod state;

// Public API exports
pub use crate::{
    core::embeddings::{ImageEmbedder, TextEmbedder, IMAGE_EMBEDDING_DIM, TEXT_EMBEDDING_DIM},
    core::similarity::{cosine_similarity, pool_to_dim, SimilarityJudge},
    error::{AppError, Result},
    models::comparison::{ComparisonRequest, ComparisonResult},
    state::{AppState, Config, DEFAULT_MATCH_THRESHOLD},
};

#[cfg(feature = "web")]
pub use crate::api::{create_router, health_check};

#[cfg(feature = "embeddings")]
pub use crate::core::{embeddings::ResNetEmbedder, text::BertEmbedder};

/// Initialize the application with default settings
///
/// This function loads `.env` (if present) and sets up logging. It should be
/// called early in the application startup process.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
///
/// # Example
///
/// ```no_run
/// use imagematch::init;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     init()?;
///     // Application code here
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    // Pick up local overrides before reading any configuration
    dotenv::dotenv().ok();

    // Initialize logging with sensible defaults
    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .ok();

    log::info!("Initializing ImageMatch");

    Ok(())
}

/// Compare two images on disk and report their similarity
///
/// This is a convenience function for library users: it loads both images,
/// embeds them with the given embedder, and applies the judge's threshold.
///
/// # Errors
///
/// Returns an error if either image cannot be read or embedded, or if an
/// embedding is degenerate.
pub fn compare_images<P: AsRef<std::path::Path>>(
    embedder: &dyn ImageEmbedder,
    judge: &SimilarityJudge,
    sender: P,
    receiver: P,
) -> Result<ComparisonResult> {
    let sender = sender.as_ref();
    let receiver = receiver.as_ref();
    log::debug!(
        "Comparing images {} and {}",
        sender.display(),
        receiver.display()
    );

    let sender_embedding = embedder.embed_image(sender)?;
    let receiver_embedding = embedder.embed_image(receiver)?;

    judge.compare(&sender_embedding, &receiver_embedding)
}
