//! Core functionality: embedding extraction and similarity scoring

pub mod embeddings;
pub mod similarity;

#[cfg(feature = "embeddings")]
pub mod text;
