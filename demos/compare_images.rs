//! Example showing how to compare two images on disk

use anyhow::Result;
use imagematch::{compare_images, init, Config, ResNetEmbedder, SimilarityJudge};

fn main() -> Result<()> {
    // Initialize the application
    init()?;

    let config = Config::from_env()?;

    // Load the vision model once
    let embedder = ResNetEmbedder::load(&config.resnet_weights)?;
    let judge = SimilarityJudge::new(config.match_threshold);

    // Compare a sender image against a receiver image
    let result = compare_images(&embedder, &judge, "demos/data/cat.jpg", "demos/data/dog.jpg")?;

    println!("Similarity between images: {:.2}%", result.similarity * 100.0);
    println!("Match: {}", result.is_match);

    Ok(())
}
