use serde::{Deserialize, Serialize};

/// A request to compare a receiver image against a sender description or image.
///
/// All fields default to empty so that missing keys surface as validation
/// errors instead of deserialization failures.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ComparisonRequest {
    /// Textual description of the expected item (text-vs-image path)
    #[serde(default)]
    pub sender_text: String,
    /// Path to the sender's reference image (image-vs-image fallback path)
    #[serde(default)]
    pub sender_img_path: String,
    /// Path to the receiver's image; always required
    #[serde(default)]
    pub receiver_img_path: String,
}

impl ComparisonRequest {
    /// The trimmed sender text, if non-empty
    pub fn sender_text(&self) -> Option<&str> {
        let text = self.sender_text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// The trimmed sender image path, if non-empty
    pub fn sender_img_path(&self) -> Option<&str> {
        let path = self.sender_img_path.trim();
        (!path.is_empty()).then_some(path)
    }

    /// The trimmed receiver image path, if non-empty
    pub fn receiver_img_path(&self) -> Option<&str> {
        let path = self.receiver_img_path.trim();
        (!path.is_empty()).then_some(path)
    }
}

/// The outcome of a similarity comparison.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Cosine similarity score, nominally in [-1, 1], not clamped
    pub similarity: f32,
    /// Whether the score met the configured threshold
    #[serde(rename = "match")]
    pub is_match: bool,
}
