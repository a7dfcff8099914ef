use axum::{extract::State, response::IntoResponse, Json};
use std::path::Path;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    models::comparison::ComparisonRequest,
    AppState,
};

use super::responses::MatchResponse;

/// Compare a receiver image against a sender description or reference image.
///
/// The receiver image path is always required. If `sender_text` is non-empty
/// the text-vs-image path is taken; otherwise a non-empty `sender_img_path`
/// selects the image-vs-image fallback. With neither, the request is rejected.
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ComparisonRequest>,
) -> Result<impl IntoResponse> {
    let receiver_path = request
        .receiver_img_path()
        .ok_or_else(|| AppError::InvalidInput("Receiver image path required".to_string()))?;

    let sender_embedding = if let Some(text) = request.sender_text() {
        log::debug!("Comparing text description against {}", receiver_path);
        state.text_embedder.embed_text(text)?
    } else if let Some(sender_path) = request.sender_img_path() {
        log::debug!("Comparing image {} against {}", sender_path, receiver_path);
        state.image_embedder.embed_image(Path::new(sender_path))?
    } else {
        return Err(AppError::InvalidInput(
            "Sender must provide text or image".to_string(),
        ));
    };

    let receiver_embedding = state.image_embedder.embed_image(Path::new(receiver_path))?;

    let result = state.judge.compare(&sender_embedding, &receiver_embedding)?;
    log::info!(
        "Comparison for {}: similarity {:.4}, match {}",
        receiver_path,
        result.similarity,
        result.is_match
    );

    Ok(MatchResponse::from(result))
}
