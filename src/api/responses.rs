use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::comparison::ComparisonResult;

/// Success body for the compare endpoint: `{ "match": bool, "similarity": float }`
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// Whether the similarity met the configured threshold
    #[serde(rename = "match")]
    pub is_match: bool,
    /// The raw cosine similarity score
    pub similarity: f32,
}

impl From<ComparisonResult> for MatchResponse {
    fn from(result: ComparisonResult) -> Self {
        Self {
            is_match: result.is_match,
            similarity: result.similarity,
        }
    }
}

impl IntoResponse for MatchResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let response = MatchResponse::from(ComparisonResult {
            similarity: 0.73,
            is_match: true,
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["match"], serde_json::json!(true));
        assert!((value["similarity"].as_f64().unwrap() - 0.73).abs() < 1e-6);
    }
}
