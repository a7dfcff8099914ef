#![cfg(feature = "web")]

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use ndarray::Array1;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use imagematch::{
    create_router, AppState, ComparisonRequest, Config, ImageEmbedder, Result, TextEmbedder,
};

/// Embedder returning a fixed vector for every input
struct FixedEmbedder(Vec<f32>);

impl ImageEmbedder for FixedEmbedder {
    fn embed_image(&self, _path: &Path) -> Result<Array1<f32>> {
        Ok(Array1::from(self.0.clone()))
    }
}

impl TextEmbedder for FixedEmbedder {
    fn embed_text(&self, _text: &str) -> Result<Array1<f32>> {
        Ok(Array1::from(self.0.clone()))
    }
}

/// Embedder that decodes the file to prove the path is a readable image
struct DecodingEmbedder;

impl ImageEmbedder for DecodingEmbedder {
    fn embed_image(&self, path: &Path) -> Result<Array1<f32>> {
        let img = image::open(path).map_err(imagematch::AppError::Image)?;
        let mean = img.to_rgb8().pixels().map(|p| p[0] as f32).sum::<f32>();
        Ok(Array1::from(vec![mean.max(1.0), 1.0, 1.0]))
    }
}

fn test_state(threshold: f32, embedder: Arc<FixedEmbedder>) -> Arc<AppState> {
    let config = Config {
        match_threshold: threshold,
        ..Config::default()
    };
    AppState::with_embedders(config, embedder.clone(), embedder)
}

async fn post_compare(
    state: Arc<AppState>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = create_router().with_state(state);
    let request = Request::builder()
        .method("POST")
        .uri("/api/compare")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let embedder = Arc::new(FixedEmbedder(vec![1.0, 0.0]));
    let app = create_router().with_state(test_state(0.5, embedder));

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_compare_text_match_end_to_end() {
    let embedder = Arc::new(FixedEmbedder(vec![0.2, -0.4, 0.9]));
    let state = test_state(0.5, embedder);

    let (status, body) = post_compare(
        state,
        serde_json::json!({
            "sender_text": "a red cup",
            "receiver_img_path": "red_cup.jpg"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["match"], serde_json::json!(true));
    assert!((body["similarity"].as_f64().unwrap() - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_compare_missing_receiver() {
    let embedder = Arc::new(FixedEmbedder(vec![1.0, 0.0]));
    let state = test_state(0.5, embedder);

    let (status, body) = post_compare(
        state,
        serde_json::json!({ "sender_text": "a red cup" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Receiver image path required"));
}

#[tokio::test]
async fn test_compare_missing_sender() {
    let embedder = Arc::new(FixedEmbedder(vec![1.0, 0.0]));
    let state = test_state(0.5, embedder);

    let (status, body) = post_compare(
        state,
        serde_json::json!({
            "sender_text": "",
            "sender_img_path": "",
            "receiver_img_path": "x"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("must provide text or image"));
}

#[tokio::test]
async fn test_compare_unreadable_image_is_internal_error() {
    // A temp file with non-image content, routed through an embedder that
    // actually decodes it
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not an image").unwrap();

    let text = Arc::new(FixedEmbedder(vec![1.0, 1.0, 1.0]));
    let config = Config::default();
    let state = AppState::with_embedders(config, Arc::new(DecodingEmbedder), text);

    let (status, body) = post_compare(
        state,
        serde_json::json!({
            "sender_text": "a red cup",
            "receiver_img_path": file.path().to_string_lossy()
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Image error"));
}

#[test]
fn test_request_round_trip() {
    let request = ComparisonRequest {
        sender_text: "a red cup".to_string(),
        sender_img_path: String::new(),
        receiver_img_path: "receiver.jpg".to_string(),
    };
    let json = serde_json::to_string(&request).unwrap();
    let back: ComparisonRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.sender_text, "a red cup");
    assert_eq!(back.receiver_img_path, "receiver.jpg");
}
