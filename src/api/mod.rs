//! API module for handling HTTP requests and responses

#[cfg(feature = "web")]
pub(crate) mod handlers;
#[cfg(feature = "web")]
pub(crate) mod responses;

#[cfg(feature = "web")]
use axum::{
    routing::{get, post},
    Router,
};
#[cfg(feature = "web")]
use std::sync::Arc;
#[cfg(feature = "web")]
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[cfg(feature = "web")]
use crate::state::AppState;

#[cfg(feature = "web")]
pub(crate) use handlers::*;

#[cfg(feature = "web")]
/// Create the application router with all routes
pub fn create_router() -> Router<Arc<AppState>> {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Public health check
        .route("/api/health", get(health_check))
        // Similarity comparison endpoint
        .route("/api/compare", post(compare))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(feature = "web")]
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
