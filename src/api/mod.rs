use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::config::ConfigSource;
use crate::tandem::SearchBackend;
use crate::whisper::TranscriptionBackend;

pub mod handlers;
pub mod models;

/// Uploads above this are rejected by the transport layer, not truncated.
pub const MAX_AUDIO_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState {
    pub search: Arc<dyn SearchBackend>,
    pub transcriber: Arc<dyn TranscriptionBackend>,
    pub config: Arc<dyn ConfigSource>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/search", post(handlers::search_handler))
        .route(
            "/api/whisper",
            post(handlers::whisper_handler).layer(DefaultBodyLimit::max(MAX_AUDIO_UPLOAD_BYTES)),
        )
        .route("/api/health", get(handlers::health_handler))
        .with_state(state)
        // Static file serving for the UI
        .nest_service("/", ServeDir::new("static"))
        .layer(cors)
}
