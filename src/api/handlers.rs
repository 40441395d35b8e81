use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

use crate::config::UpstreamConfig;
use crate::whisper;

use super::models::{
    ErrorResponse, HealthResponse, SearchRequest, SearchResponse, WhisperResponse,
};
use super::AppState;

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.query.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation("Query is required")),
        ));
    }

    tracing::info!("search query received: {}", request.query);

    let html = state.search.search(&request.query).await.map_err(|e| {
        tracing::error!("error processing search: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::upstream("API Error", e.to_string())),
        )
    })?;

    Ok(Json(SearchResponse {
        success: true,
        html,
        query: request.query,
    }))
}

pub async fn whisper_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<WhisperResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut audio: Option<Vec<u8>> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_failure(e)),
        };
        if field.name() == Some("audio") {
            let bytes = field.bytes().await.map_err(multipart_failure)?;
            audio = Some(bytes.to_vec());
            break;
        }
    }

    let Some(audio) = audio else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation("No audio file provided")),
        ));
    };

    tracing::info!("audio file received: {} bytes", audio.len());

    let text = state.transcriber.transcribe(audio).await.map_err(|e| {
        tracing::error!("error processing audio: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::upstream(
                "Audio Processing Error",
                e.to_string(),
            )),
        )
    })?;

    Ok(Json(WhisperResponse {
        success: true,
        text,
    }))
}

// Oversized or malformed uploads keep the transport's status (413 for the
// body cap) instead of being reported as a missing file.
fn multipart_failure(e: MultipartError) -> (StatusCode, Json<ErrorResponse>) {
    (
        e.status(),
        Json(ErrorResponse::upstream("Audio Processing Error", e.body_text())),
    )
}

/// Reports configuration state only. Never contacts an upstream, never fails.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = UpstreamConfig::load(state.config.as_ref());

    Json(HealthResponse {
        status: "ok",
        tandem_configured: config.tandem_configured(),
        whisper_configured: config.whisper_configured(),
        whisper_type: whisper::WHISPER_TYPE,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
