use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::AppError,
    services::{
        query_router::Intent,
        sheet::{preview, DataPreview},
        workspace::{ChatMessage, Dataset},
    },
    AppState,
};

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/sheets", axum::routing::delete(reset_sheet))
        .route("/sheets/upload", post(upload_sheet))
        .route("/sheets/analysis", get(get_analysis))
        .route("/sheets/preview", get(get_preview))
        .route("/sheets/ask", post(ask_question))
        .route("/sheets/chat", get(get_chat))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub intent: Option<Intent>,
    pub message_id: u64,
}

pub async fn upload_sheet(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<Dataset>, AppError> {
    let file_name = params.file_name.unwrap_or_else(|| "upload".to_string());
    let max_file_size = state.config.max_file_size;
    tracing::info!("Received upload {}, size: {}KB", file_name, body.len() / 1024);

    // Parsing and profiling are blocking work.
    let dataset = tokio::task::spawn_blocking(move || {
        Dataset::from_upload(&file_name, &body, max_file_size)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))?
    .map_err(|e| {
        tracing::warn!("Upload rejected: {}", e);
        e
    })?;

    let installed = state.workspace.write().install(dataset).clone();
    Ok(Json(installed))
}

pub async fn get_analysis(State(state): State<Arc<AppState>>) -> Result<Json<Dataset>, AppError> {
    let workspace = state.workspace.read();
    let dataset = workspace.dataset().cloned().ok_or_else(no_dataset)?;
    Ok(Json(dataset))
}

pub async fn get_preview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<DataPreview>, AppError> {
    let limit = params.limit.unwrap_or(state.config.preview_rows);
    let workspace = state.workspace.read();
    let dataset = workspace.dataset().ok_or_else(no_dataset)?;
    let view = preview(&dataset.grid, limit);
    Ok(Json(view))
}

pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if !state.config.simulated_latency.is_zero() {
        tokio::time::sleep(state.config.simulated_latency).await;
    }

    let reply = state.workspace.write().ask(&request.question)?;
    Ok(Json(AskResponse {
        answer: reply.content,
        intent: reply.intent,
        message_id: reply.id,
    }))
}

pub async fn get_chat(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessage>> {
    let messages = state.workspace.read().chat().messages().to_vec();
    Json(messages)
}

pub async fn reset_sheet(State(state): State<Arc<AppState>>) -> StatusCode {
    state.workspace.write().reset();
    StatusCode::NO_CONTENT
}

fn no_dataset() -> AppError {
    AppError::NotFound("No spreadsheet has been uploaded".to_string())
}
