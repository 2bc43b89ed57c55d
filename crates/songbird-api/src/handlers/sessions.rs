//! Session handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{EndResponse, MemoryResponse, MessageResponse, SendMessageRequest, StartResponse};

/// POST /api/sessions/:id/start - Open a session and greet the guest.
pub async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StartResponse>> {
    let message = state.orchestrator.start(&id).await?;
    Ok(Json(StartResponse { message }))
}

/// POST /api/sessions/:id/messages - Send a guest message.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<MessageResponse>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message cannot be empty".to_string()));
    }
    debug!(session_id = %id, "Message received");

    let reply = state.orchestrator.handle_message(&id, &req.message).await?;
    Ok(Json(MessageResponse {
        response: reply.message,
        closed: reply.closed,
        summary: reply.summary,
    }))
}

/// POST /api/sessions/:id/end - Close a session and store its summary.
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EndResponse>> {
    let summary = state.orchestrator.end_session(&id).await?;
    Ok(Json(EndResponse {
        message: "session closed".to_string(),
        summary,
    }))
}

/// GET /api/sessions/:id/memory - Summary or recent turns for the session.
pub async fn get_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemoryResponse>> {
    let rehydration = state.orchestrator.rehydrate(&id).await?;
    Ok(Json(MemoryResponse::new(id, rehydration)))
}
