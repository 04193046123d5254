use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use courier_auth::Claims;
use courier_db::DomainError;
use courier_notify::events::MessageEvent;
use courier_types::api::{
    MessageResponse, NewMessageResponse, ReadReceiptResponse, SendMessageRequest,
};

use crate::AppState;
use crate::error::ApiError;

/// POST /messages — the sender is always the token subject. The
/// created event goes out only after the insert has committed, and the
/// response never waits on the notifier.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.body.is_empty() {
        return Err(ApiError::bad_request("message body must not be empty"));
    }

    let db = state.clone();
    let from = claims.sub.clone();
    let message = tokio::task::spawn_blocking(move || {
        db.db.create_message(&from, &req.to_username, &req.body)
    })
    .await
    .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    state.dispatcher.broadcast(MessageEvent::Created {
        id: message.id,
        from_username: message.from_username.clone(),
    });

    Ok((StatusCode::CREATED, Json(NewMessageResponse { message })))
}

/// GET /messages/{id} — readable by either endpoint of the message,
/// nobody else.
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let message = tokio::task::spawn_blocking(move || db.db.get_message(id))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    if claims.sub != message.from_user.username && claims.sub != message.to_user.username {
        return Err(DomainError::Unauthorized.into());
    }

    Ok(Json(MessageResponse { message }))
}

/// POST /messages/{id}/read — only the recipient's acknowledgment
/// advances `read_at`.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let detail = tokio::task::spawn_blocking(move || db.db.get_message(id))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    if claims.sub != detail.to_user.username {
        return Err(DomainError::Unauthorized.into());
    }

    let db = state.clone();
    let message = tokio::task::spawn_blocking(move || db.db.mark_read(id))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    Ok(Json(ReadReceiptResponse { message }))
}
