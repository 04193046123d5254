use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use courier_auth::Claims;
use courier_types::api::{
    ReceivedMessagesResponse, SentMessagesResponse, UserListResponse, UserResponse,
};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::ensure_correct_user;

/// GET /users — directory listing, any authenticated caller.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let users = tokio::task::spawn_blocking(move || db.db.all_users())
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    Ok(Json(UserListResponse { users }))
}

/// GET /users/{username} — profile, visible only to that user.
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_correct_user(&claims, &username)?;

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user(&username))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    Ok(Json(UserResponse { user }))
}

/// GET /users/{username}/from — outbound history with recipient
/// identities embedded.
pub async fn messages_from(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_correct_user(&claims, &username)?;

    let db = state.clone();
    let messages = tokio::task::spawn_blocking(move || db.db.messages_from(&username))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    Ok(Json(SentMessagesResponse { messages }))
}

/// GET /users/{username}/to — inbound history with sender identities
/// embedded.
pub async fn messages_to(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_correct_user(&claims, &username)?;

    let db = state.clone();
    let messages = tokio::task::spawn_blocking(move || db.db.messages_to(&username))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    Ok(Json(ReceivedMessagesResponse { messages }))
}
