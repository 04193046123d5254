use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use courier_db::DomainError;
use courier_types::api::{LoginRequest, RegisterRequest, TokenResponse};

use crate::AppState;
use crate::error::ApiError;

/// POST /auth/register — create the account, then log it straight in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        db.db.register(
            &db.creds,
            &req.username,
            &req.password,
            &req.first_name,
            &req.last_name,
            &req.phone,
        )
    })
    .await
    .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    let token = state
        .creds
        .issue_token(&user.username)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!("registered user {}", user.username);
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /auth/login — authenticate is a pure predicate; the login
/// timestamp update and token issuance are sequenced here, after a
/// `true`, never inside the directory.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.clone();

    let db = state.clone();
    let valid = tokio::task::spawn_blocking(move || {
        db.db.authenticate(&db.creds, &req.username, &req.password)
    })
    .await
    .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    if !valid {
        return Err(DomainError::Unauthorized.into());
    }

    let db = state.clone();
    let stamped = username.clone();
    tokio::task::spawn_blocking(move || db.db.update_login_timestamp(&stamped))
        .await
        .map_err(|e| ApiError::internal(format!("spawn_blocking join error: {}", e)))??;

    let token = state
        .creds
        .issue_token(&username)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!("user {} logged in", username);
    Ok(Json(TokenResponse { token }))
}
