use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use courier_auth::Claims;
use courier_db::DomainError;

use crate::AppState;
use crate::error::ApiError;

/// Extract and validate the bearer token, stashing its claims as a
/// request extension for handlers to pick up.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(DomainError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(DomainError::Unauthorized)?;

    let claims = state
        .creds
        .verify_token(token)
        .map_err(|_| DomainError::Unauthorized)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// User-scoped routes are only visible to that user's own token.
/// Deliberately the same error as a bad token, so the response does not
/// say whose resources exist.
pub fn ensure_correct_user(claims: &Claims, username: &str) -> Result<(), ApiError> {
    if claims.sub == username {
        Ok(())
    } else {
        Err(DomainError::Unauthorized.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_user_check_matches_token_subject() {
        let claims = Claims {
            sub: "alice".into(),
            exp: 0,
        };
        assert!(ensure_correct_user(&claims, "alice").is_ok());
        assert!(ensure_correct_user(&claims, "bob").is_err());
    }
}
