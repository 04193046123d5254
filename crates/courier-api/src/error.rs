use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use courier_db::DomainError;

/// What a handler can fail with. Domain errors cross the boundary
/// unchanged in kind and only get a status code attached here.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Domain(DomainError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Domain(DomainError::Storage(_)) | Self::Domain(DomainError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage faults and join errors are logged server-side and
        // returned opaque.
        let message = match &self {
            Self::Domain(DomainError::Storage(e)) => {
                error!("storage error: {}", e);
                "internal server error".to_string()
            }
            Self::Domain(DomainError::Internal(msg)) | Self::Internal(msg) => {
                error!("internal error: {}", msg);
                "internal server error".to_string()
            }
            Self::Domain(e) => e.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let not_found = ApiError::from(DomainError::NotFound("no such user: x".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = ApiError::from(DomainError::Conflict("username already taken: x".into()));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let unauthorized = ApiError::from(DomainError::Unauthorized);
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(
            ApiError::bad_request("missing body").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unauthorized_message_does_not_name_the_account() {
        let unauthorized = ApiError::from(DomainError::Unauthorized);
        let message = match &unauthorized {
            ApiError::Domain(e) => e.to_string(),
            _ => unreachable!(),
        };
        assert_eq!(message, "invalid username/password");
    }
}
