use thiserror::Error;

/// Errors raised by the domain operations. The HTTP layer maps these to
/// status codes; nothing in this crate ever produces a transport-level
/// response.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced user or message id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness violation on registration.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Failed authentication. The message deliberately does not say
    /// whether the username exists.
    #[error("invalid username/password")]
    Unauthorized,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
