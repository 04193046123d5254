use serde::{Deserialize, Serialize};

/// Events emitted by the message store's callers after a successful
/// mutation. Persistence has already committed by the time one of these
/// is broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MessageEvent {
    /// A new message was persisted.
    Created { id: i64, from_username: String },
}
