use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// None of these views ever carry the password hash — it stays inside
// courier-db and is only handed to the credential service for
// verification.

/// Directory listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// The identity embedded on either side of a message view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCard {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Full profile as returned by a single-user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetail {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Confirmation of a login-timestamp update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginStamp {
    pub username: String,
    pub last_login_at: DateTime<Utc>,
}

/// A freshly created message, as returned by the send operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub id: i64,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Confirmation of a read acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub id: i64,
    pub read_at: DateTime<Utc>,
}

/// A single message with both endpoints resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDetail {
    pub id: i64,
    pub from_user: UserCard,
    pub to_user: UserCard,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Outbound history entry: a message this user sent, with the
/// recipient's identity embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: i64,
    pub to_user: UserCard,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Inbound history entry: a message this user received, with the
/// sender's identity embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub id: i64,
    pub from_user: UserCard,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
