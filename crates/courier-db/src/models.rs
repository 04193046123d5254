use chrono::{DateTime, Utc};

/// Database row types — these map directly to SQLite rows. Distinct
/// from the courier-types view models so the password hash never leaves
/// this crate.
pub struct UserRow {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
