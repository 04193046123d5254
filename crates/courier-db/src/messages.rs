use chrono::Utc;
use rusqlite::{OptionalExtension, Row};

use courier_types::models::{
    MessageDetail, NewMessage, ReadReceipt, ReceivedMessage, SentMessage, UserCard,
};

use crate::Database;
use crate::error::DomainError;
use crate::users::user_exists;

impl Database {
    /// Persist a new message. Both endpoints must resolve to existing
    /// users; a missing one is reported as a domain `NotFound`, not a
    /// raw foreign-key fault (the FK constraint stays on as a
    /// backstop). `read_at` starts out null.
    ///
    /// Delivery notification is not this method's concern — the caller
    /// emits the created event after this returns, so a dispatch
    /// failure can never roll back or fail the insert.
    pub fn create_message(
        &self,
        from_username: &str,
        to_username: &str,
        body: &str,
    ) -> Result<NewMessage, DomainError> {
        let sent_at = Utc::now();

        self.with_conn(|conn| {
            for username in [from_username, to_username] {
                if !user_exists(conn, username)? {
                    return Err(DomainError::NotFound(format!("no such user: {}", username)));
                }
            }

            conn.execute(
                "INSERT INTO messages (from_username, to_username, body, sent_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![from_username, to_username, body, sent_at],
            )?;

            Ok(NewMessage {
                id: conn.last_insert_rowid(),
                from_username: from_username.to_string(),
                to_username: to_username.to_string(),
                body: body.to_string(),
                sent_at,
            })
        })
    }

    /// Acknowledge receipt: set `read_at` to now. A repeat call
    /// refreshes the timestamp forward; nothing ever clears it.
    pub fn mark_read(&self, id: i64) -> Result<ReadReceipt, DomainError> {
        let read_at = Utc::now();

        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE messages SET read_at = ?1 WHERE id = ?2",
                rusqlite::params![read_at, id],
            )?;

            if updated == 0 {
                return Err(DomainError::NotFound(format!("no such message: {}", id)));
            }

            Ok(ReadReceipt { id, read_at })
        })
    }

    /// Fetch one message with both endpoint identities embedded.
    pub fn get_message(&self, id: i64) -> Result<MessageDetail, DomainError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id,
                        f.username, f.first_name, f.last_name, f.phone,
                        t.username, t.first_name, t.last_name, t.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages AS m
                 JOIN users AS f ON m.from_username = f.username
                 JOIN users AS t ON m.to_username = t.username
                 WHERE m.id = ?1",
            )?;

            let message = stmt
                .query_row([id], |row| {
                    Ok(MessageDetail {
                        id: row.get(0)?,
                        from_user: user_card(row, 1)?,
                        to_user: user_card(row, 5)?,
                        body: row.get(9)?,
                        sent_at: row.get(10)?,
                        read_at: row.get(11)?,
                    })
                })
                .optional()?;

            message.ok_or_else(|| DomainError::NotFound(format!("no such message: {}", id)))
        })
    }

    /// Every message sent by `username`, recipient identity embedded,
    /// in insertion order.
    pub fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>, DomainError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id,
                        t.username, t.first_name, t.last_name, t.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages AS m
                 JOIN users AS t ON m.to_username = t.username
                 WHERE m.from_username = ?1
                 ORDER BY m.id",
            )?;

            let rows = stmt
                .query_map([username], |row| {
                    Ok(SentMessage {
                        id: row.get(0)?,
                        to_user: user_card(row, 1)?,
                        body: row.get(5)?,
                        sent_at: row.get(6)?,
                        read_at: row.get(7)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Mirror of `messages_from`: every message received by `username`,
    /// sender identity embedded.
    pub fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>, DomainError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id,
                        f.username, f.first_name, f.last_name, f.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages AS m
                 JOIN users AS f ON m.from_username = f.username
                 WHERE m.to_username = ?1
                 ORDER BY m.id",
            )?;

            let rows = stmt
                .query_map([username], |row| {
                    Ok(ReceivedMessage {
                        id: row.get(0)?,
                        from_user: user_card(row, 1)?,
                        body: row.get(5)?,
                        sent_at: row.get(6)?,
                        read_at: row.get(7)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn user_card(row: &Row, offset: usize) -> Result<UserCard, rusqlite::Error> {
    Ok(UserCard {
        username: row.get(offset)?,
        first_name: row.get(offset + 1)?,
        last_name: row.get(offset + 2)?,
        phone: row.get(offset + 3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_auth::CredentialService;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        let creds = CredentialService::new("test-secret");

        for (username, first, last, phone) in [
            ("alice", "Alice", "Archer", "+15551230001"),
            ("bob", "Bob", "Baker", "+15551230002"),
            ("carol", "Carol", "Cole", "+15551230003"),
        ] {
            db.register(&creds, username, "pw", first, last, phone)
                .unwrap();
        }

        db
    }

    #[test]
    fn create_starts_unread() {
        let db = setup();
        let message = db.create_message("alice", "bob", "hi").unwrap();

        assert_eq!(message.from_username, "alice");
        assert_eq!(message.to_username, "bob");

        let detail = db.get_message(message.id).unwrap();
        assert!(detail.read_at.is_none());
        assert_eq!(detail.sent_at, message.sent_at);
    }

    #[test]
    fn create_requires_both_endpoints() {
        let db = setup();

        let bad_recipient = db.create_message("alice", "nobody", "hi");
        assert!(matches!(bad_recipient, Err(DomainError::NotFound(_))));

        let bad_sender = db.create_message("nobody", "bob", "hi");
        assert!(matches!(bad_sender, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn get_embeds_both_identities() {
        let db = setup();
        let message = db.create_message("alice", "bob", "hi").unwrap();

        let detail = db.get_message(message.id).unwrap();
        assert_eq!(detail.from_user.username, "alice");
        assert_eq!(detail.from_user.first_name, "Alice");
        assert_eq!(detail.from_user.phone, "+15551230001");
        assert_eq!(detail.to_user.username, "bob");
        assert_eq!(detail.to_user.last_name, "Baker");
        assert_eq!(detail.body, "hi");
    }

    #[test]
    fn get_unknown_message_is_not_found() {
        let db = setup();
        assert!(matches!(
            db.get_message(9999999),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn mark_read_sets_timestamp_after_sent() {
        let db = setup();
        let message = db.create_message("alice", "bob", "hi").unwrap();

        let receipt = db.mark_read(message.id).unwrap();
        assert!(receipt.read_at >= message.sent_at);

        let detail = db.get_message(message.id).unwrap();
        assert_eq!(detail.read_at, Some(receipt.read_at));
    }

    #[test]
    fn repeat_mark_read_never_moves_backward() {
        let db = setup();
        let message = db.create_message("alice", "bob", "hi").unwrap();

        let first = db.mark_read(message.id).unwrap();
        let second = db.mark_read(message.id).unwrap();
        assert!(second.read_at >= first.read_at);
    }

    #[test]
    fn mark_read_unknown_message_is_not_found() {
        let db = setup();
        assert!(matches!(
            db.mark_read(9999999),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn history_views_mirror_each_other() {
        let db = setup();
        db.create_message("alice", "bob", "hi bob").unwrap();
        db.create_message("alice", "carol", "hi carol").unwrap();

        let sent = db.messages_from("alice").unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to_user.username, "bob");
        assert_eq!(sent[1].to_user.username, "carol");

        let received = db.messages_to("bob").unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].from_user.username, "alice");
        assert_eq!(received[0].from_user.phone, "+15551230001");
        assert_eq!(received[0].body, "hi bob");

        assert!(db.messages_to("alice").unwrap().is_empty());
    }

    #[test]
    fn history_is_in_insertion_order() {
        let db = setup();
        let first = db.create_message("alice", "bob", "one").unwrap();
        let second = db.create_message("alice", "bob", "two").unwrap();

        let sent = db.messages_from("alice").unwrap();
        let ids: Vec<_> = sent.iter().map(|m| m.id).collect();
        assert_eq!(ids, [first.id, second.id]);
    }
}
