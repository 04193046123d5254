use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use courier_auth::CredentialService;
use courier_types::models::{LoginStamp, UserDetail, UserSummary};

use crate::Database;
use crate::error::DomainError;
use crate::models::UserRow;

impl Database {
    /// Register a new user. The plaintext password is hashed before it
    /// touches storage; the returned record never includes the hash.
    ///
    /// A duplicate username surfaces as `Conflict` (the storage layer's
    /// primary-key constraint is the uniqueness authority).
    pub fn register(
        &self,
        creds: &CredentialService,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<UserDetail, DomainError> {
        let password_hash = creds
            .hash_password(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let join_at = Utc::now();

        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password, first_name, last_name, phone, join_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![username, password_hash, first_name, last_name, phone, join_at],
            );

            match inserted {
                Ok(_) => Ok(UserDetail {
                    username: username.to_string(),
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    phone: phone.to_string(),
                    join_at,
                    last_login_at: None,
                }),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Err(DomainError::Conflict(format!(
                        "username already taken: {}",
                        username
                    )))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Is this username/password pair valid? Pure predicate: an unknown
    /// username and a wrong password are both `Ok(false)`, so callers
    /// cannot enumerate accounts through this path. Token issuance and
    /// the login-timestamp update belong to the caller, after a `true`.
    pub fn authenticate(
        &self,
        creds: &CredentialService,
        username: &str,
        password: &str,
    ) -> Result<bool, DomainError> {
        let row = self.with_conn(|conn| Ok(query_user(conn, username)?))?;

        match row {
            Some(user) => Ok(creds.verify_password(password, &user.password)),
            None => Ok(false),
        }
    }

    /// Stamp a successful login. `NotFound` if the user does not exist.
    pub fn update_login_timestamp(&self, username: &str) -> Result<LoginStamp, DomainError> {
        let now = Utc::now();

        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE users SET last_login_at = ?1 WHERE username = ?2",
                rusqlite::params![now, username],
            )?;

            if updated == 0 {
                return Err(DomainError::NotFound(format!("no such user: {}", username)));
            }

            Ok(LoginStamp {
                username: username.to_string(),
                last_login_at: now,
            })
        })
    }

    /// Full directory listing, ascending by username.
    pub fn all_users(&self) -> Result<Vec<UserSummary>, DomainError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, first_name, last_name FROM users ORDER BY username",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(UserSummary {
                        username: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_user(&self, username: &str) -> Result<UserDetail, DomainError> {
        let row = self.with_conn(|conn| Ok(query_user(conn, username)?))?;

        let user =
            row.ok_or_else(|| DomainError::NotFound(format!("no such user: {}", username)))?;

        Ok(UserDetail {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            join_at: user.join_at,
            last_login_at: user.last_login_at,
        })
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT username, password, first_name, last_name, phone, join_at, last_login_at
         FROM users WHERE username = ?1",
    )?;

    stmt.query_row([username], |row| {
        Ok(UserRow {
            username: row.get(0)?,
            password: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            phone: row.get(4)?,
            join_at: row.get(5)?,
            last_login_at: row.get(6)?,
        })
    })
    .optional()
}

pub(crate) fn user_exists(conn: &Connection, username: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT 1 FROM users WHERE username = ?1",
        [username],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Database, CredentialService) {
        let db = Database::open_in_memory().unwrap();
        let creds = CredentialService::new("test-secret");
        (db, creds)
    }

    fn register_alice(db: &Database, creds: &CredentialService) -> UserDetail {
        db.register(creds, "alice", "password1", "Alice", "Archer", "+15551230001")
            .unwrap()
    }

    #[test]
    fn register_returns_profile_without_hash() {
        let (db, creds) = setup();
        let user = register_alice(&db, &creds);

        assert_eq!(user.username, "alice");
        assert_eq!(user.first_name, "Alice");
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let (db, creds) = setup();
        register_alice(&db, &creds);

        let second = db.register(&creds, "alice", "other", "Al", "Ice", "+15551230002");
        assert!(matches!(second, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn authenticate_is_a_pure_predicate() {
        let (db, creds) = setup();
        register_alice(&db, &creds);

        assert!(db.authenticate(&creds, "alice", "password1").unwrap());
        assert!(!db.authenticate(&creds, "alice", "wrong").unwrap());
        // Unknown user is a plain false, never an error
        assert!(!db.authenticate(&creds, "nobody", "password1").unwrap());
    }

    #[test]
    fn login_timestamp_updates() {
        let (db, creds) = setup();
        register_alice(&db, &creds);

        let stamp = db.update_login_timestamp("alice").unwrap();
        assert_eq!(stamp.username, "alice");

        let user = db.get_user("alice").unwrap();
        assert_eq!(user.last_login_at, Some(stamp.last_login_at));
    }

    #[test]
    fn login_timestamp_for_unknown_user_is_not_found() {
        let (db, _) = setup();
        let result = db.update_login_timestamp("nobody");
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn all_users_sorted_by_username() {
        let (db, creds) = setup();
        db.register(&creds, "carol", "pw", "Carol", "Cole", "+15551230003")
            .unwrap();
        db.register(&creds, "alice", "pw", "Alice", "Archer", "+15551230001")
            .unwrap();
        db.register(&creds, "bob", "pw", "Bob", "Baker", "+15551230002")
            .unwrap();

        let users = db.all_users().unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[test]
    fn get_unknown_user_is_not_found() {
        let (db, _) = setup();
        assert!(matches!(
            db.get_user("nobody"),
            Err(DomainError::NotFound(_))
        ));
    }
}
