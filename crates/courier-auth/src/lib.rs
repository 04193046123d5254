use anyhow::Result;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 30;

/// Claims embedded in every issued token. `sub` is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Password hashing and token signing, configured once at startup.
///
/// The signing secret and the Argon2id work-factor parameters are fixed
/// for the life of the process; rotating the secret invalidates every
/// previously issued token.
pub struct CredentialService {
    secret: String,
    hasher: Argon2<'static>,
}

impl CredentialService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            hasher: Argon2::default(),
        }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Two calls with the same plaintext produce different PHC strings;
    /// both verify against that plaintext.
    pub fn hash_password(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?;
        Ok(hash.to_string())
    }

    /// True iff `plaintext` matches `stored`. A mismatch or a stored
    /// value that does not parse as a PHC string both return false —
    /// this never errors on bad input.
    pub fn verify_password(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.hasher
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Issue a signed token for `username`.
    pub fn issue_token(&self, username: &str) -> Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a token's signature and expiry, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CredentialService {
        CredentialService::new("test-secret")
    }

    #[test]
    fn hash_then_verify() {
        let creds = service();
        let hash = creds.hash_password("hunter2").unwrap();
        assert!(creds.verify_password("hunter2", &hash));
        assert!(!creds.verify_password("hunter3", &hash));
    }

    #[test]
    fn fresh_salt_every_call() {
        let creds = service();
        let a = creds.hash_password("hunter2").unwrap();
        let b = creds.hash_password("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(creds.verify_password("hunter2", &a));
        assert!(creds.verify_password("hunter2", &b));
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        let creds = service();
        assert!(!creds.verify_password("hunter2", "not-a-phc-string"));
        assert!(!creds.verify_password("hunter2", ""));
    }

    #[test]
    fn token_roundtrip() {
        let creds = service();
        let token = creds.issue_token("alice").unwrap();
        let claims = creds.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = service().issue_token("alice").unwrap();
        let other = CredentialService::new("different-secret");
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn tampered_token_rejected() {
        let creds = service();
        let mut token = creds.issue_token("alice").unwrap();
        token.push('x');
        assert!(creds.verify_token(&token).is_err());
    }
}
