//! Signed-in staff sessions.
//!
//! The browser only ever sees a random session id in an HttpOnly cookie;
//! the access/refresh tokens issued by the identity service stay on the
//! server.

mod store;

pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore, init_session_db};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use serde::Deserialize;

use crate::crypto::{constant_time_eq, hash_secret, random_token};
use crate::models::{TokenPair, User};

pub const SESSION_COOKIE: &str = "paydesk_session";

const SESSION_ID_BYTES: usize = 32;
const CSRF_TOKEN_BYTES: usize = 24;
/// Refresh the access token when it expires within this many seconds.
pub const REFRESH_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// SHA-256 of the cookie value
    pub id_hash: String,
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub csrf_token: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Session {
    /// Start a session. Returns the raw id for the cookie alongside the session.
    pub fn start(user: User, tokens: TokenPair, ttl_hours: i64) -> (String, Session) {
        let raw_id = random_token(SESSION_ID_BYTES);
        let now = Utc::now().timestamp();
        let session = Session {
            id_hash: hash_secret(&raw_id),
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            csrf_token: random_token(CSRF_TOKEN_BYTES),
            created_at: now,
            expires_at: now + ttl_hours * 3600,
        };
        (raw_id, session)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    pub fn verify_csrf(&self, submitted: &str) -> bool {
        !submitted.is_empty() && constant_time_eq(&self.csrf_token, submitted)
    }

    /// True when the access token is about to expire and a refresh token is on hand.
    pub fn needs_refresh(&self, now: i64) -> bool {
        self.refresh_token.is_some()
            && token_expiry(&self.access_token)
                .is_some_and(|exp| exp - now <= REFRESH_LEEWAY_SECS)
    }
}

#[derive(Deserialize)]
struct ExpClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying its signature.
///
/// Tokens that aren't JWTs (or lack `exp`) yield `None`.
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<ExpClaim>(&bytes).ok()?.exp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{}}}"#, exp));
        format!("{}.{}.sig", header, payload)
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "staff@example.com".into(),
            name: "Staff".into(),
            role: "admin".into(),
            is_super_admin: false,
        }
    }

    #[test]
    fn test_token_expiry() {
        assert_eq!(token_expiry(&jwt_with_exp(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(token_expiry("opaque-token"), None);
        assert_eq!(token_expiry("a.!!!.c"), None);
    }

    #[test]
    fn test_session_start() {
        let tokens = TokenPair {
            access_token: "at".into(),
            refresh_token: Some("rt".into()),
        };
        let (raw, session) = Session::start(user(), tokens, 12);
        assert_eq!(session.id_hash, hash_secret(&raw));
        assert_eq!(session.expires_at - session.created_at, 12 * 3600);
        assert!(!session.is_expired(session.created_at));
        assert!(session.is_expired(session.expires_at));
    }

    #[test]
    fn test_csrf_check() {
        let (_, session) = Session::start(
            user(),
            TokenPair { access_token: "at".into(), refresh_token: None },
            1,
        );
        assert!(session.verify_csrf(&session.csrf_token.clone()));
        assert!(!session.verify_csrf("forged"));
        assert!(!session.verify_csrf(""));
    }

    #[test]
    fn test_needs_refresh() {
        let now = 1_700_000_000;
        let (_, mut session) = Session::start(
            user(),
            TokenPair {
                access_token: jwt_with_exp(now + 30),
                refresh_token: Some("rt".into()),
            },
            1,
        );
        assert!(session.needs_refresh(now));

        session.access_token = jwt_with_exp(now + 3600);
        assert!(!session.needs_refresh(now));

        session.access_token = jwt_with_exp(now - 10);
        session.refresh_token = None;
        assert!(!session.needs_refresh(now));
    }
}
