use std::collections::HashMap;
use std::sync::RwLock;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};

use super::Session;
use crate::crypto::SessionKey;
use crate::error::{AppError, Result};
use crate::models::User;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Storage backend for sessions, keyed by the hashed session id.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: &Session) -> Result<()>;

    /// Expired sessions are reported as absent.
    fn get(&self, id_hash: &str, now: i64) -> Result<Option<Session>>;

    fn update_tokens(
        &self,
        id_hash: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool>;

    fn delete(&self, id_hash: &str) -> Result<bool>;

    /// Remove sessions that expired at or before `now`. Returns how many were removed.
    fn purge_expired(&self, now: i64) -> Result<usize>;
}

/// In-memory store. Sessions are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::Internal("Session store lock poisoned".into())
}

impl SessionStore for MemorySessionStore {
    fn insert(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .insert(session.id_hash.clone(), session.clone());
        Ok(())
    }

    fn get(&self, id_hash: &str, now: i64) -> Result<Option<Session>> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions
            .get(id_hash)
            .filter(|s| !s.is_expired(now))
            .cloned())
    }

    fn update_tokens(
        &self,
        id_hash: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        match sessions.get_mut(id_hash) {
            Some(session) => {
                session.access_token = access_token.to_string();
                if let Some(rt) = refresh_token {
                    session.refresh_token = Some(rt.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id_hash: &str) -> Result<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(|_| poisoned())?
            .remove(id_hash)
            .is_some())
    }

    fn purge_expired(&self, now: i64) -> Result<usize> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok(before - sessions.len())
    }
}

pub fn init_session_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_json TEXT NOT NULL,
            access_token TEXT NOT NULL,
            refresh_token TEXT,
            csrf_token TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);",
    )?;
    Ok(())
}

/// SQLite-backed store. Access and refresh tokens are encrypted at rest.
pub struct SqliteSessionStore {
    pool: DbPool,
    key: SessionKey,
}

impl SqliteSessionStore {
    pub fn new(pool: DbPool, key: SessionKey) -> Result<Self> {
        let conn = pool.get()?;
        init_session_db(&conn)?;
        drop(conn);
        Ok(Self { pool, key })
    }

    pub fn open(path: &str, key: SessionKey) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(8).build(manager)?;
        Self::new(pool, key)
    }
}

struct SessionRow {
    id: String,
    user_json: String,
    access_token: String,
    refresh_token: Option<String>,
    csrf_token: String,
    created_at: i64,
    expires_at: i64,
}

impl SessionStore for SqliteSessionStore {
    fn insert(&self, session: &Session) -> Result<()> {
        let conn = self.pool.get()?;
        let refresh = session
            .refresh_token
            .as_deref()
            .map(|t| self.key.encrypt(t))
            .transpose()?;
        conn.execute(
            "INSERT INTO sessions (id, user_json, access_token, refresh_token, csrf_token, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &session.id_hash,
                serde_json::to_string(&session.user)?,
                self.key.encrypt(&session.access_token)?,
                refresh,
                &session.csrf_token,
                session.created_at,
                session.expires_at,
            ],
        )?;
        Ok(())
    }

    fn get(&self, id_hash: &str, now: i64) -> Result<Option<Session>> {
        let conn = self.pool.get()?;
        let row = conn
            .query_row(
                "SELECT id, user_json, access_token, refresh_token, csrf_token, created_at, expires_at
                 FROM sessions WHERE id = ?1 AND expires_at > ?2",
                params![id_hash, now],
                |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        user_json: row.get(1)?,
                        access_token: row.get(2)?,
                        refresh_token: row.get(3)?,
                        csrf_token: row.get(4)?,
                        created_at: row.get(5)?,
                        expires_at: row.get(6)?,
                    })
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user: User = serde_json::from_str(&row.user_json)?;
        Ok(Some(Session {
            id_hash: row.id,
            user,
            access_token: self.key.decrypt(&row.access_token)?,
            refresh_token: row
                .refresh_token
                .as_deref()
                .map(|t| self.key.decrypt(t))
                .transpose()?,
            csrf_token: row.csrf_token,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }))
    }

    fn update_tokens(
        &self,
        id_hash: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool> {
        let conn = self.pool.get()?;
        let access = self.key.encrypt(access_token)?;
        let affected = match refresh_token {
            Some(rt) => conn.execute(
                "UPDATE sessions SET access_token = ?1, refresh_token = ?2 WHERE id = ?3",
                params![access, self.key.encrypt(rt)?, id_hash],
            )?,
            None => conn.execute(
                "UPDATE sessions SET access_token = ?1 WHERE id = ?2",
                params![access, id_hash],
            )?,
        };
        Ok(affected > 0)
    }

    fn delete(&self, id_hash: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let affected = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id_hash])?;
        Ok(affected > 0)
    }

    fn purge_expired(&self, now: i64) -> Result<usize> {
        let conn = self.pool.get()?;
        let purged = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
        Ok(purged)
    }
}
