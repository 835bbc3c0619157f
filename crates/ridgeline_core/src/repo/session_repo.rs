//! Portal session repository contract and SQLite implementation.
//!
//! # Invariants
//! - A session token maps to exactly one investor with an absolute expiry.
//! - Expired rows are treated as absent by `resolve`; `purge_expired`
//!   reclaims them.

use crate::model::investor::InvestorId;
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// One issued portal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSession {
    pub token: Uuid,
    pub investor_uuid: InvestorId,
    /// Absolute expiry in epoch milliseconds.
    pub expires_at: i64,
}

/// Repository interface for portal sessions.
pub trait SessionRepository {
    /// Persists one issued session.
    fn insert_session(&self, session: &PortalSession) -> RepoResult<()>;
    /// Resolves an unexpired token to its investor.
    fn resolve(&self, token: Uuid, now_ms: i64) -> RepoResult<Option<InvestorId>>;
    /// Deletes one session; returns whether a row existed.
    fn delete_session(&self, token: Uuid) -> RepoResult<bool>;
    /// Deletes all expired sessions; returns how many were removed.
    fn purge_expired(&self, now_ms: i64) -> RepoResult<u32>;
    /// Looks up an investor's portal-access flag.
    fn investor_portal_access(&self, id: InvestorId) -> RepoResult<Option<bool>>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn insert_session(&self, session: &PortalSession) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO portal_sessions (token, investor_uuid, expires_at)
             VALUES (?1, ?2, ?3);",
            params![
                session.token.to_string(),
                session.investor_uuid.to_string(),
                session.expires_at,
            ],
        )?;
        Ok(())
    }

    fn resolve(&self, token: Uuid, now_ms: i64) -> RepoResult<Option<InvestorId>> {
        let investor = self
            .conn
            .query_row(
                "SELECT investor_uuid FROM portal_sessions
                 WHERE token = ?1 AND expires_at > ?2;",
                params![token.to_string(), now_ms],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        investor
            .as_deref()
            .map(|text| parse_uuid(text, "portal_sessions.investor_uuid"))
            .transpose()
    }

    fn delete_session(&self, token: Uuid) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM portal_sessions WHERE token = ?1;",
            [token.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn purge_expired(&self, now_ms: i64) -> RepoResult<u32> {
        let changed = self.conn.execute(
            "DELETE FROM portal_sessions WHERE expires_at <= ?1;",
            [now_ms],
        )?;
        Ok(changed as u32)
    }

    fn investor_portal_access(&self, id: InvestorId) -> RepoResult<Option<bool>> {
        let access = self
            .conn
            .query_row(
                "SELECT portal_access FROM investors WHERE uuid = ?1;",
                [id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(access.map(|value| value != 0))
    }
}
