//! Portal session use-case service.
//!
//! # Responsibility
//! - Issue, resolve and revoke opaque portal session tokens.
//!
//! # Invariants
//! - Tokens are persisted with an absolute expiry, never held in process
//!   memory, so sessions survive restarts and scale across instances.
//! - Only investors with portal access may open a session.

use crate::model::investor::InvestorId;
use crate::repo::session_repo::{PortalSession, SessionRepository};
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for portal session use-cases.
#[derive(Debug)]
pub enum SessionServiceError {
    InvestorNotFound(InvestorId),
    /// The investor exists but portal access is switched off.
    PortalAccessDisabled(InvestorId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for SessionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvestorNotFound(id) => write!(f, "investor not found: {id}"),
            Self::PortalAccessDisabled(id) => {
                write!(f, "portal access disabled for investor {id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SessionServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Portal session facade over repository implementations.
pub struct SessionService<R: SessionRepository> {
    repo: R,
}

impl<R: SessionRepository> SessionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Opens a session for an investor with portal access.
    ///
    /// Returns the persisted session whose opaque token expires
    /// `ttl_ms` after `now_ms`.
    pub fn open(
        &self,
        investor: InvestorId,
        now_ms: i64,
        ttl_ms: i64,
    ) -> Result<PortalSession, SessionServiceError> {
        match self.repo.investor_portal_access(investor)? {
            None => return Err(SessionServiceError::InvestorNotFound(investor)),
            Some(false) => return Err(SessionServiceError::PortalAccessDisabled(investor)),
            Some(true) => {}
        }

        let session = PortalSession {
            token: Uuid::new_v4(),
            investor_uuid: investor,
            expires_at: now_ms + ttl_ms,
        };
        self.repo.insert_session(&session)?;
        Ok(session)
    }

    /// Resolves an unexpired token to its investor.
    ///
    /// Expired or unknown tokens resolve to `None`; they are
    /// indistinguishable to the caller.
    pub fn resolve(&self, token: Uuid, now_ms: i64) -> RepoResult<Option<InvestorId>> {
        self.repo.resolve(token, now_ms)
    }

    /// Revokes one session; returns whether a row existed.
    pub fn close(&self, token: Uuid) -> RepoResult<bool> {
        self.repo.delete_session(token)
    }

    /// Removes all expired sessions; returns how many were purged.
    pub fn purge_expired(&self, now_ms: i64) -> RepoResult<u32> {
        self.repo.purge_expired(now_ms)
    }
}
