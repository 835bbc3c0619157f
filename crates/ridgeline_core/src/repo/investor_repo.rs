//! Investor repository contract and SQLite implementation.

use crate::model::investor::{Investor, InvestorId, InvestorStatus};
use crate::repo::{bool_to_int, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const INVESTOR_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name,
    email,
    phone,
    status,
    portal_access
FROM investors";

/// Repository interface for investor records.
pub trait InvestorRepository {
    /// Creates one investor and returns its stable id.
    fn create_investor(&self, investor: &Investor) -> RepoResult<InvestorId>;
    /// Gets one investor by id.
    fn get_investor(&self, id: InvestorId) -> RepoResult<Option<Investor>>;
    /// Returns whether an investor row exists.
    fn investor_exists(&self, id: InvestorId) -> RepoResult<bool>;
}

/// SQLite-backed investor repository.
pub struct SqliteInvestorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvestorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InvestorRepository for SqliteInvestorRepository<'_> {
    fn create_investor(&self, investor: &Investor) -> RepoResult<InvestorId> {
        self.conn.execute(
            "INSERT INTO investors (uuid, first_name, last_name, email, phone, status, portal_access)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                investor.uuid.to_string(),
                investor.first_name.as_str(),
                investor.last_name.as_str(),
                investor.email.as_str(),
                investor.phone.as_deref(),
                investor.status.as_db(),
                bool_to_int(investor.portal_access),
            ],
        )?;

        Ok(investor.uuid)
    }

    fn get_investor(&self, id: InvestorId) -> RepoResult<Option<Investor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INVESTOR_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(investor_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn investor_exists(&self, id: InvestorId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM investors WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn investor_from_row(row: &Row<'_>) -> RepoResult<Investor> {
    let uuid_text: String = row.get("uuid")?;
    let status_text: String = row.get("status")?;
    let status = InvestorStatus::from_db(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown investor status `{status_text}`"))
    })?;
    let portal_access: i64 = row.get("portal_access")?;

    Ok(Investor {
        uuid: parse_uuid(&uuid_text, "investors.uuid")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        status,
        portal_access: portal_access != 0,
    })
}
