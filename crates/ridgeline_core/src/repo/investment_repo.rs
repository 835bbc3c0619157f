//! Investment repository contract and SQLite implementation.
//!
//! # Invariants
//! - `amount` is written once at creation and never updated.
//! - Status changes touch `updated_at`.

use crate::model::investment::{Investment, InvestmentId, InvestmentStatus};
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const INVESTMENT_SELECT_SQL: &str = "SELECT
    uuid,
    investor_uuid,
    project_uuid,
    amount,
    status,
    date,
    notes
FROM investments";

/// Repository interface for investment records.
pub trait InvestmentRepository {
    /// Creates one investment and returns its stable id.
    fn create_investment(&self, investment: &Investment) -> RepoResult<InvestmentId>;
    /// Gets one investment by id.
    fn get_investment(&self, id: InvestmentId) -> RepoResult<Option<Investment>>;
    /// Updates only the lifecycle status of an investment.
    fn set_status(&self, id: InvestmentId, status: InvestmentStatus) -> RepoResult<()>;
    /// Lists investments belonging to one project, newest first.
    fn list_for_project(&self, project: ProjectId) -> RepoResult<Vec<Investment>>;
    /// Lists investments belonging to one investor, newest first.
    fn list_for_investor(&self, investor: InvestorId) -> RepoResult<Vec<Investment>>;
    /// Returns whether an investor row exists.
    fn investor_exists(&self, id: InvestorId) -> RepoResult<bool>;
    /// Returns whether a project row exists.
    fn project_exists(&self, id: ProjectId) -> RepoResult<bool>;
}

/// SQLite-backed investment repository.
pub struct SqliteInvestmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvestmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InvestmentRepository for SqliteInvestmentRepository<'_> {
    fn create_investment(&self, investment: &Investment) -> RepoResult<InvestmentId> {
        investment
            .validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;

        self.conn.execute(
            "INSERT INTO investments (uuid, investor_uuid, project_uuid, amount, status, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                investment.uuid.to_string(),
                investment.investor_uuid.to_string(),
                investment.project_uuid.to_string(),
                investment.amount,
                investment.status.as_db(),
                investment.date,
                investment.notes.as_deref(),
            ],
        )?;

        Ok(investment.uuid)
    }

    fn get_investment(&self, id: InvestmentId) -> RepoResult<Option<Investment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INVESTMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(investment_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn set_status(&self, id: InvestmentId, status: InvestmentStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE investments
             SET status = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![status.as_db(), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("investment", id));
        }
        Ok(())
    }

    fn list_for_project(&self, project: ProjectId) -> RepoResult<Vec<Investment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{INVESTMENT_SELECT_SQL} WHERE project_uuid = ?1 ORDER BY date DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([project.to_string()])?;
        let mut investments = Vec::new();
        while let Some(row) = rows.next()? {
            investments.push(investment_from_row(row)?);
        }
        Ok(investments)
    }

    fn list_for_investor(&self, investor: InvestorId) -> RepoResult<Vec<Investment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{INVESTMENT_SELECT_SQL} WHERE investor_uuid = ?1 ORDER BY date DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([investor.to_string()])?;
        let mut investments = Vec::new();
        while let Some(row) = rows.next()? {
            investments.push(investment_from_row(row)?);
        }
        Ok(investments)
    }

    fn investor_exists(&self, id: InvestorId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM investors WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn project_exists(&self, id: ProjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

/// Decodes one investment row, rejecting unknown status strings.
pub(crate) fn investment_from_row(row: &Row<'_>) -> RepoResult<Investment> {
    let uuid_text: String = row.get("uuid")?;
    let investor_text: String = row.get("investor_uuid")?;
    let project_text: String = row.get("project_uuid")?;
    let status_text: String = row.get("status")?;
    let status = InvestmentStatus::from_db(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown investment status `{status_text}`"))
    })?;

    Ok(Investment {
        uuid: parse_uuid(&uuid_text, "investments.uuid")?,
        investor_uuid: parse_uuid(&investor_text, "investments.investor_uuid")?,
        project_uuid: parse_uuid(&project_text, "investments.project_uuid")?,
        amount: row.get("amount")?,
        status,
        date: row.get("date")?,
        notes: row.get("notes")?,
    })
}
