//! Distribution repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the distribution ledger and answer filtered ledger queries.
//! - Resolve the payable investments of a project for allocation runs.
//!
//! # Invariants
//! - Ledger queries join through `investments` so investor/project filters
//!   apply to the owning investment, not the distribution row.
//! - List ordering is `date DESC, uuid ASC` for stable pagination.

use crate::model::distribution::{Distribution, DistributionId, DistributionType};
use crate::model::investment::{Investment, InvestmentId, InvestmentStatus};
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use crate::repo::investment_repo::investment_from_row;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const LEDGER_SELECT_SQL: &str = "SELECT
    d.uuid AS uuid,
    d.investment_uuid AS investment_uuid,
    d.amount AS amount,
    d.type AS type,
    d.date AS date,
    d.notes AS notes,
    i.investor_uuid AS investor_uuid,
    i.project_uuid AS project_uuid
FROM distributions d
INNER JOIN investments i ON i.uuid = d.investment_uuid";

const LEDGER_DEFAULT_LIMIT: u32 = 20;
const LEDGER_LIMIT_MAX: u32 = 100;

/// One ledger row with its owning investor/project identities.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow {
    pub distribution: Distribution,
    pub investor_uuid: InvestorId,
    pub project_uuid: ProjectId,
}

/// Query options for ledger list/summary use-cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionListQuery {
    pub investor: Option<InvestorId>,
    pub project: Option<ProjectId>,
    pub kind: Option<DistributionType>,
    /// Inclusive lower bound on `date`, epoch ms.
    pub from_date: Option<i64>,
    /// Inclusive upper bound on `date`, epoch ms.
    pub to_date: Option<i64>,
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Per-type aggregate over the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSummary {
    pub kind: DistributionType,
    pub total_amount: f64,
    pub count: u32,
}

/// Aggregate totals over the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionSummary {
    pub by_type: Vec<TypeSummary>,
    pub total_amount: f64,
    pub total_count: u32,
}

/// Repository interface for the distribution ledger.
pub trait DistributionRepository {
    /// Creates one distribution and returns its stable id.
    fn create_distribution(&self, distribution: &Distribution) -> RepoResult<DistributionId>;
    /// Gets one ledger row by id.
    fn get_distribution(&self, id: DistributionId) -> RepoResult<Option<DistributionRow>>;
    /// Applies a partial edit to one distribution.
    fn update_distribution(&self, id: DistributionId, patch: &DistributionPatch)
        -> RepoResult<()>;
    /// Removes one distribution unconditionally.
    fn delete_distribution(&self, id: DistributionId) -> RepoResult<()>;
    /// Lists ledger rows using filters + pagination.
    fn list_distributions(&self, query: &DistributionListQuery)
        -> RepoResult<Vec<DistributionRow>>;
    /// Aggregates the ledger per type plus grand totals.
    fn summarize(&self, query: &DistributionListQuery) -> RepoResult<DistributionSummary>;
    /// Investments of a project whose status permits receiving a payout.
    fn payable_investments(&self, project: ProjectId) -> RepoResult<Vec<Investment>>;
    /// Gets one investment by id (manual-entry validation path).
    fn get_investment(&self, id: InvestmentId) -> RepoResult<Option<Investment>>;
}

/// Partial edit for a distribution. Unset fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionPatch {
    pub amount: Option<f64>,
    pub kind: Option<DistributionType>,
    pub date: Option<i64>,
    pub notes: Option<String>,
}

/// SQLite-backed distribution repository.
pub struct SqliteDistributionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDistributionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DistributionRepository for SqliteDistributionRepository<'_> {
    fn create_distribution(&self, distribution: &Distribution) -> RepoResult<DistributionId> {
        self.conn.execute(
            "INSERT INTO distributions (uuid, investment_uuid, amount, type, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                distribution.uuid.to_string(),
                distribution.investment_uuid.to_string(),
                distribution.amount,
                distribution.kind.as_db(),
                distribution.date,
                distribution.notes.as_deref(),
            ],
        )?;

        Ok(distribution.uuid)
    }

    fn get_distribution(&self, id: DistributionId) -> RepoResult<Option<DistributionRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LEDGER_SELECT_SQL} WHERE d.uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(ledger_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_distribution(
        &self,
        id: DistributionId,
        patch: &DistributionPatch,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE distributions
             SET
                amount = COALESCE(?1, amount),
                type = COALESCE(?2, type),
                date = COALESCE(?3, date),
                notes = COALESCE(?4, notes),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                patch.amount,
                patch.kind.map(DistributionType::as_db),
                patch.date,
                patch.notes.as_deref(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("distribution", id));
        }
        Ok(())
    }

    fn delete_distribution(&self, id: DistributionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM distributions WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::not_found("distribution", id));
        }
        Ok(())
    }

    fn list_distributions(
        &self,
        query: &DistributionListQuery,
    ) -> RepoResult<Vec<DistributionRow>> {
        let (filter_sql, mut bind_values) = build_ledger_filter(query);
        let mut sql = format!("{LEDGER_SELECT_SQL}{filter_sql} ORDER BY d.date DESC, d.uuid ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_ledger_limit(
            query.limit,
        ))));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut ledger = Vec::new();
        while let Some(row) = rows.next()? {
            ledger.push(ledger_row(row)?);
        }
        Ok(ledger)
    }

    fn summarize(&self, query: &DistributionListQuery) -> RepoResult<DistributionSummary> {
        let (filter_sql, bind_values) = build_ledger_filter(query);
        let sql = format!(
            "SELECT d.type AS type, SUM(d.amount) AS total_amount, COUNT(d.uuid) AS row_count
             FROM distributions d
             INNER JOIN investments i ON i.uuid = d.investment_uuid{filter_sql}
             GROUP BY d.type
             ORDER BY d.type ASC;"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summary = DistributionSummary::default();
        while let Some(row) = rows.next()? {
            let type_text: String = row.get("type")?;
            let kind = DistributionType::from_db(&type_text).ok_or_else(|| {
                RepoError::InvalidData(format!("unknown distribution type `{type_text}`"))
            })?;
            let total_amount: f64 = row.get("total_amount")?;
            let count: u32 = row.get("row_count")?;
            summary.total_amount += total_amount;
            summary.total_count += count;
            summary.by_type.push(TypeSummary {
                kind,
                total_amount,
                count,
            });
        }
        Ok(summary)
    }

    fn payable_investments(&self, project: ProjectId) -> RepoResult<Vec<Investment>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, investor_uuid, project_uuid, amount, status, date, notes
             FROM investments
             WHERE project_uuid = ?1 AND status IN (?2, ?3, ?4)
             ORDER BY date ASC, uuid ASC;",
        )?;
        let [first, second, third] = InvestmentStatus::PAYABLE.map(InvestmentStatus::as_db);
        let mut rows = stmt.query(params![project.to_string(), first, second, third])?;
        let mut investments = Vec::new();
        while let Some(row) = rows.next()? {
            investments.push(investment_from_row(row)?);
        }
        Ok(investments)
    }

    fn get_investment(&self, id: InvestmentId) -> RepoResult<Option<Investment>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, investor_uuid, project_uuid, amount, status, date, notes
             FROM investments
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(investment_from_row(row)?)),
            None => Ok(None),
        }
    }
}

/// Normalizes list limit according to the ledger contract.
pub fn normalize_ledger_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => LEDGER_DEFAULT_LIMIT,
        Some(value) if value > LEDGER_LIMIT_MAX => LEDGER_LIMIT_MAX,
        Some(value) => value,
        None => LEDGER_DEFAULT_LIMIT,
    }
}

fn build_ledger_filter(query: &DistributionListQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(investor) = query.investor {
        sql.push_str(" AND i.investor_uuid = ?");
        bind_values.push(Value::Text(investor.to_string()));
    }
    if let Some(project) = query.project {
        sql.push_str(" AND i.project_uuid = ?");
        bind_values.push(Value::Text(project.to_string()));
    }
    if let Some(kind) = query.kind {
        sql.push_str(" AND d.type = ?");
        bind_values.push(Value::Text(kind.as_db().to_string()));
    }
    if let Some(from_date) = query.from_date {
        sql.push_str(" AND d.date >= ?");
        bind_values.push(Value::Integer(from_date));
    }
    if let Some(to_date) = query.to_date {
        sql.push_str(" AND d.date <= ?");
        bind_values.push(Value::Integer(to_date));
    }

    (sql, bind_values)
}

fn ledger_row(row: &Row<'_>) -> RepoResult<DistributionRow> {
    let uuid_text: String = row.get("uuid")?;
    let investment_text: String = row.get("investment_uuid")?;
    let investor_text: String = row.get("investor_uuid")?;
    let project_text: String = row.get("project_uuid")?;
    let type_text: String = row.get("type")?;
    let kind = DistributionType::from_db(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown distribution type `{type_text}`"))
    })?;

    Ok(DistributionRow {
        distribution: Distribution {
            uuid: parse_uuid(&uuid_text, "distributions.uuid")?,
            investment_uuid: parse_uuid(&investment_text, "distributions.investment_uuid")?,
            amount: row.get("amount")?,
            kind,
            date: row.get("date")?,
            notes: row.get("notes")?,
        },
        investor_uuid: parse_uuid(&investor_text, "investments.investor_uuid")?,
        project_uuid: parse_uuid(&project_text, "investments.project_uuid")?,
    })
}
