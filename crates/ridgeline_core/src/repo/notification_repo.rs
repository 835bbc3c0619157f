//! Notification repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist investor notifications and answer inbox queries.
//! - Resolve the investment/project context needed to word dispatch
//!   messages.
//!
//! # Invariants
//! - Rows are append-only except for the unread → read transition.
//! - `mark_as_read` is scoped to the owning investor.

use crate::model::investment::InvestmentId;
use crate::model::investor::InvestorId;
use crate::model::notification::{Notification, NotificationId, NotificationType};
use crate::model::project::ProjectId;
use crate::repo::{bool_to_int, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    uuid,
    investor_uuid,
    type,
    title,
    message,
    link,
    project_uuid,
    investment_uuid,
    document_uuid,
    read,
    read_at
FROM notifications";

/// Investment identity joined with the names dispatch messages need.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentContext {
    pub investment_uuid: InvestmentId,
    pub investor_uuid: InvestorId,
    pub project_uuid: ProjectId,
    pub project_name: String,
}

/// Repository interface for investor notifications.
pub trait NotificationRepository {
    /// Inserts one notification row.
    fn create_notification(&self, notification: &Notification) -> RepoResult<NotificationId>;
    /// Returns whether an investor row exists.
    fn investor_exists(&self, id: InvestorId) -> RepoResult<bool>;
    /// Lists one investor's notifications, newest first.
    fn list_for_investor(
        &self,
        investor: InvestorId,
        limit: u32,
    ) -> RepoResult<Vec<Notification>>;
    /// Counts one investor's unread notifications.
    fn unread_count(&self, investor: InvestorId) -> RepoResult<u32>;
    /// Marks one notification read, scoped to the owning investor.
    fn mark_as_read(&self, id: NotificationId, investor: InvestorId) -> RepoResult<()>;
    /// Marks all unread notifications read; returns how many changed.
    fn mark_all_as_read(&self, investor: InvestorId) -> RepoResult<u32>;
    /// Resolves the owning investment/project context for dispatch wording.
    fn investment_context(&self, investment: InvestmentId)
        -> RepoResult<Option<InvestmentContext>>;
    /// Resolves a project's display name.
    fn project_name(&self, project: ProjectId) -> RepoResult<Option<String>>;
    /// Distinct investors holding investments in a project.
    fn project_investors(&self, project: ProjectId) -> RepoResult<Vec<InvestorId>>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn create_notification(&self, notification: &Notification) -> RepoResult<NotificationId> {
        self.conn.execute(
            "INSERT INTO notifications
                (uuid, investor_uuid, type, title, message, link,
                 project_uuid, investment_uuid, document_uuid, read, read_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                notification.uuid.to_string(),
                notification.investor_uuid.to_string(),
                notification.kind.as_db(),
                notification.title.as_str(),
                notification.message.as_str(),
                notification.link.as_deref(),
                notification.project_uuid.map(|id| id.to_string()),
                notification.investment_uuid.map(|id| id.to_string()),
                notification.document_uuid.map(|id| id.to_string()),
                bool_to_int(notification.read),
                notification.read_at,
            ],
        )?;

        Ok(notification.uuid)
    }

    fn investor_exists(&self, id: InvestorId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM investors WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_for_investor(
        &self,
        investor: InvestorId,
        limit: u32,
    ) -> RepoResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTIFICATION_SELECT_SQL}
             WHERE investor_uuid = ?1
             ORDER BY created_at DESC, uuid ASC
             LIMIT ?2;"
        ))?;
        let mut rows = stmt.query(params![investor.to_string(), limit])?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next()? {
            notifications.push(notification_from_row(row)?);
        }
        Ok(notifications)
    }

    fn unread_count(&self, investor: InvestorId) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE investor_uuid = ?1 AND read = 0;",
            [investor.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn mark_as_read(&self, id: NotificationId, investor: InvestorId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notifications
             SET read = 1, read_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1 AND investor_uuid = ?2;",
            params![id.to_string(), investor.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("notification", id));
        }
        Ok(())
    }

    fn mark_all_as_read(&self, investor: InvestorId) -> RepoResult<u32> {
        let changed = self.conn.execute(
            "UPDATE notifications
             SET read = 1, read_at = (strftime('%s', 'now') * 1000)
             WHERE investor_uuid = ?1 AND read = 0;",
            [investor.to_string()],
        )?;
        Ok(changed as u32)
    }

    fn investment_context(
        &self,
        investment: InvestmentId,
    ) -> RepoResult<Option<InvestmentContext>> {
        let context = self
            .conn
            .query_row(
                "SELECT i.uuid AS investment_uuid,
                        i.investor_uuid AS investor_uuid,
                        i.project_uuid AS project_uuid,
                        p.name AS project_name
                 FROM investments i
                 INNER JOIN projects p ON p.uuid = i.project_uuid
                 WHERE i.uuid = ?1;",
                [investment.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>("investment_uuid")?,
                        row.get::<_, String>("investor_uuid")?,
                        row.get::<_, String>("project_uuid")?,
                        row.get::<_, String>("project_name")?,
                    ))
                },
            )
            .optional()?;

        match context {
            Some((investment_text, investor_text, project_text, project_name)) => {
                Ok(Some(InvestmentContext {
                    investment_uuid: parse_uuid(&investment_text, "investments.uuid")?,
                    investor_uuid: parse_uuid(&investor_text, "investments.investor_uuid")?,
                    project_uuid: parse_uuid(&project_text, "investments.project_uuid")?,
                    project_name,
                }))
            }
            None => Ok(None),
        }
    }

    fn project_name(&self, project: ProjectId) -> RepoResult<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM projects WHERE uuid = ?1;",
                [project.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(name)
    }

    fn project_investors(&self, project: ProjectId) -> RepoResult<Vec<InvestorId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT investor_uuid
             FROM investments
             WHERE project_uuid = ?1
             ORDER BY investor_uuid ASC;",
        )?;
        let mut rows = stmt.query([project.to_string()])?;
        let mut investors = Vec::new();
        while let Some(row) = rows.next()? {
            let investor_text: String = row.get(0)?;
            investors.push(parse_uuid(&investor_text, "investments.investor_uuid")?);
        }
        Ok(investors)
    }
}

fn notification_from_row(row: &Row<'_>) -> RepoResult<Notification> {
    let uuid_text: String = row.get("uuid")?;
    let investor_text: String = row.get("investor_uuid")?;
    let type_text: String = row.get("type")?;
    let kind = NotificationType::from_db(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown notification type `{type_text}`"))
    })?;
    let read: i64 = row.get("read")?;

    let optional_uuid = |column: &str| -> RepoResult<Option<uuid::Uuid>> {
        let value: Option<String> = row.get(column)?;
        value.as_deref().map(|text| parse_uuid(text, column)).transpose()
    };

    Ok(Notification {
        uuid: parse_uuid(&uuid_text, "notifications.uuid")?,
        investor_uuid: parse_uuid(&investor_text, "notifications.investor_uuid")?,
        kind,
        title: row.get("title")?,
        message: row.get("message")?,
        link: row.get("link")?,
        project_uuid: optional_uuid("project_uuid")?,
        investment_uuid: optional_uuid("investment_uuid")?,
        document_uuid: optional_uuid("document_uuid")?,
        read: read != 0,
        read_at: row.get("read_at")?,
    })
}
