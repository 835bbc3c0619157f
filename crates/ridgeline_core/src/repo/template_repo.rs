//! Document template repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist template records, including the declared-variables JSON column.
//! - Own the content-change version bump inside the patch UPDATE.
//!
//! # Invariants
//! - `version` increments by exactly 1 iff a patched `content` differs from
//!   the stored content by exact string comparison.
//! - Patch fields left unset keep their stored values.

use crate::model::template::{Template, TemplateCategory, TemplateId, TemplatePatch};
use crate::repo::{bool_to_int, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TEMPLATE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    category,
    content,
    variables,
    is_active,
    version
FROM document_templates";

const TEMPLATES_DEFAULT_LIMIT: u32 = 20;
const TEMPLATES_LIMIT_MAX: u32 = 100;

/// Query options for template list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateListQuery {
    /// Optional category exact-match filter.
    pub category: Option<TemplateCategory>,
    /// Optional active-flag filter.
    pub active: Option<bool>,
    /// Optional case-insensitive substring match over name/description.
    pub search: Option<String>,
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for document templates.
pub trait TemplateRepository {
    /// Creates one template and returns its stable id.
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId>;
    /// Gets one template by id.
    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>>;
    /// Applies a partial update; bumps `version` when content changes.
    fn update_template(&self, id: TemplateId, patch: &TemplatePatch) -> RepoResult<()>;
    /// Removes one template unconditionally.
    fn delete_template(&self, id: TemplateId) -> RepoResult<()>;
    /// Lists templates using filters + pagination, newest update first.
    fn list_templates(&self, query: &TemplateListQuery) -> RepoResult<Vec<Template>>;
}

/// SQLite-backed template repository.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId> {
        let variables_json = encode_variables(&template.variables)?;

        self.conn.execute(
            "INSERT INTO document_templates
                (uuid, name, description, category, content, variables, is_active, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                template.uuid.to_string(),
                template.name.as_str(),
                template.description.as_deref(),
                template.category.as_db(),
                template.content.as_str(),
                variables_json,
                bool_to_int(template.is_active),
                template.version,
            ],
        )?;

        Ok(template.uuid)
    }

    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEMPLATE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(template_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_template(&self, id: TemplateId, patch: &TemplatePatch) -> RepoResult<()> {
        let variables_json = match patch.variables.as_deref() {
            Some(variables) => Some(encode_variables(variables)?),
            None => None,
        };

        // All SET expressions evaluate against the pre-update row, so the
        // version CASE sees the stored content even though content is also
        // assigned in the same statement.
        let changed = self.conn.execute(
            "UPDATE document_templates
             SET
                name = COALESCE(?1, name),
                description = COALESCE(?2, description),
                category = COALESCE(?3, category),
                version = CASE
                    WHEN ?4 IS NOT NULL AND ?4 <> content THEN version + 1
                    ELSE version
                END,
                content = COALESCE(?4, content),
                variables = COALESCE(?5, variables),
                is_active = COALESCE(?6, is_active),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                patch.name.as_deref(),
                patch.description.as_deref(),
                patch.category.map(TemplateCategory::as_db),
                patch.content.as_deref(),
                variables_json,
                patch.is_active.map(bool_to_int),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("template", id));
        }
        Ok(())
    }

    fn delete_template(&self, id: TemplateId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM document_templates WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("template", id));
        }
        Ok(())
    }

    fn list_templates(&self, query: &TemplateListQuery) -> RepoResult<Vec<Template>> {
        let mut sql = format!("{TEMPLATE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_db().to_string()));
        }
        if let Some(active) = query.active {
            sql.push_str(" AND is_active = ?");
            bind_values.push(Value::Integer(bool_to_int(active)));
        }
        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                sql.push_str(
                    " AND (name LIKE ? COLLATE NOCASE
                       OR description LIKE ? COLLATE NOCASE)",
                );
                let pattern = format!("%{search}%");
                bind_values.push(Value::Text(pattern.clone()));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_template_limit(
            query.limit,
        ))));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(template_from_row(row)?);
        }
        Ok(templates)
    }
}

/// Normalizes list limit according to the templates contract.
pub fn normalize_template_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => TEMPLATES_DEFAULT_LIMIT,
        Some(value) if value > TEMPLATES_LIMIT_MAX => TEMPLATES_LIMIT_MAX,
        Some(value) => value,
        None => TEMPLATES_DEFAULT_LIMIT,
    }
}

fn encode_variables(variables: &[String]) -> RepoResult<String> {
    serde_json::to_string(variables)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode template variables: {err}")))
}

fn decode_variables(raw: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|err| {
        RepoError::InvalidData(format!("invalid template variables json `{raw}`: {err}"))
    })
}

fn template_from_row(row: &Row<'_>) -> RepoResult<Template> {
    let uuid_text: String = row.get("uuid")?;
    let category_text: String = row.get("category")?;
    let category = TemplateCategory::from_db(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown template category `{category_text}`"))
    })?;
    let variables_text: String = row.get("variables")?;
    let is_active: i64 = row.get("is_active")?;

    Ok(Template {
        uuid: parse_uuid(&uuid_text, "document_templates.uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        category,
        content: row.get("content")?,
        variables: decode_variables(&variables_text)?,
        is_active: is_active != 0,
        version: row.get("version")?,
    })
}
