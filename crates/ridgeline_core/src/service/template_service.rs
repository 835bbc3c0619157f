//! Document template store service.
//!
//! # Responsibility
//! - Provide template create/update/duplicate/delete/list APIs.
//! - Resolve templates for rendering and placeholder discovery.
//!
//! # Invariants
//! - Write paths validate name/content before touching storage.
//! - `version` increments exactly when an update changes `content`.
//! - Rendering an unknown template id fails; rendering itself never fails
//!   on content shape.

use crate::model::template::{
    Template, TemplateDraft, TemplateId, TemplatePatch, TemplateValidationError,
};
use crate::render::engine::{extract_variables, render, VariableValues};
use crate::repo::template_repo::{TemplateListQuery, TemplateRepository};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for template use-cases.
#[derive(Debug)]
pub enum TemplateServiceError {
    /// Required field missing or blank.
    Validation(TemplateValidationError),
    /// Target template does not exist.
    TemplateNotFound(TemplateId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TemplateServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent template state: {details}")
            }
        }
    }
}

impl Error for TemplateServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TemplateValidationError> for TemplateServiceError {
    fn from(value: TemplateValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TemplateServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "template",
                id,
            } => Self::TemplateNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// A rendered document produced from one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub template_name: String,
    pub content: String,
}

/// Template store facade over repository implementations.
pub struct TemplateService<R: TemplateRepository> {
    repo: R,
}

impl<R: TemplateRepository> TemplateService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one template from a validated draft.
    pub fn create(&self, draft: TemplateDraft) -> Result<Template, TemplateServiceError> {
        draft.validate()?;
        let template = Template::from_draft(draft);
        self.repo.create_template(&template)?;
        Ok(template)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Unset patch fields keep their stored values. The stored version
    /// increments by 1 iff the patch changes `content`.
    pub fn update(
        &self,
        id: TemplateId,
        patch: &TemplatePatch,
    ) -> Result<Template, TemplateServiceError> {
        patch.validate()?;
        self.repo.update_template(id, patch)?;
        self.repo
            .get_template(id)?
            .ok_or(TemplateServiceError::InconsistentState(
                "updated template not found in read-back",
            ))
    }

    /// Creates a copy of one template under a fresh identity.
    ///
    /// The copy is named `"<name> (Copy)"` with its version reset.
    pub fn duplicate(&self, id: TemplateId) -> Result<Template, TemplateServiceError> {
        let original = self
            .repo
            .get_template(id)?
            .ok_or(TemplateServiceError::TemplateNotFound(id))?;
        let copy = original.duplicate();
        self.repo.create_template(&copy)?;
        Ok(copy)
    }

    /// Removes one template unconditionally.
    pub fn delete(&self, id: TemplateId) -> Result<(), TemplateServiceError> {
        self.repo.delete_template(id)?;
        Ok(())
    }

    /// Gets one template by id.
    pub fn get(&self, id: TemplateId) -> Result<Template, TemplateServiceError> {
        self.repo
            .get_template(id)?
            .ok_or(TemplateServiceError::TemplateNotFound(id))
    }

    /// Lists templates using filters + pagination.
    pub fn list(&self, query: &TemplateListQuery) -> Result<Vec<Template>, TemplateServiceError> {
        Ok(self.repo.list_templates(query)?)
    }

    /// Renders one template with the supplied variable values.
    ///
    /// Placeholders without a supplied value survive literally in the
    /// output; that is the pass-through contract, not an error.
    pub fn render(
        &self,
        id: TemplateId,
        values: &VariableValues,
    ) -> Result<RenderedDocument, TemplateServiceError> {
        let template = self.get(id)?;
        Ok(RenderedDocument {
            content: render(&template.content, values),
            template_name: template.name,
        })
    }

    /// Returns the distinct placeholder names in one template's content.
    pub fn variables(&self, id: TemplateId) -> Result<Vec<String>, TemplateServiceError> {
        let template = self.get(id)?;
        Ok(extract_variables(&template.content).into_iter().collect())
    }
}
