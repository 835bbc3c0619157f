//! Document template domain model.
//!
//! # Responsibility
//! - Define the stored template record and its write-path request shapes.
//! - Keep the version-bump rule (`content` changed ⇒ `version + 1`) visible
//!   at the model level.
//!
//! # Invariants
//! - `version` starts at 1 and increments exactly when `content` changes
//!   on update (exact string comparison).
//! - `variables` is a declared list for editor tooling only; it is never
//!   enforced against `content` at render time.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a document template.
pub type TemplateId = Uuid;

/// Version assigned to newly created and duplicated templates.
pub const INITIAL_TEMPLATE_VERSION: u32 = 1;

/// Document category a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    InvestorPacket,
    SubscriptionAgreement,
    OperatingAgreement,
    Ppm,
    WelcomeLetter,
    TaxDocument,
    DistributionNotice,
    ProjectUpdate,
    General,
}

impl TemplateCategory {
    /// Database string form of this category.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::InvestorPacket => "INVESTOR_PACKET",
            Self::SubscriptionAgreement => "SUBSCRIPTION_AGREEMENT",
            Self::OperatingAgreement => "OPERATING_AGREEMENT",
            Self::Ppm => "PPM",
            Self::WelcomeLetter => "WELCOME_LETTER",
            Self::TaxDocument => "TAX_DOCUMENT",
            Self::DistributionNotice => "DISTRIBUTION_NOTICE",
            Self::ProjectUpdate => "PROJECT_UPDATE",
            Self::General => "GENERAL",
        }
    }

    /// Parses the database string form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "INVESTOR_PACKET" => Some(Self::InvestorPacket),
            "SUBSCRIPTION_AGREEMENT" => Some(Self::SubscriptionAgreement),
            "OPERATING_AGREEMENT" => Some(Self::OperatingAgreement),
            "PPM" => Some(Self::Ppm),
            "WELCOME_LETTER" => Some(Self::WelcomeLetter),
            "TAX_DOCUMENT" => Some(Self::TaxDocument),
            "DISTRIBUTION_NOTICE" => Some(Self::DistributionNotice),
            "PROJECT_UPDATE" => Some(Self::ProjectUpdate),
            "GENERAL" => Some(Self::General),
            _ => None,
        }
    }
}

/// Validation failure for template write paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateValidationError {
    /// Name must contain at least one non-whitespace character.
    EmptyName,
    /// Content must contain at least one non-whitespace character.
    EmptyContent,
}

impl Display for TemplateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "template name must not be empty"),
            Self::EmptyContent => write!(f, "template content must not be empty"),
        }
    }
}

impl Error for TemplateValidationError {}

/// Stored document template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub uuid: TemplateId,
    pub name: String,
    pub description: Option<String>,
    pub category: TemplateCategory,
    /// Body text containing zero or more `{{ name }}` placeholders.
    pub content: String,
    /// Declared placeholder names, informational only.
    pub variables: Vec<String>,
    pub is_active: bool,
    pub version: u32,
}

/// Request model for creating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: TemplateCategory,
    pub content: String,
    pub variables: Vec<String>,
}

impl TemplateDraft {
    /// Checks write-path invariants for this request.
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName);
        }
        if self.content.trim().is_empty() {
            return Err(TemplateValidationError::EmptyContent);
        }
        Ok(())
    }
}

/// Partial update for a template. Unset fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TemplateCategory>,
    pub content: Option<String>,
    pub variables: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl TemplatePatch {
    /// Checks write-path invariants for the supplied fields.
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if matches!(self.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(TemplateValidationError::EmptyName);
        }
        if matches!(self.content.as_deref(), Some(content) if content.trim().is_empty()) {
            return Err(TemplateValidationError::EmptyContent);
        }
        Ok(())
    }
}

impl Template {
    /// Builds a fresh template from a validated draft.
    pub fn from_draft(draft: TemplateDraft) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            content: draft.content,
            variables: draft.variables,
            is_active: true,
            version: INITIAL_TEMPLATE_VERSION,
        }
    }

    /// Copy of this template under a fresh identity.
    ///
    /// The copy is named `"<name> (Copy)"` and its version resets to the
    /// initial value regardless of the source version.
    pub fn duplicate(&self) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: format!("{} (Copy)", self.name),
            description: self.description.clone(),
            category: self.category,
            content: self.content.clone(),
            variables: self.variables.clone(),
            is_active: true,
            version: INITIAL_TEMPLATE_VERSION,
        }
    }
}
