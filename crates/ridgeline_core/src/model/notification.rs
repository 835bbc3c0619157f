//! Notification domain model.
//!
//! # Invariants
//! - A notification addresses exactly one investor.
//! - The only mutation after creation is the unread → read transition.

use crate::model::investment::InvestmentId;
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a notification.
pub type NotificationId = Uuid;

/// Stable identifier for a stored document.
pub type DocumentId = Uuid;

/// Category of an investor-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    InvestmentStatus,
    DistributionPending,
    DistributionSent,
    ProjectUpdate,
    TaxDocumentReady,
    DocumentReady,
    General,
}

impl NotificationType {
    /// Database string form of this type.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::InvestmentStatus => "INVESTMENT_STATUS",
            Self::DistributionPending => "DISTRIBUTION_PENDING",
            Self::DistributionSent => "DISTRIBUTION_SENT",
            Self::ProjectUpdate => "PROJECT_UPDATE",
            Self::TaxDocumentReady => "TAX_DOCUMENT_READY",
            Self::DocumentReady => "DOCUMENT_READY",
            Self::General => "GENERAL",
        }
    }

    /// Parses the database string form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "INVESTMENT_STATUS" => Some(Self::InvestmentStatus),
            "DISTRIBUTION_PENDING" => Some(Self::DistributionPending),
            "DISTRIBUTION_SENT" => Some(Self::DistributionSent),
            "PROJECT_UPDATE" => Some(Self::ProjectUpdate),
            "TAX_DOCUMENT_READY" => Some(Self::TaxDocumentReady),
            "DOCUMENT_READY" => Some(Self::DocumentReady),
            "GENERAL" => Some(Self::General),
            _ => None,
        }
    }
}

/// One message addressed to one investor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub uuid: NotificationId,
    pub investor_uuid: InvestorId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    /// Optional portal deep link.
    pub link: Option<String>,
    pub project_uuid: Option<ProjectId>,
    pub investment_uuid: Option<InvestmentId>,
    pub document_uuid: Option<DocumentId>,
    pub read: bool,
    /// Epoch milliseconds of the unread → read transition.
    pub read_at: Option<i64>,
}

impl Notification {
    /// Creates an unread notification with a generated stable ID.
    pub fn new(
        investor_uuid: InvestorId,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            investor_uuid,
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
            project_uuid: None,
            investment_uuid: None,
            document_uuid: None,
            read: false,
            read_at: None,
        }
    }
}
