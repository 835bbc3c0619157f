//! Notification dispatch service.
//!
//! # Responsibility
//! - Create investor notifications as side effects of CRM actions.
//! - Word the canned investor-facing messages in one place.
//!
//! # Invariants
//! - Every dispatch inserts a new row: no deduplication, batching or retry.
//! - A failed dispatch surfaces to the caller immediately; aggregation
//!   across recipients is the allocator's concern, not this service's.
//! - Read state only ever moves unread → read.

use crate::model::distribution::Distribution;
use crate::model::investment::{Investment, InvestmentId, InvestmentStatus};
use crate::model::investor::InvestorId;
use crate::model::notification::{
    DocumentId, Notification, NotificationId, NotificationType,
};
use crate::model::project::ProjectId;
use crate::money::format_usd;
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for notification use-cases.
#[derive(Debug)]
pub enum NotificationServiceError {
    /// Addressee does not exist.
    InvestorNotFound(InvestorId),
    /// Context lookup failed: the owning investment does not exist.
    InvestmentNotFound(InvestmentId),
    /// Context lookup failed: the project does not exist.
    ProjectNotFound(ProjectId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NotificationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvestorNotFound(id) => write!(f, "investor not found: {id}"),
            Self::InvestmentNotFound(id) => write!(f, "investment not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotificationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NotificationServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub project_uuid: Option<ProjectId>,
    pub investment_uuid: Option<InvestmentId>,
    pub document_uuid: Option<DocumentId>,
}

impl NotificationDraft {
    /// Creates a draft with no links attached.
    pub fn new(
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
            project_uuid: None,
            investment_uuid: None,
            document_uuid: None,
        }
    }
}

/// Notification dispatch facade over repository implementations.
pub struct NotificationService<R: NotificationRepository> {
    repo: R,
}

impl<R: NotificationRepository> NotificationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records one notification addressed to one investor.
    ///
    /// Always inserts a new row; never deduplicates against earlier sends.
    pub fn notify(
        &self,
        investor: InvestorId,
        draft: NotificationDraft,
    ) -> Result<Notification, NotificationServiceError> {
        if !self.repo.investor_exists(investor)? {
            return Err(NotificationServiceError::InvestorNotFound(investor));
        }

        let mut notification = Notification::new(investor, draft.kind, draft.title, draft.message);
        notification.link = draft.link;
        notification.project_uuid = draft.project_uuid;
        notification.investment_uuid = draft.investment_uuid;
        notification.document_uuid = draft.document_uuid;

        self.repo.create_notification(&notification)?;
        Ok(notification)
    }

    /// Notifies the owning investor that a distribution was sent.
    pub fn notify_distribution_sent(
        &self,
        distribution: &Distribution,
    ) -> Result<Notification, NotificationServiceError> {
        let context = self
            .repo
            .investment_context(distribution.investment_uuid)?
            .ok_or(NotificationServiceError::InvestmentNotFound(
                distribution.investment_uuid,
            ))?;

        let message = format!(
            "A {} of ${} has been sent for your investment in \"{}\".",
            distribution.kind.label(),
            format_usd(distribution.amount),
            context.project_name
        );
        let mut draft =
            NotificationDraft::new(NotificationType::DistributionSent, "Distribution Sent", message);
        draft.investment_uuid = Some(context.investment_uuid);
        draft.project_uuid = Some(context.project_uuid);

        self.notify(context.investor_uuid, draft)
    }

    /// Notifies the owning investor that a distribution is being prepared.
    pub fn notify_distribution_pending(
        &self,
        distribution: &Distribution,
    ) -> Result<Notification, NotificationServiceError> {
        let context = self
            .repo
            .investment_context(distribution.investment_uuid)?
            .ok_or(NotificationServiceError::InvestmentNotFound(
                distribution.investment_uuid,
            ))?;

        let message = format!(
            "A distribution of ${} is being prepared for your investment in \"{}\".",
            format_usd(distribution.amount),
            context.project_name
        );
        let mut draft = NotificationDraft::new(
            NotificationType::DistributionPending,
            "Distribution Coming Soon",
            message,
        );
        draft.investment_uuid = Some(context.investment_uuid);
        draft.project_uuid = Some(context.project_uuid);

        self.notify(context.investor_uuid, draft)
    }

    /// Notifies an investor that their new investment was recorded.
    pub fn notify_investment_created(
        &self,
        investment: &Investment,
    ) -> Result<Notification, NotificationServiceError> {
        let project_name = self
            .repo
            .project_name(investment.project_uuid)?
            .ok_or(NotificationServiceError::ProjectNotFound(
                investment.project_uuid,
            ))?;

        let message = format!(
            "Your investment of ${} in \"{}\" has been recorded.",
            format_usd(investment.amount),
            project_name
        );
        let mut draft = NotificationDraft::new(
            NotificationType::InvestmentStatus,
            "New Investment Recorded",
            message,
        );
        draft.investment_uuid = Some(investment.uuid);
        draft.project_uuid = Some(investment.project_uuid);

        self.notify(investment.investor_uuid, draft)
    }

    /// Notifies an investor that their investment changed status.
    pub fn notify_investment_status_change(
        &self,
        investment: &Investment,
        new_status: InvestmentStatus,
    ) -> Result<Notification, NotificationServiceError> {
        let project_name = self
            .repo
            .project_name(investment.project_uuid)?
            .ok_or(NotificationServiceError::ProjectNotFound(
                investment.project_uuid,
            ))?;

        let message = match new_status {
            InvestmentStatus::Funded => "Your investment has been funded. Thank you!".to_string(),
            InvestmentStatus::Active => "Your investment is now active.".to_string(),
            InvestmentStatus::Distributing => {
                "Distributions are being processed for your investment.".to_string()
            }
            InvestmentStatus::Closed => {
                "Your investment has been fully closed and returned.".to_string()
            }
            other => format!(
                "Your investment in \"{}\" status changed to {}.",
                project_name,
                other.as_db()
            ),
        };
        let mut draft = NotificationDraft::new(
            NotificationType::InvestmentStatus,
            format!("Investment Status: {}", new_status.as_db()),
            message,
        );
        draft.investment_uuid = Some(investment.uuid);
        draft.project_uuid = Some(investment.project_uuid);

        self.notify(investment.investor_uuid, draft)
    }

    /// Sends one draft to every distinct investor holding an investment in
    /// the project. Fails fast on the first dispatch error.
    pub fn notify_project_investors(
        &self,
        project: ProjectId,
        draft: &NotificationDraft,
    ) -> Result<Vec<Notification>, NotificationServiceError> {
        let investors = self.repo.project_investors(project)?;
        let mut sent = Vec::with_capacity(investors.len());
        for investor in investors {
            let mut per_investor = draft.clone();
            per_investor.project_uuid = Some(project);
            sent.push(self.notify(investor, per_investor)?);
        }
        Ok(sent)
    }

    /// Notifies an investor that yearly tax documents are available.
    pub fn notify_tax_document_ready(
        &self,
        investor: InvestorId,
        year: u16,
        document: DocumentId,
    ) -> Result<Notification, NotificationServiceError> {
        let mut draft = NotificationDraft::new(
            NotificationType::TaxDocumentReady,
            format!("{year} Tax Documents Ready"),
            format!("Your K-1 and tax documents for {year} are now available in your portal."),
        );
        draft.document_uuid = Some(document);

        self.notify(investor, draft)
    }

    /// Lists one investor's most recent notifications.
    pub fn recent(&self, investor: InvestorId, limit: u32) -> RepoResult<Vec<Notification>> {
        self.repo.list_for_investor(investor, limit)
    }

    /// Counts one investor's unread notifications.
    pub fn unread_count(&self, investor: InvestorId) -> RepoResult<u32> {
        self.repo.unread_count(investor)
    }

    /// Marks one notification read for its owning investor.
    pub fn mark_as_read(&self, id: NotificationId, investor: InvestorId) -> RepoResult<()> {
        self.repo.mark_as_read(id, investor)
    }

    /// Marks all of an investor's unread notifications read.
    pub fn mark_all_as_read(&self, investor: InvestorId) -> RepoResult<u32> {
        self.repo.mark_all_as_read(investor)
    }
}
