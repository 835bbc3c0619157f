//! Investment use-case service.
//!
//! # Responsibility
//! - Record capital commitments and their lifecycle status changes.
//! - Dispatch the investor-facing notification for each change.
//!
//! # Invariants
//! - Principal is validated (> 0) before any write.
//! - Notification dispatch is best-effort here: a failed send is logged and
//!   the committed investment is still returned.

use crate::model::investment::{Investment, InvestmentId, InvestmentStatus};
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use crate::repo::investment_repo::InvestmentRepository;
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::notification_service::NotificationService;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for committing capital.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInvestmentRequest {
    pub investor_uuid: InvestorId,
    pub project_uuid: ProjectId,
    /// Committed principal in dollars.
    pub amount: f64,
    /// Commitment date in epoch milliseconds.
    pub date: i64,
    pub notes: Option<String>,
}

/// Service error for investment use-cases.
#[derive(Debug)]
pub enum InvestmentServiceError {
    /// Principal must be a finite amount greater than zero.
    InvalidAmount(f64),
    InvestorNotFound(InvestorId),
    ProjectNotFound(ProjectId),
    InvestmentNotFound(InvestmentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for InvestmentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(amount) => {
                write!(f, "investment amount must be positive, got {amount}")
            }
            Self::InvestorNotFound(id) => write!(f, "investor not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::InvestmentNotFound(id) => write!(f, "investment not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InvestmentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for InvestmentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "investment",
                id,
            } => Self::InvestmentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Investment facade over repository implementations.
pub struct InvestmentService<R: InvestmentRepository, N: NotificationRepository> {
    repo: R,
    notifier: NotificationService<N>,
}

impl<R: InvestmentRepository, N: NotificationRepository> InvestmentService<R, N> {
    /// Creates a service using the provided repository implementations.
    pub fn new(repo: R, notifier: NotificationService<N>) -> Self {
        Self { repo, notifier }
    }

    /// Records a capital commitment and notifies the investor.
    pub fn commit(
        &self,
        request: &CommitInvestmentRequest,
    ) -> Result<Investment, InvestmentServiceError> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(InvestmentServiceError::InvalidAmount(request.amount));
        }
        if !self.repo.investor_exists(request.investor_uuid)? {
            return Err(InvestmentServiceError::InvestorNotFound(
                request.investor_uuid,
            ));
        }
        if !self.repo.project_exists(request.project_uuid)? {
            return Err(InvestmentServiceError::ProjectNotFound(request.project_uuid));
        }

        let mut investment = Investment::new(
            request.investor_uuid,
            request.project_uuid,
            request.amount,
            request.date,
        );
        investment.notes = request.notes.clone();
        self.repo.create_investment(&investment)?;

        if let Err(err) = self.notifier.notify_investment_created(&investment) {
            warn!(
                "event=investment_notify module=service status=error investor={} investment={} error={err}",
                investment.investor_uuid, investment.uuid
            );
        }

        Ok(investment)
    }

    /// Moves an investment to a new lifecycle status and notifies the
    /// investor of the change.
    pub fn change_status(
        &self,
        id: InvestmentId,
        new_status: InvestmentStatus,
    ) -> Result<Investment, InvestmentServiceError> {
        self.repo.set_status(id, new_status)?;
        let investment = self
            .repo
            .get_investment(id)?
            .ok_or(InvestmentServiceError::InvestmentNotFound(id))?;

        if let Err(err) = self
            .notifier
            .notify_investment_status_change(&investment, new_status)
        {
            warn!(
                "event=investment_notify module=service status=error investor={} investment={} error={err}",
                investment.investor_uuid, investment.uuid
            );
        }

        Ok(investment)
    }

    /// Gets one investment by id.
    pub fn get(&self, id: InvestmentId) -> Result<Investment, InvestmentServiceError> {
        self.repo
            .get_investment(id)?
            .ok_or(InvestmentServiceError::InvestmentNotFound(id))
    }

    /// Lists a project's investments, newest first.
    pub fn list_for_project(&self, project: ProjectId) -> RepoResult<Vec<Investment>> {
        self.repo.list_for_project(project)
    }

    /// Lists an investor's investments, newest first.
    pub fn list_for_investor(&self, investor: InvestorId) -> RepoResult<Vec<Investment>> {
        self.repo.list_for_investor(investor)
    }
}
