//! Distribution ledger and allocation service.
//!
//! # Responsibility
//! - Split a funding event across a project's payable investments under an
//!   explicit policy, one distribution per investment.
//! - Provide manual ledger entry, edit, delete, list and summary APIs.
//!
//! # Invariants
//! - Policy parameters are validated before any row is written.
//! - Shares are rounded to cents independently per investment; the summed
//!   drift against the nominal pool is accepted, never reconciled.
//! - The allocation loop is not one transaction: a repository failure
//!   mid-run leaves earlier rows committed.
//! - Dispatch failures are collected into the report; they never abort the
//!   remaining allocations.

use crate::model::distribution::{Distribution, DistributionId, DistributionType};
use crate::model::investment::InvestmentId;
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use crate::money::round_to_cents;
use crate::repo::distribution_repo::{
    DistributionListQuery, DistributionPatch, DistributionRepository, DistributionRow,
    DistributionSummary,
};
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::RepoError;
use crate::service::notification_service::{NotificationService, NotificationServiceError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a funding event is split across payable investments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationPolicy {
    /// Split a total pool in proportion to committed principal.
    Proportional,
    /// Pay each investment a percentage of its own principal.
    Percentage,
    /// Split a total pool evenly across investments.
    Equal,
}

/// Request model for an allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    pub policy: AllocationPolicy,
    /// Total pool for `Proportional` and `Equal`.
    pub total_amount: Option<f64>,
    /// Percent of principal for `Percentage`.
    pub percent_of_investment: Option<f64>,
    pub kind: DistributionType,
    /// Payment date in epoch milliseconds.
    pub date: i64,
    pub notes: Option<String>,
}

/// One successful allocation to one investment.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationEntry {
    pub distribution_uuid: DistributionId,
    pub investment_uuid: InvestmentId,
    pub investor_uuid: InvestorId,
    /// Committed principal the share was derived from.
    pub principal: f64,
    /// Rounded share written to the ledger.
    pub amount: f64,
}

/// One dispatch failure collected during an allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub investor_uuid: InvestorId,
    pub investment_uuid: InvestmentId,
    pub message: String,
}

/// Outcome of an allocation run. Callers must treat the run as best-effort
/// and inspect `dispatch_failures`.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    pub entries: Vec<AllocationEntry>,
    /// Sum of the rounded shares actually written.
    pub total_distributed: f64,
    pub dispatch_failures: Vec<DispatchFailure>,
}

/// Request model for one manual ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualDistributionRequest {
    pub investment_uuid: InvestmentId,
    pub amount: f64,
    pub kind: DistributionType,
    /// Payment date in epoch milliseconds.
    pub date: i64,
    pub notes: Option<String>,
    /// Whether to dispatch the sent notification. Defaults to true.
    pub notify: bool,
}

/// Service error for ledger and allocation use-cases.
#[derive(Debug)]
pub enum DistributionServiceError {
    /// A policy was requested without its required parameter.
    MissingPolicyParameter {
        policy: AllocationPolicy,
        parameter: &'static str,
    },
    /// The project has no investment eligible for a payout.
    NoEligibleInvestments(ProjectId),
    InvestmentNotFound(InvestmentId),
    DistributionNotFound(DistributionId),
    /// Dispatch failed for a manual single entry (the row is committed).
    Dispatch(NotificationServiceError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for DistributionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPolicyParameter { policy, parameter } => {
                write!(f, "{policy:?} allocation requires `{parameter}`")
            }
            Self::NoEligibleInvestments(project) => {
                write!(f, "no payable investments in project {project}")
            }
            Self::InvestmentNotFound(id) => write!(f, "investment not found: {id}"),
            Self::DistributionNotFound(id) => write!(f, "distribution not found: {id}"),
            Self::Dispatch(err) => write!(f, "notification dispatch failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent ledger state: {details}")
            }
        }
    }
}

impl Error for DistributionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Dispatch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DistributionServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "distribution",
                id,
            } => Self::DistributionNotFound(id),
            RepoError::NotFound {
                entity: "investment",
                id,
            } => Self::InvestmentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Ledger/allocation facade over repository implementations.
pub struct DistributionService<D: DistributionRepository, N: NotificationRepository> {
    repo: D,
    notifier: NotificationService<N>,
}

impl<D: DistributionRepository, N: NotificationRepository> DistributionService<D, N> {
    /// Creates a service using the provided repository implementations.
    pub fn new(repo: D, notifier: NotificationService<N>) -> Self {
        Self { repo, notifier }
    }

    /// Splits a funding event across all payable investments of a project.
    ///
    /// One distribution row is written per eligible investment and the sent
    /// notification is dispatched synchronously after each write. A dispatch
    /// failure for one investor is collected into the report and the run
    /// continues with the remaining investments.
    pub fn allocate(
        &self,
        project: ProjectId,
        request: &AllocationRequest,
    ) -> Result<AllocationReport, DistributionServiceError> {
        let rate = required_parameter(request)?;

        let investments = self.repo.payable_investments(project)?;
        if investments.is_empty() {
            return Err(DistributionServiceError::NoEligibleInvestments(project));
        }

        let principal_total: f64 = investments.iter().map(|investment| investment.amount).sum();
        let share_count = investments.len() as f64;

        let mut report = AllocationReport {
            entries: Vec::with_capacity(investments.len()),
            total_distributed: 0.0,
            dispatch_failures: Vec::new(),
        };

        for investment in &investments {
            let raw_share = match request.policy {
                AllocationPolicy::Proportional => rate * investment.amount / principal_total,
                AllocationPolicy::Percentage => investment.amount * rate / 100.0,
                AllocationPolicy::Equal => rate / share_count,
            };
            let amount = round_to_cents(raw_share);

            let mut distribution =
                Distribution::new(investment.uuid, amount, request.kind, request.date);
            distribution.notes = request.notes.clone();
            self.repo.create_distribution(&distribution)?;

            if let Err(err) = self.notifier.notify_distribution_sent(&distribution) {
                warn!(
                    "event=distribution_notify module=service status=error investor={} investment={} error={err}",
                    investment.investor_uuid, investment.uuid
                );
                report.dispatch_failures.push(DispatchFailure {
                    investor_uuid: investment.investor_uuid,
                    investment_uuid: investment.uuid,
                    message: err.to_string(),
                });
            }

            report.total_distributed += amount;
            report.entries.push(AllocationEntry {
                distribution_uuid: distribution.uuid,
                investment_uuid: investment.uuid,
                investor_uuid: investment.investor_uuid,
                principal: investment.amount,
                amount,
            });
        }

        Ok(report)
    }

    /// Records one manual ledger entry against an existing investment.
    ///
    /// The sent notification is dispatched after the write unless the
    /// request disables it; a dispatch failure surfaces to the caller with
    /// the row already committed.
    pub fn create(
        &self,
        request: &ManualDistributionRequest,
    ) -> Result<Distribution, DistributionServiceError> {
        self.repo
            .get_investment(request.investment_uuid)?
            .ok_or(DistributionServiceError::InvestmentNotFound(
                request.investment_uuid,
            ))?;

        let mut distribution = Distribution::new(
            request.investment_uuid,
            request.amount,
            request.kind,
            request.date,
        );
        distribution.notes = request.notes.clone();
        self.repo.create_distribution(&distribution)?;

        if request.notify {
            self.notifier
                .notify_distribution_sent(&distribution)
                .map_err(DistributionServiceError::Dispatch)?;
        }

        Ok(distribution)
    }

    /// Gets one ledger row by id.
    pub fn get(
        &self,
        id: DistributionId,
    ) -> Result<DistributionRow, DistributionServiceError> {
        self.repo
            .get_distribution(id)?
            .ok_or(DistributionServiceError::DistributionNotFound(id))
    }

    /// Applies a partial edit to one ledger row.
    pub fn update(
        &self,
        id: DistributionId,
        patch: &DistributionPatch,
    ) -> Result<DistributionRow, DistributionServiceError> {
        self.repo.update_distribution(id, patch)?;
        self.repo
            .get_distribution(id)?
            .ok_or(DistributionServiceError::InconsistentState(
                "updated distribution not found in read-back",
            ))
    }

    /// Removes one ledger row.
    pub fn delete(&self, id: DistributionId) -> Result<(), DistributionServiceError> {
        self.repo.delete_distribution(id)?;
        Ok(())
    }

    /// Lists ledger rows using filters + pagination.
    pub fn list(
        &self,
        query: &DistributionListQuery,
    ) -> Result<Vec<DistributionRow>, DistributionServiceError> {
        Ok(self.repo.list_distributions(query)?)
    }

    /// Aggregates the ledger per type plus grand totals.
    pub fn summary(
        &self,
        query: &DistributionListQuery,
    ) -> Result<DistributionSummary, DistributionServiceError> {
        Ok(self.repo.summarize(query)?)
    }
}

fn required_parameter(request: &AllocationRequest) -> Result<f64, DistributionServiceError> {
    match request.policy {
        AllocationPolicy::Proportional | AllocationPolicy::Equal => request.total_amount.ok_or(
            DistributionServiceError::MissingPolicyParameter {
                policy: request.policy,
                parameter: "total_amount",
            },
        ),
        AllocationPolicy::Percentage => request.percent_of_investment.ok_or(
            DistributionServiceError::MissingPolicyParameter {
                policy: request.policy,
                parameter: "percent_of_investment",
            },
        ),
    }
}
