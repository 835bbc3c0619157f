//! Core domain logic for the Ridgeline investor operations stack.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod money;
pub mod render;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::distribution::{Distribution, DistributionId, DistributionType};
pub use model::investment::{Investment, InvestmentId, InvestmentStatus};
pub use model::investor::{Investor, InvestorId, InvestorStatus};
pub use model::notification::{Notification, NotificationId, NotificationType};
pub use model::project::{Project, ProjectId, ProjectStatus};
pub use model::template::{
    Template, TemplateCategory, TemplateDraft, TemplateId, TemplatePatch,
};
pub use render::engine::{extract_variables, render, VariableValues};
pub use repo::distribution_repo::{
    DistributionListQuery, DistributionPatch, SqliteDistributionRepository,
};
pub use repo::investment_repo::SqliteInvestmentRepository;
pub use repo::investor_repo::SqliteInvestorRepository;
pub use repo::notification_repo::SqliteNotificationRepository;
pub use repo::project_repo::SqliteProjectRepository;
pub use repo::session_repo::SqliteSessionRepository;
pub use repo::template_repo::{SqliteTemplateRepository, TemplateListQuery};
pub use repo::{RepoError, RepoResult};
pub use service::distribution_service::{
    AllocationPolicy, AllocationReport, AllocationRequest, DistributionService,
    DistributionServiceError, ManualDistributionRequest,
};
pub use service::investment_service::{
    CommitInvestmentRequest, InvestmentService, InvestmentServiceError,
};
pub use service::notification_service::{
    NotificationDraft, NotificationService, NotificationServiceError,
};
pub use service::session_service::{SessionService, SessionServiceError};
pub use service::template_service::{RenderedDocument, TemplateService, TemplateServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
