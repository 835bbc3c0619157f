//! Investment domain model.
//!
//! # Invariants
//! - `amount` is the committed principal and is immutable after creation.
//! - Only payable statuses (`FUNDED`, `ACTIVE`, `DISTRIBUTING`) receive
//!   distributions.

use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an investment.
pub type InvestmentId = Uuid;

/// Lifecycle status of a capital commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentStatus {
    Committed,
    Funded,
    Active,
    Distributing,
    Closed,
}

impl InvestmentStatus {
    /// Statuses eligible to receive a distribution.
    pub const PAYABLE: [Self; 3] = [Self::Funded, Self::Active, Self::Distributing];

    /// Whether an investment in this status may receive distributions.
    pub fn is_payable(self) -> bool {
        Self::PAYABLE.contains(&self)
    }

    /// Database string form of this status.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Committed => "COMMITTED",
            Self::Funded => "FUNDED",
            Self::Active => "ACTIVE",
            Self::Distributing => "DISTRIBUTING",
            Self::Closed => "CLOSED",
        }
    }

    /// Parses the database string form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "COMMITTED" => Some(Self::Committed),
            "FUNDED" => Some(Self::Funded),
            "ACTIVE" => Some(Self::Active),
            "DISTRIBUTING" => Some(Self::Distributing),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Validation failure for investment write paths.
#[derive(Debug, Clone, PartialEq)]
pub enum InvestmentValidationError {
    /// Principal must be a finite amount greater than zero.
    InvalidAmount(f64),
}

impl Display for InvestmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(amount) => {
                write!(f, "investment amount must be positive, got {amount}")
            }
        }
    }
}

impl Error for InvestmentValidationError {}

/// Capital commitment by one investor into one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub uuid: InvestmentId,
    pub investor_uuid: InvestorId,
    pub project_uuid: ProjectId,
    /// Committed principal in dollars. Immutable after creation.
    pub amount: f64,
    pub status: InvestmentStatus,
    /// Commitment date in epoch milliseconds.
    pub date: i64,
    pub notes: Option<String>,
}

impl Investment {
    /// Creates a committed investment with a generated stable ID.
    pub fn new(investor_uuid: InvestorId, project_uuid: ProjectId, amount: f64, date: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            investor_uuid,
            project_uuid,
            amount,
            status: InvestmentStatus::Committed,
            date,
            notes: None,
        }
    }

    /// Checks write-path invariants for this record.
    pub fn validate(&self) -> Result<(), InvestmentValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(InvestmentValidationError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}
