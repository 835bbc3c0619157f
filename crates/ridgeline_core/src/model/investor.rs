//! Investor domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an investor.
pub type InvestorId = Uuid;

/// Pipeline status of an investor relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestorStatus {
    Prospect,
    Contacted,
    Interested,
    Committed,
    Inactive,
}

impl InvestorStatus {
    /// Database string form of this status.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Prospect => "PROSPECT",
            Self::Contacted => "CONTACTED",
            Self::Interested => "INTERESTED",
            Self::Committed => "COMMITTED",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Parses the database string form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "PROSPECT" => Some(Self::Prospect),
            "CONTACTED" => Some(Self::Contacted),
            "INTERESTED" => Some(Self::Interested),
            "COMMITTED" => Some(Self::Committed),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Investor contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    pub uuid: InvestorId,
    pub first_name: String,
    pub last_name: String,
    /// Unique contact email.
    pub email: String,
    pub phone: Option<String>,
    pub status: InvestorStatus,
    /// Whether this investor may authenticate against the portal.
    pub portal_access: bool,
}

impl Investor {
    /// Creates a new prospect with a generated stable ID.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            status: InvestorStatus::Prospect,
            portal_access: false,
        }
    }

    /// Full display name used in notifications and rendered documents.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
