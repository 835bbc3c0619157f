//! Development project domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Lifecycle status of a development project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planning,
    Permitting,
    Construction,
    Selling,
    Sold,
    Archived,
}

impl ProjectStatus {
    /// Database string form of this status.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Planning => "PLANNING",
            Self::Permitting => "PERMITTING",
            Self::Construction => "CONSTRUCTION",
            Self::Selling => "SELLING",
            Self::Sold => "SOLD",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parses the database string form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "PLANNING" => Some(Self::Planning),
            "PERMITTING" => Some(Self::Permitting),
            "CONSTRUCTION" => Some(Self::Construction),
            "SELLING" => Some(Self::Selling),
            "SOLD" => Some(Self::Sold),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Development project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: ProjectId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: ProjectStatus,
}

impl Project {
    /// Creates a new project in planning with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            address: None,
            city: None,
            state: None,
            status: ProjectStatus::Planning,
        }
    }
}
