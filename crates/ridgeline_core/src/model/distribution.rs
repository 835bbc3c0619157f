//! Distribution domain model.

use crate::model::investment::InvestmentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a distribution.
pub type DistributionId = Uuid;

/// Kind of payment made to an investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionType {
    ReturnOfCapital,
    ProfitDistribution,
    InterestPayment,
    FinalDistribution,
}

impl DistributionType {
    /// Human-readable label used in investor-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::ReturnOfCapital => "return of capital",
            Self::ProfitDistribution => "profit distribution",
            Self::InterestPayment => "interest payment",
            Self::FinalDistribution => "final distribution",
        }
    }

    /// Database string form of this type.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::ReturnOfCapital => "RETURN_OF_CAPITAL",
            Self::ProfitDistribution => "PROFIT_DISTRIBUTION",
            Self::InterestPayment => "INTEREST_PAYMENT",
            Self::FinalDistribution => "FINAL_DISTRIBUTION",
        }
    }

    /// Parses the database string form. Returns `None` for unknown values.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "RETURN_OF_CAPITAL" => Some(Self::ReturnOfCapital),
            "PROFIT_DISTRIBUTION" => Some(Self::ProfitDistribution),
            "INTEREST_PAYMENT" => Some(Self::InterestPayment),
            "FINAL_DISTRIBUTION" => Some(Self::FinalDistribution),
            _ => None,
        }
    }
}

/// One payment against one investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub uuid: DistributionId,
    pub investment_uuid: InvestmentId,
    /// Payment amount in dollars, rounded to cents by producers.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DistributionType,
    /// Payment date in epoch milliseconds.
    pub date: i64,
    pub notes: Option<String>,
}

impl Distribution {
    /// Creates a distribution with a generated stable ID.
    pub fn new(
        investment_uuid: InvestmentId,
        amount: f64,
        kind: DistributionType,
        date: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            investment_uuid,
            amount,
            kind,
            date,
            notes: None,
        }
    }
}
