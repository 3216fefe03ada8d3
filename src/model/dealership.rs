use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Approval state of a dealership account.
///
/// New registrations start as `Pending`; a platform admin moves them to
/// `Approved` or `Rejected`. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealershipStatus {
    Pending,
    Approved,
    Rejected,
}

impl DealershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealershipStatus::Pending => "PENDING",
            DealershipStatus::Approved => "APPROVED",
            DealershipStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for DealershipStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DealershipStatus::Pending),
            "APPROVED" => Ok(DealershipStatus::Approved),
            "REJECTED" => Ok(DealershipStatus::Rejected),
            other => Err(ModelError::UnknownDealershipStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for DealershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organization account employing salespeople.
#[derive(Debug, Clone, Serialize)]
pub struct Dealership {
    pub id: String,
    pub name: String,
    pub address: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub status: DealershipStatus,
    /// Reason recorded when the platform rejects the registration.
    pub rejection_reason: Option<String>,
    /// User that administers this dealership.
    pub admin_id: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
