use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Status of a delivery job in its lifecycle.
///
/// Valid transitions are enforced by [`super::JobLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "OPEN",
            JobStatus::Accepted => "ACCEPTED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for JobStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(JobStatus::Open),
            "ACCEPTED" => Ok(JobStatus::Accepted),
            "IN_PROGRESS" => Ok(JobStatus::InProgress),
            "COMPLETED" => Ok(JobStatus::Completed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            other => Err(ModelError::UnknownJobStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle pickup/delivery request posted by a salesperson.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub salesperson_id: String,
    /// Assigned driver once the job leaves `Open`.
    pub driver_id: Option<String>,
    pub status: JobStatus,
    /// Free-form vehicle description (year/make/model).
    pub vehicle_info: String,
    pub vin: Option<String>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Driver payout in cents.
    pub amount_cents: i64,
    pub notes: Option<String>,
    pub pickup_proof: Option<String>,
    pub delivery_proof: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Open,
            JobStatus::Accepted,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_wire_format_is_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let parsed: JobStatus = serde_json::from_str("\"OPEN\"").unwrap();
        assert_eq!(parsed, JobStatus::Open);
    }
}
