use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lowest score a rating may carry.
pub const MIN_SCORE: i64 = 1;

/// Highest score a rating may carry.
pub const MAX_SCORE: i64 = 5;

/// A rating left for a driver after a job.
#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub id: String,
    pub job_id: String,
    pub driver_id: String,
    /// Score between 1 and 5 inclusive.
    pub score: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Whether `score` falls in the accepted 1..=5 band.
    pub fn score_in_range(score: i64) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&score)
    }
}
