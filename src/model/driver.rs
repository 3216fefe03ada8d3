use chrono::{DateTime, Utc};
use serde::Serialize;

/// A driver profile attached to a user account.
///
/// `average_rating` is denormalized: it is recomputed from the ratings table
/// whenever a new rating lands, so listings can sort without aggregating.
#[derive(Debug, Clone, Serialize)]
pub struct Driver {
    pub id: String,
    pub user_id: String,
    pub license_number: String,
    /// Service radius the driver is willing to cover, in miles.
    pub radius_miles: i64,
    /// Mean of all rating scores, 0.0 until the first rating.
    pub average_rating: f64,
    /// Count of jobs this driver has completed.
    pub completed_jobs: i64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
