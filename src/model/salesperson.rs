use chrono::{DateTime, Utc};
use serde::Serialize;

/// A salesperson profile linking a user account to a dealership.
#[derive(Debug, Clone, Serialize)]
pub struct Salesperson {
    pub id: String,
    pub user_id: String,
    pub dealership_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
