use chrono::{DateTime, Utc};
use serde::Serialize;

/// A direct message between two users, optionally tied to a job.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    /// Job this message refers to, when sent from a job thread.
    pub job_id: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
