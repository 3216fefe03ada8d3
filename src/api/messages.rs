//! Messaging handlers: job threads and direct conversations.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::storage::NewMessage;

use super::error::ApiError;
use super::response::{created, ok};
use super::AppState;

/// Default number of messages returned by a thread fetch.
const DEFAULT_THREAD_LIMIT: i64 = 50;

/// `POST /api/messages` body.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub recipient_id: String,
    pub job_id: Option<String>,
    #[serde(default)]
    pub body: String,
}

/// Sends a message between two users.
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.sender_id.is_empty() || req.recipient_id.is_empty() || req.body.is_empty() {
        return Err(ApiError::missing_fields("sender_id, recipient_id, body"));
    }

    let message = state
        .db
        .send_message(&NewMessage {
            sender_id: req.sender_id,
            recipient_id: req.recipient_id,
            job_id: req.job_id,
            body: req.body,
        })
        .await?;

    Ok(created("Message sent successfully", message))
}

/// `GET /api/messages` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub job_id: Option<String>,
    pub user_a: Option<String>,
    pub user_b: Option<String>,
    pub limit: Option<i64>,
}

/// Fetches a job thread or a two-user conversation, oldest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_THREAD_LIMIT)
        .clamp(1, state.config.max_page_size);

    let messages = match (params.job_id, params.user_a, params.user_b) {
        (Some(job_id), _, _) => state.db.job_messages(&job_id, limit).await?,
        (None, Some(user_a), Some(user_b)) => {
            state.db.conversation(&user_a, &user_b, limit).await?
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Provide either job_id or both user_a and user_b".to_string(),
            ))
        }
    };

    Ok(ok(messages))
}
