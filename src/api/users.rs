//! User profile handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::email_looks_valid;

use super::error::ApiError;
use super::response::{ok, ok_with_message};
use super::AppState;

/// `GET /api/users/{id}` — profile with the role-specific attachment.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .db
        .user_profile(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ok(profile))
}

/// `PUT /api/users/{id}` body.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Updates a user's name and/or email.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.is_none() && req.email.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    if let Some(ref email) = req.email {
        if !email_looks_valid(email) {
            return Err(ApiError::BadRequest("Invalid email address".to_string()));
        }
        // The unique index would also catch this, but a clean 400 beats a 500.
        if let Some(existing) = state.db.find_user_by_email(email).await? {
            if existing.id != id {
                return Err(ApiError::BadRequest("Email already registered".to_string()));
            }
        }
    }

    let user = state
        .db
        .update_user(&id, req.name.as_deref(), req.email.as_deref())
        .await?;

    Ok(ok_with_message("User updated successfully", user))
}
