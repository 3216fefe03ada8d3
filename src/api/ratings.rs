//! Rating submission and listing handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::model::{Rating, MAX_SCORE, MIN_SCORE};
use crate::storage::NewRating;

use super::error::ApiError;
use super::response::{created, ok};
use super::AppState;

/// `POST /api/ratings` body.
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub driver_id: String,
    pub score: Option<i64>,
    pub comment: Option<String>,
}

/// Payload returned after a rating lands: the record plus the fresh mean.
#[derive(Debug, Serialize)]
pub struct RatingSubmitted {
    pub rating: Rating,
    pub driver_average_rating: f64,
}

/// Records a rating and refreshes the driver's average.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRatingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.job_id.is_empty() || req.driver_id.is_empty() || req.score.is_none() {
        return Err(ApiError::missing_fields("job_id, driver_id, score"));
    }

    let score = req.score.unwrap_or_default();
    if !Rating::score_in_range(score) {
        return Err(ApiError::BadRequest(format!(
            "Rating must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }

    let (rating, average) = state
        .db
        .add_rating(&NewRating {
            job_id: req.job_id,
            driver_id: req.driver_id,
            score,
            comment: req.comment,
        })
        .await?;

    Ok(created(
        "Rating submitted successfully",
        RatingSubmitted {
            rating,
            driver_average_rating: average,
        },
    ))
}

/// `GET /api/ratings` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub driver_id: Option<String>,
}

/// Fetches a driver's ratings with the running aggregate.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let driver_id = params
        .driver_id
        .ok_or_else(|| ApiError::BadRequest("Missing required parameter: driver_id".to_string()))?;

    let sheet = state.db.driver_ratings(&driver_id).await?;

    Ok(ok(sheet))
}
