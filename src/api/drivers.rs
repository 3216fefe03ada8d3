//! Driver listing handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::storage::DriverFilter;

use super::error::ApiError;
use super::response::{page_window, paginated};
use super::AppState;

/// `GET /api/drivers` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub min_rating: Option<f64>,
    pub verified: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Lists drivers, best-rated first, with optional rating/search filters.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit, offset) = page_window(
        params.page,
        params.limit,
        state.config.default_page_size,
        state.config.max_page_size,
    );

    let mut filter = DriverFilter::new().with_limit(limit).with_offset(offset);
    if let Some(min_rating) = params.min_rating {
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(ApiError::BadRequest(
                "min_rating must be between 0 and 5".to_string(),
            ));
        }
        filter = filter.with_min_rating(min_rating);
    }
    if let Some(verified) = params.verified {
        filter = filter.with_verified(verified);
    }
    if let Some(search) = params.search {
        filter = filter.with_search(search);
    }

    let (drivers, total) = state.db.list_drivers(&filter).await?;

    Ok(paginated(drivers, page, limit, total))
}
