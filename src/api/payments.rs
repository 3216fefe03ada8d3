//! Payment listing and earnings handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::model::PaymentStatus;
use crate::storage::PaymentFilter;

use super::error::ApiError;
use super::response::{ok, page_window, paginated};
use super::AppState;

/// `GET /api/payments` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub driver_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Lists payments, newest first, with optional driver/status filters.
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

    let mut filter = PaymentFilter::new().with_limit(limit).with_offset(offset);
    if let Some(driver_id) = params.driver_id {
        filter = filter.with_driver_id(driver_id);
    }
    if let Some(ref status) = params.status {
        let status: PaymentStatus = status
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid status: {}", status)))?;
        filter = filter.with_status(status);
    }

    let (payments, total) = state.db.list_payments(&filter).await?;

    Ok(paginated(payments, page, limit, total))
}

/// `GET /api/payments/summary` query parameters.
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub driver_id: Option<String>,
}

/// Aggregated earnings for one driver.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let driver_id = params
        .driver_id
        .ok_or_else(|| ApiError::BadRequest("Missing required parameter: driver_id".to_string()))?;

    let summary = state.db.earnings_summary(&driver_id).await?;

    Ok(ok(summary))
}
