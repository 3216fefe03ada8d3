//! Dealership listing and approval handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::model::DealershipStatus;
use crate::storage::DealershipFilter;

use super::error::ApiError;
use super::response::{ok_with_message, page_window, paginated};
use super::AppState;

/// `GET /api/dealerships` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Lists dealerships, optionally filtered by approval status.
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

    let mut filter = DealershipFilter::new().with_limit(limit).with_offset(offset);
    if let Some(ref status) = params.status {
        let status: DealershipStatus = status
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid status: {}", status)))?;
        filter = filter.with_status(status);
    }

    let (dealerships, total) = state.db.list_dealerships(&filter).await?;

    Ok(paginated(dealerships, page, limit, total))
}

/// `POST /api/dealerships/approve` body.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub dealership_id: String,
}

/// Approves a pending dealership registration.
pub async fn approve(
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.dealership_id.is_empty() {
        return Err(ApiError::missing_fields("dealership_id"));
    }

    let dealership = state.db.approve_dealership(&req.dealership_id).await?;
    tracing::info!(dealership_id = %dealership.id, "dealership approved");

    Ok(ok_with_message("Dealership approved successfully", dealership))
}

/// `POST /api/dealerships/reject` body.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub dealership_id: String,
    pub reason: Option<String>,
}

/// Rejects a pending dealership registration.
pub async fn reject(
    State(state): State<AppState>,
    Json(req): Json<RejectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.dealership_id.is_empty() {
        return Err(ApiError::missing_fields("dealership_id"));
    }

    let dealership = state
        .db
        .reject_dealership(&req.dealership_id, req.reason.as_deref())
        .await?;
    tracing::info!(dealership_id = %dealership.id, "dealership rejected");

    Ok(ok_with_message("Dealership rejected successfully", dealership))
}
