//! Job posting, listing and lifecycle handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Job, JobStatus, Payment};
use crate::storage::{JobFilter, NewJob};

use super::error::ApiError;
use super::response::{created, ok_with_message, page_window, paginated};
use super::AppState;

/// `GET /api/jobs` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub salesperson_id: Option<String>,
    pub driver_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Lists jobs, newest first, with optional status/participant filters.
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

    let mut filter = JobFilter::new().with_limit(limit).with_offset(offset);
    if let Some(ref status) = params.status {
        let status: JobStatus = status
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid status: {}", status)))?;
        filter = filter.with_status(status);
    }
    if let Some(salesperson_id) = params.salesperson_id {
        filter = filter.with_salesperson_id(salesperson_id);
    }
    if let Some(driver_id) = params.driver_id {
        filter = filter.with_driver_id(driver_id);
    }

    let (jobs, total) = state.db.list_jobs(&filter).await?;

    Ok(paginated(jobs, page, limit, total))
}

/// `POST /api/jobs/create` body.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub salesperson_id: String,
    #[serde(default)]
    pub vehicle_info: String,
    pub vin: Option<String>,
    #[serde(default)]
    pub pickup_location: String,
    #[serde(default)]
    pub dropoff_location: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
}

/// Posts a new OPEN job.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.salesperson_id.is_empty()
        || req.vehicle_info.is_empty()
        || req.pickup_location.is_empty()
        || req.dropoff_location.is_empty()
        || req.amount_cents.is_none()
    {
        return Err(ApiError::missing_fields(
            "salesperson_id, vehicle_info, pickup_location, dropoff_location, amount_cents",
        ));
    }

    let amount_cents = req.amount_cents.unwrap_or_default();
    if amount_cents <= 0 {
        return Err(ApiError::BadRequest(
            "amount_cents must be positive".to_string(),
        ));
    }

    if state
        .db
        .get_salesperson(&req.salesperson_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "Salesperson {} not found",
            req.salesperson_id
        )));
    }

    let job = state
        .db
        .create_job(&NewJob {
            salesperson_id: req.salesperson_id,
            vehicle_info: req.vehicle_info,
            vin: req.vin,
            pickup_location: req.pickup_location,
            dropoff_location: req.dropoff_location,
            scheduled_at: req.scheduled_at,
            amount_cents,
            notes: req.notes,
        })
        .await?;

    tracing::info!(job_id = %job.id, "job posted");

    Ok(created("Job created successfully", job))
}

/// `POST /api/jobs/accept` body.
#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub driver_id: String,
}

/// Assigns a driver to an OPEN job.
pub async fn accept(
    State(state): State<AppState>,
    Json(req): Json<AcceptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.job_id.is_empty() || req.driver_id.is_empty() {
        return Err(ApiError::missing_fields("job_id, driver_id"));
    }

    let job = state.db.accept_job(&req.job_id, &req.driver_id).await?;
    tracing::info!(job_id = %job.id, driver_id = %req.driver_id, "job accepted");

    Ok(ok_with_message("Job accepted successfully", job))
}

/// `POST /api/jobs/start` body.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub job_id: String,
    pub pickup_proof: Option<String>,
}

/// Marks pickup: ACCEPTED -> IN_PROGRESS.
pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.job_id.is_empty() {
        return Err(ApiError::missing_fields("job_id"));
    }

    let job = state
        .db
        .start_job(&req.job_id, req.pickup_proof.as_deref())
        .await?;
    tracing::info!(job_id = %job.id, "job started");

    Ok(ok_with_message("Job started successfully", job))
}

/// `POST /api/jobs/complete` body.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    #[serde(default)]
    pub job_id: String,
    pub delivery_proof: Option<String>,
    pub notes: Option<String>,
}

/// Payload returned when a job completes: the job and its payment record.
#[derive(Debug, Serialize)]
pub struct CompletedJob {
    pub job: Job,
    pub payment: Payment,
}

/// Marks delivery: IN_PROGRESS -> COMPLETED, creating the payout record.
pub async fn complete(
    State(state): State<AppState>,
    Json(req): Json<CompleteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.job_id.is_empty() {
        return Err(ApiError::missing_fields("job_id"));
    }

    let (job, payment) = state
        .db
        .complete_job(
            &req.job_id,
            req.delivery_proof.as_deref(),
            req.notes.as_deref(),
        )
        .await?;
    tracing::info!(job_id = %job.id, payment_id = %payment.id, "job completed");

    Ok(ok_with_message(
        "Job completed successfully",
        CompletedJob { job, payment },
    ))
}

/// `POST /api/jobs/cancel` body.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub job_id: String,
}

/// Cancels a job that has not yet been picked up.
pub async fn cancel(
    State(state): State<AppState>,
    Json(req): Json<CancelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.job_id.is_empty() {
        return Err(ApiError::missing_fields("job_id"));
    }

    let job = state.db.cancel_job(&req.job_id).await?;
    tracing::info!(job_id = %job.id, "job cancelled");

    Ok(ok_with_message("Job cancelled successfully", job))
}
