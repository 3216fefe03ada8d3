//! Job creation, listing and lifecycle mutations.
//!
//! Every status flip is guarded by a conditional `UPDATE ... WHERE status IN
//! (...)` whose allowed source states come from the lifecycle transition
//! table, so a lost race surfaces as zero affected rows instead of a
//! double-assignment.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use crate::metrics;
use crate::model::{Job, JobLifecycle, JobStatus, Payment, PaymentKind, PaymentStatus};

use super::database::{Database, StoreError};

const ALL_STATUSES: [JobStatus; 5] = [
    JobStatus::Open,
    JobStatus::Accepted,
    JobStatus::InProgress,
    JobStatus::Completed,
    JobStatus::Cancelled,
];

/// Statuses from which the lifecycle allows moving into `target`.
fn sources_for(target: JobStatus) -> Vec<JobStatus> {
    let lifecycle = JobLifecycle::new();
    ALL_STATUSES
        .iter()
        .copied()
        .filter(|from| lifecycle.can_transition(*from, target))
        .collect()
}

/// SQL `IN (...)` list of quoted status literals.
fn status_in_list(statuses: &[JobStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Input for posting a new job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub salesperson_id: String,
    pub vehicle_info: String,
    pub vin: Option<String>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub amount_cents: i64,
    pub notes: Option<String>,
}

/// Filter criteria for listing jobs.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    /// Filter by lifecycle status.
    pub status: Option<JobStatus>,
    /// Filter by posting salesperson.
    pub salesperson_id: Option<String>,
    /// Filter by assigned driver.
    pub driver_id: Option<String>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl JobFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status filter.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the salesperson filter.
    pub fn with_salesperson_id(mut self, id: impl Into<String>) -> Self {
        self.salesperson_id = Some(id.into());
        self
    }

    /// Sets the driver filter.
    pub fn with_driver_id(mut self, id: impl Into<String>) -> Self {
        self.driver_id = Some(id.into());
        self
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset for pagination.
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// A job row joined with participant display names.
#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: Job,
    pub salesperson_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
}

fn row_job(row: &sqlx::sqlite::SqliteRow) -> Result<Job, StoreError> {
    let status: String = row.get("status");
    Ok(Job {
        id: row.get("id"),
        salesperson_id: row.get("salesperson_id"),
        driver_id: row.get("driver_id"),
        status: status.parse()?,
        vehicle_info: row.get("vehicle_info"),
        vin: row.get("vin"),
        pickup_location: row.get("pickup_location"),
        dropoff_location: row.get("dropoff_location"),
        scheduled_at: row.get("scheduled_at"),
        amount_cents: row.get("amount_cents"),
        notes: row.get("notes"),
        pickup_proof: row.get("pickup_proof"),
        delivery_proof: row.get("delivery_proof"),
        accepted_at: row.get("accepted_at"),
        started_at: row.get("started_at"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Database {
    // =========================================================================
    // Job Operations
    // =========================================================================

    /// Posts a new job in OPEN status.
    pub async fn create_job(&self, new: &NewJob) -> Result<Job, StoreError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            salesperson_id: new.salesperson_id.clone(),
            driver_id: None,
            status: JobStatus::Open,
            vehicle_info: new.vehicle_info.clone(),
            vin: new.vin.clone(),
            pickup_location: new.pickup_location.clone(),
            dropoff_location: new.dropoff_location.clone(),
            scheduled_at: new.scheduled_at,
            amount_cents: new.amount_cents,
            notes: new.notes.clone(),
            pickup_proof: None,
            delivery_proof: None,
            accepted_at: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, salesperson_id, driver_id, status, vehicle_info, vin,
                pickup_location, dropoff_location, scheduled_at, amount_cents,
                notes, pickup_proof, delivery_proof, accepted_at, started_at,
                completed_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
        )
        .bind(&job.id)
        .bind(&job.salesperson_id)
        .bind(&job.driver_id)
        .bind(job.status.as_str())
        .bind(&job.vehicle_info)
        .bind(&job.vin)
        .bind(&job.pickup_location)
        .bind(&job.dropoff_location)
        .bind(job.scheduled_at)
        .bind(job.amount_cents)
        .bind(&job.notes)
        .bind(&job.pickup_proof)
        .bind(&job.delivery_proof)
        .bind(job.accepted_at)
        .bind(job.started_at)
        .bind(job.completed_at)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(self.pool())
        .await?;

        Ok(job)
    }

    /// Retrieves a job by id.
    pub async fn get_job(&self, id: &str) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query("SELECT * FROM jobs WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_job).transpose()
    }

    /// Lists jobs matching the given filter, newest first.
    ///
    /// Returns the page of rows and the total count matching the filter.
    pub async fn list_jobs(
        &self,
        filter: &JobFilter,
    ) -> Result<(Vec<JobListing>, i64), StoreError> {
        let mut conditions = Vec::new();
        if filter.status.is_some() {
            conditions.push("j.status = ?");
        }
        if filter.salesperson_id.is_some() {
            conditions.push("j.salesperson_id = ?");
        }
        if filter.driver_id.is_some() {
            conditions.push("j.driver_id = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let mut query = format!(
            "SELECT j.*, su.name AS salesperson_name, du.name AS driver_name
             FROM jobs j
             JOIN salespeople s ON s.id = j.salesperson_id
             JOIN users su ON su.id = s.user_id
             LEFT JOIN drivers d ON d.id = j.driver_id
             LEFT JOIN users du ON du.id = d.user_id{}
             ORDER BY j.created_at DESC",
            where_clause
        );

        if filter.limit.is_some() {
            query.push_str(" LIMIT ?");
            if filter.offset.is_some() {
                query.push_str(" OFFSET ?");
            }
        }

        let mut sqlx_query = sqlx::query(&query);
        if let Some(status) = filter.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }
        if let Some(ref salesperson_id) = filter.salesperson_id {
            sqlx_query = sqlx_query.bind(salesperson_id);
        }
        if let Some(ref driver_id) = filter.driver_id {
            sqlx_query = sqlx_query.bind(driver_id);
        }
        if let Some(limit) = filter.limit {
            sqlx_query = sqlx_query.bind(limit);
            if let Some(offset) = filter.offset {
                sqlx_query = sqlx_query.bind(offset);
            }
        }

        let rows = sqlx_query.fetch_all(self.pool()).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(JobListing {
                job: row_job(&row)?,
                salesperson_name: row.get("salesperson_name"),
                driver_name: row.get("driver_name"),
            });
        }

        let count_query = format!("SELECT COUNT(*) AS total FROM jobs j{}", where_clause);
        let mut count = sqlx::query(&count_query);
        if let Some(status) = filter.status {
            count = count.bind(status.as_str());
        }
        if let Some(ref salesperson_id) = filter.salesperson_id {
            count = count.bind(salesperson_id);
        }
        if let Some(ref driver_id) = filter.driver_id {
            count = count.bind(driver_id);
        }
        let total: i64 = count.fetch_one(self.pool()).await?.get("total");

        Ok((results, total))
    }

    /// Assigns a driver to an OPEN job and moves it to ACCEPTED.
    ///
    /// The status guard and assignment happen in one conditional update:
    /// when two drivers race on the same job exactly one wins, and the
    /// loser sees an invalid-transition error carrying the fresh status.
    pub async fn accept_job(&self, job_id: &str, driver_id: &str) -> Result<Job, StoreError> {
        if self.get_driver(driver_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Driver {}", driver_id)));
        }

        let sources = sources_for(JobStatus::Accepted);
        let sql = format!(
            "UPDATE jobs
             SET status = 'ACCEPTED', driver_id = ?2, accepted_at = ?3, updated_at = ?3
             WHERE id = ?1 AND status IN ({})",
            status_in_list(&sources)
        );

        let result = sqlx::query(&sql)
            .bind(job_id)
            .bind(driver_id)
            .bind(Utc::now())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.transition_failure(job_id, JobStatus::Accepted).await?);
        }

        metrics::record_job_transition(JobStatus::Accepted);

        self.get_job(job_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job {}", job_id)))
    }

    /// Moves an ACCEPTED job to IN_PROGRESS when the driver picks up.
    pub async fn start_job(
        &self,
        job_id: &str,
        pickup_proof: Option<&str>,
    ) -> Result<Job, StoreError> {
        let sources = sources_for(JobStatus::InProgress);
        let sql = format!(
            "UPDATE jobs
             SET status = 'IN_PROGRESS', started_at = ?2, updated_at = ?2,
                 pickup_proof = COALESCE(?3, pickup_proof)
             WHERE id = ?1 AND status IN ({})",
            status_in_list(&sources)
        );

        let result = sqlx::query(&sql)
            .bind(job_id)
            .bind(Utc::now())
            .bind(pickup_proof)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(self
                .transition_failure(job_id, JobStatus::InProgress)
                .await?);
        }

        metrics::record_job_transition(JobStatus::InProgress);

        self.get_job(job_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job {}", job_id)))
    }

    /// Completes an IN_PROGRESS job.
    ///
    /// The status flip, the PENDING payment record, and the driver's
    /// completed-jobs counter all commit in one transaction.
    pub async fn complete_job(
        &self,
        job_id: &str,
        delivery_proof: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(Job, Payment), StoreError> {
        let mut tx = self.pool().begin().await?;
        let now = Utc::now();

        let sources = sources_for(JobStatus::Completed);
        let sql = format!(
            "UPDATE jobs
             SET status = 'COMPLETED', completed_at = ?2, updated_at = ?2,
                 delivery_proof = COALESCE(?3, delivery_proof),
                 notes = COALESCE(?4, notes)
             WHERE id = ?1 AND status IN ({})",
            status_in_list(&sources)
        );

        let result = sqlx::query(&sql)
            .bind(job_id)
            .bind(now)
            .bind(delivery_proof)
            .bind(notes)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(self.transition_failure(job_id, JobStatus::Completed).await?);
        }

        let row = sqlx::query("SELECT * FROM jobs WHERE id = ?1")
            .bind(job_id)
            .fetch_one(&mut *tx)
            .await?;
        let job = row_job(&row)?;

        let driver_id = job
            .driver_id
            .clone()
            .ok_or_else(|| StoreError::NotFound(format!("Driver assignment for job {}", job_id)))?;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            job_id: job.id.clone(),
            driver_id: driver_id.clone(),
            amount_cents: job.amount_cents,
            status: PaymentStatus::Pending,
            kind: PaymentKind::JobCompletion,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO payments (id, job_id, driver_id, amount_cents, status, kind, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.job_id)
        .bind(&payment.driver_id)
        .bind(payment.amount_cents)
        .bind(payment.status.as_str())
        .bind(payment.kind.as_str())
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE drivers SET completed_jobs = completed_jobs + 1, updated_at = ?2 WHERE id = ?1",
        )
        .bind(&driver_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        metrics::record_job_transition(JobStatus::Completed);

        Ok((job, payment))
    }

    /// Cancels a job that has not yet left OPEN or ACCEPTED.
    pub async fn cancel_job(&self, job_id: &str) -> Result<Job, StoreError> {
        let sources = sources_for(JobStatus::Cancelled);
        let sql = format!(
            "UPDATE jobs
             SET status = 'CANCELLED', updated_at = ?2
             WHERE id = ?1 AND status IN ({})",
            status_in_list(&sources)
        );

        let result = sqlx::query(&sql)
            .bind(job_id)
            .bind(Utc::now())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.transition_failure(job_id, JobStatus::Cancelled).await?);
        }

        metrics::record_job_transition(JobStatus::Cancelled);

        self.get_job(job_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job {}", job_id)))
    }

    /// Distinguishes "job missing" from "job in the wrong status" after a
    /// conditional update touched zero rows.
    async fn transition_failure(
        &self,
        job_id: &str,
        target: JobStatus,
    ) -> Result<StoreError, StoreError> {
        Ok(match self.get_job(job_id).await? {
            Some(job) => StoreError::InvalidTransition {
                from: job.status,
                to: target,
            },
            None => StoreError::NotFound(format!("Job {}", job_id)),
        })
    }
}
