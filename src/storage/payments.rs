//! Payment listing and earnings aggregation.

use serde::Serialize;
use sqlx::Row;

use crate::model::{Payment, PaymentStatus};

use super::database::{Database, StoreError};

/// Filter criteria for listing payments.
#[derive(Debug, Default, Clone)]
pub struct PaymentFilter {
    /// Filter by payee driver.
    pub driver_id: Option<String>,
    /// Filter by settlement status.
    pub status: Option<PaymentStatus>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl PaymentFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the driver filter.
    pub fn with_driver_id(mut self, id: impl Into<String>) -> Self {
        self.driver_id = Some(id.into());
        self
    }

    /// Sets the status filter.
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
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

/// A payment row joined with driver and job display fields.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentListing {
    #[serde(flatten)]
    pub payment: Payment,
    pub driver_name: String,
    pub vehicle_info: String,
}

/// Aggregated earnings for one driver, in cents.
#[derive(Debug, Clone, Serialize)]
pub struct EarningsSummary {
    pub driver_id: String,
    pub total_cents: i64,
    pub pending_cents: i64,
    pub completed_cents: i64,
    pub payment_count: i64,
}

fn row_payment(row: &sqlx::sqlite::SqliteRow) -> Result<Payment, StoreError> {
    let status: String = row.get("status");
    let kind: String = row.get("kind");
    Ok(Payment {
        id: row.get("id"),
        job_id: row.get("job_id"),
        driver_id: row.get("driver_id"),
        amount_cents: row.get("amount_cents"),
        status: status.parse()?,
        kind: kind.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Database {
    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Lists payments matching the given filter, newest first.
    ///
    /// Returns the page of rows and the total count matching the filter.
    pub async fn list_payments(
        &self,
        filter: &PaymentFilter,
    ) -> Result<(Vec<PaymentListing>, i64), StoreError> {
        let mut conditions = Vec::new();
        if filter.driver_id.is_some() {
            conditions.push("p.driver_id = ?");
        }
        if filter.status.is_some() {
            conditions.push("p.status = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let mut query = format!(
            "SELECT p.*, u.name AS driver_name, j.vehicle_info AS vehicle_info
             FROM payments p
             JOIN drivers d ON d.id = p.driver_id
             JOIN users u ON u.id = d.user_id
             JOIN jobs j ON j.id = p.job_id{}
             ORDER BY p.created_at DESC",
            where_clause
        );

        if filter.limit.is_some() {
            query.push_str(" LIMIT ?");
            if filter.offset.is_some() {
                query.push_str(" OFFSET ?");
            }
        }

        let mut sqlx_query = sqlx::query(&query);
        if let Some(ref driver_id) = filter.driver_id {
            sqlx_query = sqlx_query.bind(driver_id);
        }
        if let Some(status) = filter.status {
            sqlx_query = sqlx_query.bind(status.as_str());
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
            results.push(PaymentListing {
                payment: row_payment(&row)?,
                driver_name: row.get("driver_name"),
                vehicle_info: row.get("vehicle_info"),
            });
        }

        let count_query = format!("SELECT COUNT(*) AS total FROM payments p{}", where_clause);
        let mut count = sqlx::query(&count_query);
        if let Some(ref driver_id) = filter.driver_id {
            count = count.bind(driver_id);
        }
        if let Some(status) = filter.status {
            count = count.bind(status.as_str());
        }
        let total: i64 = count.fetch_one(self.pool()).await?.get("total");

        Ok((results, total))
    }

    /// Aggregates a driver's earnings by settlement status.
    pub async fn earnings_summary(&self, driver_id: &str) -> Result<EarningsSummary, StoreError> {
        if self.get_driver(driver_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Driver {}", driver_id)));
        }

        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(amount_cents), 0) AS total,
                COALESCE(SUM(CASE WHEN status = 'PENDING' THEN amount_cents ELSE 0 END), 0) AS pending,
                COALESCE(SUM(CASE WHEN status = 'COMPLETED' THEN amount_cents ELSE 0 END), 0) AS completed,
                COUNT(*) AS payment_count
            FROM payments
            WHERE driver_id = ?1
            "#,
        )
        .bind(driver_id)
        .fetch_one(self.pool())
        .await?;

        Ok(EarningsSummary {
            driver_id: driver_id.to_string(),
            total_cents: row.get("total"),
            pending_cents: row.get("pending"),
            completed_cents: row.get("completed"),
            payment_count: row.get("payment_count"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;
    use crate::storage::{NewDealership, NewJob, NewUser};

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        db.run_migrations().await.unwrap();
        (dir, db)
    }

    /// Runs one job through to completion and returns the driver id.
    async fn completed_job(db: &Database, amount_cents: i64) -> String {
        let admin = db
            .create_user(&NewUser {
                email: format!("admin+{}@dealer.com", amount_cents),
                password_hash: "hash".to_string(),
                name: "Admin".to_string(),
                phone: None,
                role: UserRole::DealershipAdmin,
            })
            .await
            .unwrap();
        let dealership = db
            .create_dealership(&NewDealership {
                name: "Dealer".to_string(),
                address: "1 Main St".to_string(),
                contact_email: format!("admin+{}@dealer.com", amount_cents),
                phone: None,
                admin_id: admin.id,
            })
            .await
            .unwrap();
        let sales_user = db
            .create_user(&NewUser {
                email: format!("sales+{}@dealer.com", amount_cents),
                password_hash: "hash".to_string(),
                name: "Sales".to_string(),
                phone: None,
                role: UserRole::Salesperson,
            })
            .await
            .unwrap();
        let salesperson = db
            .create_salesperson(&sales_user.id, &dealership.id)
            .await
            .unwrap();
        let driver_user = db
            .create_user(&NewUser {
                email: format!("driver+{}@road.com", amount_cents),
                password_hash: "hash".to_string(),
                name: "Dana Driver".to_string(),
                phone: None,
                role: UserRole::Driver,
            })
            .await
            .unwrap();
        let driver = db.create_driver(&driver_user.id, "DL-1", 40).await.unwrap();

        let job = db
            .create_job(&NewJob {
                salesperson_id: salesperson.id,
                vehicle_info: "2021 Ford F-150".to_string(),
                vin: None,
                pickup_location: "Lot A".to_string(),
                dropoff_location: "Lot B".to_string(),
                scheduled_at: None,
                amount_cents,
                notes: None,
            })
            .await
            .unwrap();
        db.accept_job(&job.id, &driver.id).await.unwrap();
        db.start_job(&job.id, None).await.unwrap();
        db.complete_job(&job.id, None, None).await.unwrap();

        driver.id
    }

    #[tokio::test]
    async fn test_list_payments_by_driver() {
        let (_dir, db) = test_db().await;
        let driver_id = completed_job(&db, 5000).await;

        let (payments, total) = db
            .list_payments(&PaymentFilter::new().with_driver_id(driver_id))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(payments[0].payment.amount_cents, 5000);
        assert_eq!(payments[0].payment.status, PaymentStatus::Pending);
        assert_eq!(payments[0].driver_name, "Dana Driver");
        assert_eq!(payments[0].vehicle_info, "2021 Ford F-150");
    }

    #[tokio::test]
    async fn test_status_filter() {
        let (_dir, db) = test_db().await;
        completed_job(&db, 5000).await;

        let (completed, total) = db
            .list_payments(&PaymentFilter::new().with_status(PaymentStatus::Completed))
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(completed.is_empty());
    }

    #[tokio::test]
    async fn test_earnings_summary() {
        let (_dir, db) = test_db().await;
        let driver_id = completed_job(&db, 5000).await;

        let summary = db.earnings_summary(&driver_id).await.unwrap();
        assert_eq!(summary.total_cents, 5000);
        assert_eq!(summary.pending_cents, 5000);
        assert_eq!(summary.completed_cents, 0);
        assert_eq!(summary.payment_count, 1);

        let err = db.earnings_summary("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
