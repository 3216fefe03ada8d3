//! Dealership registration and approval operations.

use chrono::Utc;
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use crate::model::{Dealership, DealershipStatus};

use super::database::{Database, StoreError};

/// Input for registering a dealership.
#[derive(Debug, Clone)]
pub struct NewDealership {
    pub name: String,
    pub address: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub admin_id: String,
}

/// Filter criteria for listing dealerships.
#[derive(Debug, Default, Clone)]
pub struct DealershipFilter {
    /// Filter by approval status.
    pub status: Option<DealershipStatus>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl DealershipFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status filter.
    pub fn with_status(mut self, status: DealershipStatus) -> Self {
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

/// A dealership row joined with its admin's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct DealershipListing {
    #[serde(flatten)]
    pub dealership: Dealership,
    pub admin_name: String,
    pub admin_email: String,
}

fn row_dealership(row: &sqlx::sqlite::SqliteRow) -> Result<Dealership, StoreError> {
    let status: String = row.get("status");
    Ok(Dealership {
        id: row.get("id"),
        name: row.get("name"),
        address: row.get("address"),
        contact_email: row.get("contact_email"),
        phone: row.get("phone"),
        status: status.parse()?,
        rejection_reason: row.get("rejection_reason"),
        admin_id: row.get("admin_id"),
        approved_at: row.get("approved_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Database {
    // =========================================================================
    // Dealership Operations
    // =========================================================================

    /// Registers a dealership; it starts PENDING until an admin decides.
    pub async fn create_dealership(
        &self,
        new: &NewDealership,
    ) -> Result<Dealership, StoreError> {
        let now = Utc::now();
        let dealership = Dealership {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            address: new.address.clone(),
            contact_email: new.contact_email.clone(),
            phone: new.phone.clone(),
            status: DealershipStatus::Pending,
            rejection_reason: None,
            admin_id: new.admin_id.clone(),
            approved_at: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO dealerships (
                id, name, address, contact_email, phone, status,
                rejection_reason, admin_id, approved_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&dealership.id)
        .bind(&dealership.name)
        .bind(&dealership.address)
        .bind(&dealership.contact_email)
        .bind(&dealership.phone)
        .bind(dealership.status.as_str())
        .bind(&dealership.rejection_reason)
        .bind(&dealership.admin_id)
        .bind(dealership.approved_at)
        .bind(dealership.created_at)
        .bind(dealership.updated_at)
        .execute(self.pool())
        .await?;

        Ok(dealership)
    }

    /// Retrieves a dealership by id.
    pub async fn get_dealership(&self, id: &str) -> Result<Option<Dealership>, StoreError> {
        let row = sqlx::query("SELECT * FROM dealerships WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_dealership).transpose()
    }

    /// Lists dealerships matching the given filter, newest first.
    ///
    /// Returns the page of rows and the total count matching the filter.
    pub async fn list_dealerships(
        &self,
        filter: &DealershipFilter,
    ) -> Result<(Vec<DealershipListing>, i64), StoreError> {
        let mut where_clause = String::new();
        if filter.status.is_some() {
            where_clause.push_str(" WHERE d.status = ?");
        }

        let mut query = format!(
            "SELECT d.*, u.name AS admin_name, u.email AS admin_email
             FROM dealerships d
             JOIN users u ON u.id = d.admin_id{}
             ORDER BY d.created_at DESC",
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
        if let Some(limit) = filter.limit {
            sqlx_query = sqlx_query.bind(limit);
            if let Some(offset) = filter.offset {
                sqlx_query = sqlx_query.bind(offset);
            }
        }

        let rows = sqlx_query.fetch_all(self.pool()).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(DealershipListing {
                dealership: row_dealership(&row)?,
                admin_name: row.get("admin_name"),
                admin_email: row.get("admin_email"),
            });
        }

        let count_query = format!("SELECT COUNT(*) AS total FROM dealerships d{}", where_clause);
        let mut count = sqlx::query(&count_query);
        if let Some(status) = filter.status {
            count = count.bind(status.as_str());
        }
        let total: i64 = count.fetch_one(self.pool()).await?.get("total");

        Ok((results, total))
    }

    /// Approves a pending dealership registration.
    ///
    /// Fails if the dealership is missing or has already been decided.
    pub async fn approve_dealership(&self, id: &str) -> Result<Dealership, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE dealerships
            SET status = 'APPROVED', approved_at = ?2, updated_at = ?2
            WHERE id = ?1 AND status = 'PENDING'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_dealership(id).await? {
                Some(d) => Err(StoreError::NotPending {
                    id: id.to_string(),
                    status: d.status,
                }),
                None => Err(StoreError::NotFound(format!("Dealership {}", id))),
            };
        }

        self.get_dealership(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Dealership {}", id)))
    }

    /// Rejects a pending dealership registration with an optional reason.
    pub async fn reject_dealership(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Dealership, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE dealerships
            SET status = 'REJECTED', rejection_reason = ?2, updated_at = ?3
            WHERE id = ?1 AND status = 'PENDING'
            "#,
        )
        .bind(id)
        .bind(reason)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_dealership(id).await? {
                Some(d) => Err(StoreError::NotPending {
                    id: id.to_string(),
                    status: d.status,
                }),
                None => Err(StoreError::NotFound(format!("Dealership {}", id))),
            };
        }

        self.get_dealership(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Dealership {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;
    use crate::storage::NewUser;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        db.run_migrations().await.unwrap();
        (dir, db)
    }

    async fn admin_and_dealership(db: &Database, tag: &str) -> Dealership {
        let admin = db
            .create_user(&NewUser {
                email: format!("{}@example.com", tag),
                password_hash: "hash".to_string(),
                name: format!("Admin {}", tag),
                phone: None,
                role: UserRole::DealershipAdmin,
            })
            .await
            .unwrap();

        db.create_dealership(&NewDealership {
            name: format!("Dealership {}", tag),
            address: "1 Main St".to_string(),
            contact_email: format!("{}@example.com", tag),
            phone: None,
            admin_id: admin.id,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_registration_starts_pending() {
        let (_dir, db) = test_db().await;
        let dealership = admin_and_dealership(&db, "a").await;
        assert_eq!(dealership.status, DealershipStatus::Pending);
        assert!(dealership.approved_at.is_none());
    }

    #[tokio::test]
    async fn test_approve_stamps_timestamp() {
        let (_dir, db) = test_db().await;
        let dealership = admin_and_dealership(&db, "a").await;

        let approved = db.approve_dealership(&dealership.id).await.unwrap();
        assert_eq!(approved.status, DealershipStatus::Approved);
        assert!(approved.approved_at.is_some());
    }

    #[tokio::test]
    async fn test_decision_is_terminal() {
        let (_dir, db) = test_db().await;
        let dealership = admin_and_dealership(&db, "a").await;

        db.reject_dealership(&dealership.id, Some("incomplete paperwork"))
            .await
            .unwrap();

        let err = db.approve_dealership(&dealership.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotPending { .. }));

        let stored = db.get_dealership(&dealership.id).await.unwrap().unwrap();
        assert_eq!(
            stored.rejection_reason.as_deref(),
            Some("incomplete paperwork")
        );
    }

    #[tokio::test]
    async fn test_approve_missing_dealership() {
        let (_dir, db) = test_db().await;
        let err = db.approve_dealership("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let (_dir, db) = test_db().await;
        let a = admin_and_dealership(&db, "a").await;
        let _b = admin_and_dealership(&db, "b").await;
        db.approve_dealership(&a.id).await.unwrap();

        let (pending, total) = db
            .list_dealerships(&DealershipFilter::new().with_status(DealershipStatus::Pending))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].dealership.name, "Dealership b");

        let (all, total_all) = db
            .list_dealerships(&DealershipFilter::new())
            .await
            .unwrap();
        assert_eq!(total_all, 2);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_pagination_bounds() {
        let (_dir, db) = test_db().await;
        for tag in ["a", "b", "c"] {
            admin_and_dealership(&db, tag).await;
        }

        let (page, total) = db
            .list_dealerships(&DealershipFilter::new().with_limit(2).with_offset(0))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);

        let (rest, _) = db
            .list_dealerships(&DealershipFilter::new().with_limit(2).with_offset(2))
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
    }
}
