//! Driver listing and search operations.

use serde::Serialize;
use sqlx::Row;

use crate::model::Driver;

use super::database::{Database, StoreError};
use super::users::row_driver;

/// Filter criteria for listing drivers.
#[derive(Debug, Default, Clone)]
pub struct DriverFilter {
    /// Keep only drivers at or above this average rating.
    pub min_rating: Option<f64>,
    /// Filter by verification state.
    pub verified: Option<bool>,
    /// Case-insensitive substring match on the driver's display name.
    pub search: Option<String>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl DriverFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum rating filter.
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Sets the verified filter.
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    /// Sets the name search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
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

/// A driver row joined with its user's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct DriverListing {
    #[serde(flatten)]
    pub driver: Driver,
    pub name: String,
    pub email: String,
}

impl Database {
    // =========================================================================
    // Driver Listing Operations
    // =========================================================================

    /// Lists drivers matching the given filter, best-rated first.
    ///
    /// Returns the page of rows and the total count matching the filter.
    pub async fn list_drivers(
        &self,
        filter: &DriverFilter,
    ) -> Result<(Vec<DriverListing>, i64), StoreError> {
        let mut conditions = Vec::new();
        if filter.min_rating.is_some() {
            conditions.push("d.average_rating >= ?");
        }
        if filter.verified.is_some() {
            conditions.push("d.verified = ?");
        }
        if filter.search.is_some() {
            conditions.push("u.name LIKE ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let mut query = format!(
            "SELECT d.*, u.name AS name, u.email AS email
             FROM drivers d
             JOIN users u ON u.id = d.user_id{}
             ORDER BY d.average_rating DESC",
            where_clause
        );

        if filter.limit.is_some() {
            query.push_str(" LIMIT ?");
            if filter.offset.is_some() {
                query.push_str(" OFFSET ?");
            }
        }

        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let mut sqlx_query = sqlx::query(&query);
        if let Some(min_rating) = filter.min_rating {
            sqlx_query = sqlx_query.bind(min_rating);
        }
        if let Some(verified) = filter.verified {
            sqlx_query = sqlx_query.bind(verified);
        }
        if let Some(ref pattern) = search_pattern {
            sqlx_query = sqlx_query.bind(pattern);
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
            results.push(DriverListing {
                driver: row_driver(&row)?,
                name: row.get("name"),
                email: row.get("email"),
            });
        }

        let count_query = format!(
            "SELECT COUNT(*) AS total
             FROM drivers d
             JOIN users u ON u.id = d.user_id{}",
            where_clause
        );
        let mut count = sqlx::query(&count_query);
        if let Some(min_rating) = filter.min_rating {
            count = count.bind(min_rating);
        }
        if let Some(verified) = filter.verified {
            count = count.bind(verified);
        }
        if let Some(ref pattern) = search_pattern {
            count = count.bind(pattern);
        }
        let total: i64 = count.fetch_one(self.pool()).await?.get("total");

        Ok((results, total))
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

    async fn seed_driver(db: &Database, name: &str, rating: f64) -> Driver {
        let user = db
            .create_user(&NewUser {
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                password_hash: "hash".to_string(),
                name: name.to_string(),
                phone: None,
                role: UserRole::Driver,
            })
            .await
            .unwrap();
        let driver = db.create_driver(&user.id, "DL-1", 30).await.unwrap();

        // Stamp the rating directly; rating aggregation is covered elsewhere.
        sqlx::query("UPDATE drivers SET average_rating = ?2 WHERE id = ?1")
            .bind(&driver.id)
            .bind(rating)
            .execute(db.pool())
            .await
            .unwrap();
        driver
    }

    #[tokio::test]
    async fn test_list_ordered_by_rating() {
        let (_dir, db) = test_db().await;
        seed_driver(&db, "Low Driver", 2.0).await;
        seed_driver(&db, "Top Driver", 4.8).await;
        seed_driver(&db, "Mid Driver", 3.5).await;

        let (drivers, total) = db.list_drivers(&DriverFilter::new()).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(drivers[0].name, "Top Driver");
        assert_eq!(drivers[2].name, "Low Driver");
    }

    #[tokio::test]
    async fn test_min_rating_filter() {
        let (_dir, db) = test_db().await;
        seed_driver(&db, "Low Driver", 2.0).await;
        seed_driver(&db, "Top Driver", 4.8).await;

        let (drivers, total) = db
            .list_drivers(&DriverFilter::new().with_min_rating(4.0))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(drivers[0].name, "Top Driver");
    }

    #[tokio::test]
    async fn test_name_search() {
        let (_dir, db) = test_db().await;
        seed_driver(&db, "Alice Smith", 4.0).await;
        seed_driver(&db, "Bob Jones", 4.0).await;

        let (drivers, total) = db
            .list_drivers(&DriverFilter::new().with_search("smith"))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(drivers[0].name, "Alice Smith");
    }

    #[tokio::test]
    async fn test_pagination() {
        let (_dir, db) = test_db().await;
        for i in 0..5 {
            seed_driver(&db, &format!("Driver {}", i), i as f64).await;
        }

        let (page, total) = db
            .list_drivers(&DriverFilter::new().with_limit(2).with_offset(4))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 1);
    }
}
