//! Rating storage and driver average recomputation.

use chrono::Utc;
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use crate::model::Rating;

use super::database::{Database, StoreError};

/// Input for rating a driver on a job.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub job_id: String,
    pub driver_id: String,
    pub score: i64,
    pub comment: Option<String>,
}

/// A driver's ratings with the running aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct RatingSheet {
    pub ratings: Vec<Rating>,
    pub average_rating: f64,
    pub total_ratings: i64,
}

fn row_rating(row: &sqlx::sqlite::SqliteRow) -> Rating {
    Rating {
        id: row.get("id"),
        job_id: row.get("job_id"),
        driver_id: row.get("driver_id"),
        score: row.get("score"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    // =========================================================================
    // Rating Operations
    // =========================================================================

    /// Inserts a rating and refreshes the driver's stored average.
    ///
    /// The insert, the `AVG(score)` recomputation and the driver update all
    /// commit in one transaction; the returned value is the new average.
    pub async fn add_rating(&self, new: &NewRating) -> Result<(Rating, f64), StoreError> {
        if self.get_job(&new.job_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Job {}", new.job_id)));
        }
        if self.get_driver(&new.driver_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Driver {}", new.driver_id)));
        }

        let rating = Rating {
            id: Uuid::new_v4().to_string(),
            job_id: new.job_id.clone(),
            driver_id: new.driver_id.clone(),
            score: new.score,
            comment: new.comment.clone(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO ratings (id, job_id, driver_id, score, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&rating.id)
        .bind(&rating.job_id)
        .bind(&rating.driver_id)
        .bind(rating.score)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query("SELECT AVG(score) AS average FROM ratings WHERE driver_id = ?1")
            .bind(&rating.driver_id)
            .fetch_one(&mut *tx)
            .await?;
        let average: f64 = row.get("average");

        sqlx::query("UPDATE drivers SET average_rating = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&rating.driver_id)
            .bind(average)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((rating, average))
    }

    /// Fetches a driver's ratings, newest first, with the aggregate.
    pub async fn driver_ratings(&self, driver_id: &str) -> Result<RatingSheet, StoreError> {
        if self.get_driver(driver_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("Driver {}", driver_id)));
        }

        let rows = sqlx::query(
            "SELECT * FROM ratings WHERE driver_id = ?1 ORDER BY created_at DESC",
        )
        .bind(driver_id)
        .fetch_all(self.pool())
        .await?;

        let ratings: Vec<Rating> = rows.iter().map(row_rating).collect();
        let total_ratings = ratings.len() as i64;
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| r.score as f64).sum::<f64>() / total_ratings as f64
        };

        Ok(RatingSheet {
            ratings,
            average_rating,
            total_ratings,
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

    async fn seed_job_and_driver(db: &Database) -> (String, String) {
        let admin = db
            .create_user(&NewUser {
                email: "admin@dealer.com".to_string(),
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
                contact_email: "admin@dealer.com".to_string(),
                phone: None,
                admin_id: admin.id,
            })
            .await
            .unwrap();
        let sales_user = db
            .create_user(&NewUser {
                email: "sales@dealer.com".to_string(),
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
                email: "driver@road.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Dana".to_string(),
                phone: None,
                role: UserRole::Driver,
            })
            .await
            .unwrap();
        let driver = db.create_driver(&driver_user.id, "DL-1", 40).await.unwrap();
        let job = db
            .create_job(&NewJob {
                salesperson_id: salesperson.id,
                vehicle_info: "2020 Toyota Camry".to_string(),
                vin: None,
                pickup_location: "A".to_string(),
                dropoff_location: "B".to_string(),
                scheduled_at: None,
                amount_cents: 4000,
                notes: None,
            })
            .await
            .unwrap();

        (job.id, driver.id)
    }

    #[tokio::test]
    async fn test_rating_updates_average() {
        let (_dir, db) = test_db().await;
        let (job_id, driver_id) = seed_job_and_driver(&db).await;

        let (_, average) = db
            .add_rating(&NewRating {
                job_id: job_id.clone(),
                driver_id: driver_id.clone(),
                score: 5,
                comment: Some("great".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(average, 5.0);

        let (_, average) = db
            .add_rating(&NewRating {
                job_id,
                driver_id: driver_id.clone(),
                score: 2,
                comment: None,
            })
            .await
            .unwrap();
        assert_eq!(average, 3.5);

        // Stored driver row carries the new mean.
        let driver = db.get_driver(&driver_id).await.unwrap().unwrap();
        assert_eq!(driver.average_rating, 3.5);
    }

    #[tokio::test]
    async fn test_rating_requires_existing_refs() {
        let (_dir, db) = test_db().await;
        let (job_id, driver_id) = seed_job_and_driver(&db).await;

        let err = db
            .add_rating(&NewRating {
                job_id: "ghost".to_string(),
                driver_id: driver_id.clone(),
                score: 4,
                comment: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = db
            .add_rating(&NewRating {
                job_id,
                driver_id: "ghost".to_string(),
                score: 4,
                comment: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_driver_ratings_sheet() {
        let (_dir, db) = test_db().await;
        let (job_id, driver_id) = seed_job_and_driver(&db).await;

        let sheet = db.driver_ratings(&driver_id).await.unwrap();
        assert_eq!(sheet.total_ratings, 0);
        assert_eq!(sheet.average_rating, 0.0);

        for score in [4, 5] {
            db.add_rating(&NewRating {
                job_id: job_id.clone(),
                driver_id: driver_id.clone(),
                score,
                comment: None,
            })
            .await
            .unwrap();
        }

        let sheet = db.driver_ratings(&driver_id).await.unwrap();
        assert_eq!(sheet.total_ratings, 2);
        assert_eq!(sheet.average_rating, 4.5);

        let err = db.driver_ratings("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
