//! User, salesperson and driver profile operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use crate::model::{Driver, Salesperson, User, UserRole};

use super::database::{Database, StoreError};

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// A user profile with its role-specific attachment.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    /// Present for SALESPERSON accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesperson: Option<SalespersonAttachment>,
    /// Present for DRIVER accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
    /// Present for DEALERSHIP_ADMIN accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealership: Option<DealershipSummary>,
}

/// Salesperson attachment on a user profile.
#[derive(Debug, Clone, Serialize)]
pub struct SalespersonAttachment {
    pub id: String,
    pub dealership_id: String,
    pub dealership_name: String,
}

/// Compact dealership view attached to admin profiles.
#[derive(Debug, Clone, Serialize)]
pub struct DealershipSummary {
    pub id: String,
    pub name: String,
    pub address: String,
}

pub(crate) fn row_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, StoreError> {
    let role: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        phone: row.get("phone"),
        role: role.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub(crate) fn row_driver(row: &sqlx::sqlite::SqliteRow) -> Result<Driver, StoreError> {
    Ok(Driver {
        id: row.get("id"),
        user_id: row.get("user_id"),
        license_number: row.get("license_number"),
        radius_miles: row.get("radius_miles"),
        average_rating: row.get("average_rating"),
        completed_jobs: row.get("completed_jobs"),
        verified: row.get("verified"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Database {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Inserts a new user account.
    pub async fn create_user(&self, new: &NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            name: new.name.clone(),
            phone: new.phone.clone(),
            role: new.role,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, phone, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;

        Ok(user)
    }

    /// Looks a user up by login email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_user).transpose()
    }

    /// Retrieves a user by id.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_user).transpose()
    }

    /// Updates a user's name and/or email; absent fields are left untouched.
    pub async fn update_user(
        &self,
        id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?2, name),
                email = COALESCE(?3, email),
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("User {}", id)));
        }

        self.get_user(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {}", id)))
    }

    /// Loads a user together with its role-specific attachment.
    pub async fn user_profile(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        let user = match self.get_user(id).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let mut profile = UserProfile {
            user,
            salesperson: None,
            driver: None,
            dealership: None,
        };

        match profile.user.role {
            UserRole::Salesperson => {
                let row = sqlx::query(
                    r#"
                    SELECT s.id, s.dealership_id, d.name AS dealership_name
                    FROM salespeople s
                    JOIN dealerships d ON d.id = s.dealership_id
                    WHERE s.user_id = ?1
                    "#,
                )
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

                profile.salesperson = row.map(|r| SalespersonAttachment {
                    id: r.get("id"),
                    dealership_id: r.get("dealership_id"),
                    dealership_name: r.get("dealership_name"),
                });
            }
            UserRole::Driver => {
                let row = sqlx::query("SELECT * FROM drivers WHERE user_id = ?1")
                    .bind(id)
                    .fetch_optional(self.pool())
                    .await?;
                profile.driver = row.as_ref().map(row_driver).transpose()?;
            }
            UserRole::DealershipAdmin => {
                let row = sqlx::query(
                    "SELECT id, name, address FROM dealerships WHERE admin_id = ?1",
                )
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

                profile.dealership = row.map(|r| DealershipSummary {
                    id: r.get("id"),
                    name: r.get("name"),
                    address: r.get("address"),
                });
            }
            UserRole::Admin => {}
        }

        Ok(Some(profile))
    }

    // =========================================================================
    // Role Profile Operations
    // =========================================================================

    /// Attaches a salesperson profile to a user.
    pub async fn create_salesperson(
        &self,
        user_id: &str,
        dealership_id: &str,
    ) -> Result<Salesperson, StoreError> {
        let now = Utc::now();
        let salesperson = Salesperson {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            dealership_id: dealership_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO salespeople (id, user_id, dealership_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&salesperson.id)
        .bind(&salesperson.user_id)
        .bind(&salesperson.dealership_id)
        .bind(salesperson.created_at)
        .bind(salesperson.updated_at)
        .execute(self.pool())
        .await?;

        Ok(salesperson)
    }

    /// Retrieves a salesperson by id.
    pub async fn get_salesperson(&self, id: &str) -> Result<Option<Salesperson>, StoreError> {
        let row = sqlx::query("SELECT * FROM salespeople WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|r| Salesperson {
            id: r.get("id"),
            user_id: r.get("user_id"),
            dealership_id: r.get("dealership_id"),
            created_at: r.get::<DateTime<Utc>, _>("created_at"),
            updated_at: r.get::<DateTime<Utc>, _>("updated_at"),
        }))
    }

    /// Attaches a driver profile to a user.
    pub async fn create_driver(
        &self,
        user_id: &str,
        license_number: &str,
        radius_miles: i64,
    ) -> Result<Driver, StoreError> {
        let now = Utc::now();
        let driver = Driver {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            license_number: license_number.to_string(),
            radius_miles,
            average_rating: 0.0,
            completed_jobs: 0,
            verified: false,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO drivers (
                id, user_id, license_number, radius_miles,
                average_rating, completed_jobs, verified, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&driver.id)
        .bind(&driver.user_id)
        .bind(&driver.license_number)
        .bind(driver.radius_miles)
        .bind(driver.average_rating)
        .bind(driver.completed_jobs)
        .bind(driver.verified)
        .bind(driver.created_at)
        .bind(driver.updated_at)
        .execute(self.pool())
        .await?;

        Ok(driver)
    }

    /// Retrieves a driver by id.
    pub async fn get_driver(&self, id: &str) -> Result<Option<Driver>, StoreError> {
        let row = sqlx::query("SELECT * FROM drivers WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_driver).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        db.run_migrations().await.unwrap();
        (dir, db)
    }

    fn driver_input() -> NewUser {
        NewUser {
            email: "driver@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Dana Driver".to_string(),
            phone: Some("555-0101".to_string()),
            role: UserRole::Driver,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let (_dir, db) = test_db().await;

        let user = db.create_user(&driver_input()).await.unwrap();
        assert_eq!(user.role, UserRole::Driver);

        let found = db
            .find_user_by_email("driver@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "Dana Driver");

        assert!(db
            .find_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_schema() {
        let (_dir, db) = test_db().await;

        db.create_user(&driver_input()).await.unwrap();
        let err = db.create_user(&driver_input()).await.unwrap_err();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let (_dir, db) = test_db().await;

        let user = db.create_user(&driver_input()).await.unwrap();
        let updated = db
            .update_user(&user.id, Some("New Name"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, "driver@example.com");

        let err = db.update_user("missing", Some("x"), None).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_driver_profile_attachment() {
        let (_dir, db) = test_db().await;

        let user = db.create_user(&driver_input()).await.unwrap();
        db.create_driver(&user.id, "DL-9987", 50).await.unwrap();

        let profile = db.user_profile(&user.id).await.unwrap().unwrap();
        let driver = profile.driver.expect("driver attachment");
        assert_eq!(driver.license_number, "DL-9987");
        assert_eq!(driver.radius_miles, 50);
        assert_eq!(driver.completed_jobs, 0);
        assert!(profile.salesperson.is_none());
    }
}
