//! SQLite database client for persistent storage.
//!
//! One [`Database`] client owns the connection pool and exposes the query
//! methods for every entity. Per-entity operations live in the sibling
//! modules (`users`, `jobs`, ...) as additional `impl Database` blocks.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::model::{DealershipStatus, JobStatus, ModelError};

use super::migrations::{MigrationError, MigrationRunner};

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection to the database failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    /// Record not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A job mutation would violate the lifecycle transition table.
    #[error("Invalid job transition from '{from}' to '{to}'")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    /// A dealership decision was attempted on a non-pending registration.
    #[error("Dealership '{id}' is not pending (status: {status})")]
    NotPending { id: String, status: DealershipStatus },

    /// A stored value failed to decode into its domain type.
    #[error("Corrupt record: {0}")]
    Corrupt(#[from] ModelError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// SQLite database client.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database file at `path` and returns a client.
    ///
    /// WAL journaling keeps concurrent readers off the writer's back; the
    /// pool is kept small since SQLite serializes writes anyway.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(&format!("sqlite://{}", path))
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(opts)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        tracing::info!(path = path, "database opened");
        Ok(Self { pool })
    }

    /// Creates a new database client from an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        let runner = MigrationRunner::new(self.pool.clone());
        runner.run_migrations().await?;
        Ok(())
    }

    /// Cheap connectivity probe used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound("Job j-123".to_string());
        assert!(err.to_string().contains("j-123"));

        let err = StoreError::ConnectionFailed("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = StoreError::InvalidTransition {
            from: JobStatus::Completed,
            to: JobStatus::Accepted,
        };
        assert!(err.to_string().contains("COMPLETED"));
        assert!(err.to_string().contains("ACCEPTED"));
    }

    #[tokio::test]
    async fn test_open_and_ping() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.run_migrations().await.unwrap();
        db.ping().await.unwrap();
    }
}
