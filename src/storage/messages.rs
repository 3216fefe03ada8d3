//! Message storage: job threads and user-to-user conversations.

use chrono::Utc;
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use crate::model::Message;

use super::database::{Database, StoreError};

/// Input for sending a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: String,
    pub recipient_id: String,
    pub job_id: Option<String>,
    pub body: String,
}

/// A message joined with sender/recipient display names.
#[derive(Debug, Clone, Serialize)]
pub struct MessageListing {
    #[serde(flatten)]
    pub message: Message,
    pub sender_name: String,
    pub recipient_name: String,
}

fn row_message(row: &sqlx::sqlite::SqliteRow) -> MessageListing {
    MessageListing {
        message: Message {
            id: row.get("id"),
            sender_id: row.get("sender_id"),
            recipient_id: row.get("recipient_id"),
            job_id: row.get("job_id"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        },
        sender_name: row.get("sender_name"),
        recipient_name: row.get("recipient_name"),
    }
}

const SELECT_WITH_NAMES: &str = "SELECT m.*, su.name AS sender_name, ru.name AS recipient_name
     FROM messages m
     JOIN users su ON su.id = m.sender_id
     JOIN users ru ON ru.id = m.recipient_id";

impl Database {
    // =========================================================================
    // Message Operations
    // =========================================================================

    /// Stores a message after checking both participants exist.
    pub async fn send_message(&self, new: &NewMessage) -> Result<MessageListing, StoreError> {
        let sender = self
            .get_user(&new.sender_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {}", new.sender_id)))?;
        let recipient = self
            .get_user(&new.recipient_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {}", new.recipient_id)))?;

        if let Some(ref job_id) = new.job_id {
            if self.get_job(job_id).await?.is_none() {
                return Err(StoreError::NotFound(format!("Job {}", job_id)));
            }
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: new.sender_id.clone(),
            recipient_id: new.recipient_id.clone(),
            job_id: new.job_id.clone(),
            body: new.body.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, job_id, body, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.recipient_id)
        .bind(&message.job_id)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(self.pool())
        .await?;

        Ok(MessageListing {
            message,
            sender_name: sender.name,
            recipient_name: recipient.name,
        })
    }

    /// Fetches the message thread for a job, oldest first.
    pub async fn job_messages(
        &self,
        job_id: &str,
        limit: i64,
    ) -> Result<Vec<MessageListing>, StoreError> {
        let query = format!(
            "{} WHERE m.job_id = ?1 ORDER BY m.created_at DESC LIMIT ?2",
            SELECT_WITH_NAMES
        );
        let rows = sqlx::query(&query)
            .bind(job_id)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;

        let mut messages: Vec<MessageListing> = rows.iter().map(row_message).collect();
        messages.reverse();
        Ok(messages)
    }

    /// Fetches the conversation between two users (both directions),
    /// oldest first.
    pub async fn conversation(
        &self,
        user_a: &str,
        user_b: &str,
        limit: i64,
    ) -> Result<Vec<MessageListing>, StoreError> {
        let query = format!(
            "{} WHERE (m.sender_id = ?1 AND m.recipient_id = ?2)
                OR (m.sender_id = ?2 AND m.recipient_id = ?1)
             ORDER BY m.created_at DESC LIMIT ?3",
            SELECT_WITH_NAMES
        );
        let rows = sqlx::query(&query)
            .bind(user_a)
            .bind(user_b)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;

        let mut messages: Vec<MessageListing> = rows.iter().map(row_message).collect();
        messages.reverse();
        Ok(messages)
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

    async fn seed_user(db: &Database, name: &str) -> String {
        db.create_user(&NewUser {
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash".to_string(),
            name: name.to_string(),
            phone: None,
            role: UserRole::Salesperson,
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_send_and_fetch_conversation() {
        let (_dir, db) = test_db().await;
        let alice = seed_user(&db, "Alice").await;
        let bob = seed_user(&db, "Bob").await;

        db.send_message(&NewMessage {
            sender_id: alice.clone(),
            recipient_id: bob.clone(),
            job_id: None,
            body: "car ready?".to_string(),
        })
        .await
        .unwrap();

        db.send_message(&NewMessage {
            sender_id: bob.clone(),
            recipient_id: alice.clone(),
            job_id: None,
            body: "on my way".to_string(),
        })
        .await
        .unwrap();

        // Both directions come back, oldest first.
        let thread = db.conversation(&alice, &bob, 50).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].message.body, "car ready?");
        assert_eq!(thread[1].message.body, "on my way");
        assert_eq!(thread[0].sender_name, "Alice");
        assert_eq!(thread[1].sender_name, "Bob");

        // Order of the pair does not matter.
        let same = db.conversation(&bob, &alice, 50).await.unwrap();
        assert_eq!(same.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_participant_rejected() {
        let (_dir, db) = test_db().await;
        let alice = seed_user(&db, "Alice").await;

        let err = db
            .send_message(&NewMessage {
                sender_id: alice.clone(),
                recipient_id: "ghost".to_string(),
                job_id: None,
                body: "hello?".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = db
            .send_message(&NewMessage {
                sender_id: alice,
                recipient_id: "ghost".to_string(),
                job_id: Some("no-such-job".to_string()),
                body: "hello?".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_limit_bounds_thread() {
        let (_dir, db) = test_db().await;
        let alice = seed_user(&db, "Alice").await;
        let bob = seed_user(&db, "Bob").await;

        for i in 0..5 {
            db.send_message(&NewMessage {
                sender_id: alice.clone(),
                recipient_id: bob.clone(),
                job_id: None,
                body: format!("msg {}", i),
            })
            .await
            .unwrap();
        }

        let thread = db.conversation(&alice, &bob, 3).await.unwrap();
        assert_eq!(thread.len(), 3);
        // The newest three, in chronological order.
        assert_eq!(thread[2].message.body, "msg 4");
    }
}
