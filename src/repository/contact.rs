//! Contact messages repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::contact::{ContactMessage, CreateContactMessage},
};

#[derive(Clone)]
pub struct ContactRepository {
    pool: Pool<Postgres>,
}

impl ContactRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Store a contact form submission
    pub async fn create(&self, message: &CreateContactMessage) -> AppResult<ContactMessage> {
        let created = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// List all messages, newest first
    pub async fn list(&self) -> AppResult<Vec<ContactMessage>> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    /// Delete a message
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Contact message with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
