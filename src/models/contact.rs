//! Contact message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Contact message from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContactMessage {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,
}
