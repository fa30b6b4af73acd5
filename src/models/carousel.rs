//! Carousel slide model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Carousel slide from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CarouselSlide {
    pub id: i32,
    pub title: String,
    pub image_url: String,
    pub link: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Create carousel slide request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSlide {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: String,
    pub link: Option<String>,
    pub position: Option<i32>,
}

/// Update carousel slide request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSlide {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub position: Option<i32>,
}
