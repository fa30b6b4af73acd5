//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book availability, always derived from `available_copies`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Unavailable,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Unavailable => "unavailable",
        }
    }

    /// Derive the status for a given number of available copies
    pub fn for_copies(available_copies: i32) -> Self {
        if available_copies > 0 {
            BookStatus::Available
        } else {
            BookStatus::Unavailable
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(BookStatus::Available),
            "unavailable" => Ok(BookStatus::Unavailable),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for BookStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub authors: Vec<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub shelf_no: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub status: BookStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short book representation used when joining borrow records
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub authors: Vec<String>,
    pub category: Option<String>,
    pub shelf_no: Option<String>,
    pub status: BookStatus,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "At least one author is required"))]
    pub authors: Vec<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub shelf_no: Option<String>,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: i32,
}

/// Update book request (admin edit). `available_copies` may be set directly;
/// the stored status is recomputed from the resulting count.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "At least one author is required"))]
    pub authors: Option<Vec<String>>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub shelf_no: Option<String>,
    #[validate(range(min = 0, message = "Total copies must not be negative"))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0, message = "Available copies must not be negative"))]
    pub available_copies: Option<i32>,
}

/// Sort order for book listings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    /// Newest first by creation date
    #[default]
    Newest,
    /// Most borrowed first (by ledger count)
    Popular,
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring search over title and authors
    pub search: Option<String>,
    /// Exact category filter (case-insensitive)
    pub category: Option<String>,
    /// Availability filter
    pub status: Option<BookStatus>,
    #[serde(default)]
    pub sort: Option<BookSort>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl BookQuery {
    pub fn page_or_default(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit_or_default(&self) -> i64 {
        self.limit.unwrap_or(12).clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derives_from_copies() {
        assert_eq!(BookStatus::for_copies(3), BookStatus::Available);
        assert_eq!(BookStatus::for_copies(1), BookStatus::Available);
        assert_eq!(BookStatus::for_copies(0), BookStatus::Unavailable);
    }
}
