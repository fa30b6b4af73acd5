//! Borrow record model and lifecycle states
//!
//! A borrow record is append-only: it is created by a borrow request and
//! advanced through admin confirmation and return, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::book::BookSummary;

/// Lifecycle state of a borrow record.
///
/// `pending-borrow` and `pending-return` await admin confirmation;
/// `returned` is terminal for the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BorrowStatus {
    PendingBorrow,
    Borrowed,
    PendingReturn,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::PendingBorrow => "pending-borrow",
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::PendingReturn => "pending-return",
            BorrowStatus::Returned => "returned",
        }
    }

    /// A record in any non-returned state counts against the borrow limit
    /// and blocks a second request for the same (book, user) pair.
    pub fn is_active(&self) -> bool {
        !matches!(self, BorrowStatus::Returned)
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending-borrow" => Ok(BorrowStatus::PendingBorrow),
            "borrowed" => Ok(BorrowStatus::Borrowed),
            "pending-return" => Ok(BorrowStatus::PendingReturn),
            "returned" => Ok(BorrowStatus::Returned),
            _ => Err(format!("Invalid borrow status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for BorrowStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BorrowStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BorrowStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Borrow record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub book_id: i32,
    pub user_email: String,
    pub status: BorrowStatus,
    /// When the borrow was requested
    pub borrow_date: DateTime<Utc>,
    /// Due date, stamped at borrow confirmation
    pub return_date: Option<DateTime<Utc>>,
    /// When the return was requested
    pub request_date: Option<DateTime<Utc>>,
    pub borrow_confirmed_at: Option<DateTime<Utc>>,
    pub return_confirmed_at: Option<DateTime<Utc>>,
}

/// Borrow record joined with its book, for user-facing listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetails {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub book: BookSummary,
}

/// Borrow record joined with book and user, for admin listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminBorrowDetails {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub book: BookSummary,
    pub user_name: Option<String>,
}

/// Sort order for the admin ledger listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowSortOrder {
    #[default]
    Desc,
    Asc,
}

/// Pagination parameters for admin ledger listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BorrowPageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub sort_order: Option<BorrowSortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_returned_is_inactive() {
        assert!(BorrowStatus::PendingBorrow.is_active());
        assert!(BorrowStatus::Borrowed.is_active());
        assert!(BorrowStatus::PendingReturn.is_active());
        assert!(!BorrowStatus::Returned.is_active());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            BorrowStatus::PendingBorrow,
            BorrowStatus::Borrowed,
            BorrowStatus::PendingReturn,
            BorrowStatus::Returned,
        ] {
            assert_eq!(status.as_str().parse::<BorrowStatus>().unwrap(), status);
        }
    }
}
