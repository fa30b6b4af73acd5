//! Borrow ledger repository
//!
//! Every state transition is written as a conditional UPDATE keyed on the
//! expected prior status, so concurrent confirmations cannot apply the same
//! transition (and its inventory side effect) twice. Confirmations pair the
//! ledger update with the inventory adjustment in one transaction.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookSummary},
        borrow::{AdminBorrowDetails, BorrowDetails, BorrowRecord, BorrowSortOrder, BorrowStatus},
    },
    repository::books::BooksRepository,
};

const ACTIVE_STATUSES: &str = "('pending-borrow', 'borrowed', 'pending-return')";

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Find the active record for a (book, user) pair, if any
    pub async fn find_active(&self, book_id: i32, email: &str) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(&format!(
            "SELECT * FROM borrows WHERE book_id = $1 AND user_email = $2 AND status IN {}",
            ACTIVE_STATUSES
        ))
        .bind(book_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Number of active records for a book, across all users
    pub async fn active_count_for_book(&self, book_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM borrows WHERE book_id = $1 AND status IN {}",
            ACTIVE_STATUSES
        ))
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Number of active records counting against the user's borrow limit
    pub async fn active_count_for_user(&self, email: &str) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM borrows WHERE user_email = $1 AND status IN {}",
            ACTIVE_STATUSES
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Create a borrow request in `pending-borrow`. Inventory is untouched
    /// until an admin confirms. The partial unique index on active records
    /// catches requests racing past the service guard.
    pub async fn create_request(&self, book_id: i32, email: &str) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrows (book_id, user_email, status, borrow_date)
            VALUES ($1, $2, 'pending-borrow', NOW())
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.constraint() == Some("borrows_one_active_idx") => {
                AppError::InvalidTransition(
                    "You already have an active borrow for this book".to_string(),
                )
            }
            _ => AppError::from(e),
        })
    }

    /// Admin confirms a pending borrow: record moves to `borrowed` and one
    /// copy is taken from the inventory, atomically.
    pub async fn confirm_borrow(
        &self,
        id: i32,
        due_date: DateTime<Utc>,
    ) -> AppResult<(BorrowRecord, Book)> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrows
            SET status = 'borrowed', borrow_confirmed_at = NOW(), return_date = $2
            WHERE id = $1 AND status = 'pending-borrow'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(due_date)
        .fetch_optional(&mut *tx)
        .await?;

        let record = match record {
            Some(record) => record,
            None => {
                tx.rollback().await?;
                return Err(self.transition_failure(id, BorrowStatus::PendingBorrow).await?);
            }
        };

        let book = BooksRepository::apply_delta(&mut *tx, record.book_id, -1)
            .await?
            .ok_or_else(|| {
                AppError::NoCopiesAvailable(
                    "No copies of this book are currently available".to_string(),
                )
            })?;

        tx.commit().await?;
        Ok((record, book))
    }

    /// User requests to return a borrowed book
    pub async fn request_return(&self, book_id: i32, email: &str) -> AppResult<BorrowRecord> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrows
            SET status = 'pending-return', request_date = NOW()
            WHERE book_id = $1 AND user_email = $2 AND status = 'borrowed'
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Ok(record),
            None => match self.find_active(book_id, email).await? {
                Some(active) => Err(AppError::InvalidTransition(format!(
                    "Cannot request a return while the record is {}",
                    active.status
                ))),
                None => Err(AppError::NotFound(
                    "No borrowed copy of this book for your account".to_string(),
                )),
            },
        }
    }

    /// Admin confirms a pending return: record moves to `returned` and the
    /// copy goes back to the inventory, atomically.
    pub async fn confirm_return(&self, id: i32) -> AppResult<(BorrowRecord, Book)> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrows
            SET status = 'returned', return_confirmed_at = NOW()
            WHERE id = $1 AND status = 'pending-return'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let record = match record {
            Some(record) => record,
            None => {
                tx.rollback().await?;
                return Err(self.transition_failure(id, BorrowStatus::PendingReturn).await?);
            }
        };

        // The clamp cannot refuse here under correct sequencing; if it does,
        // the ledger and inventory have diverged.
        let book = BooksRepository::apply_delta(&mut *tx, record.book_id, 1)
            .await?
            .ok_or_else(|| {
                AppError::InventoryInconsistency(format!(
                    "Returning book {} would exceed its total copy count",
                    record.book_id
                ))
            })?;

        tx.commit().await?;
        Ok((record, book))
    }

    /// Build the error for a conditional update that matched no row:
    /// either the record does not exist, or it is not in the expected state.
    async fn transition_failure(&self, id: i32, expected: BorrowStatus) -> AppResult<AppError> {
        let status = sqlx::query_scalar::<_, BorrowStatus>("SELECT status FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match status {
            None => AppError::NotFound(format!("Borrow record with id {} not found", id)),
            Some(actual) => AppError::InvalidTransition(format!(
                "Record is {}, expected {}",
                actual, expected
            )),
        })
    }

    /// Active (not yet returned) records for a user, joined with book summary
    pub async fn active_for_user(&self, email: &str) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT br.*, b.title, b.authors, b.category, b.shelf_no,
                   b.status AS book_status
            FROM borrows br
            JOIN books b ON br.book_id = b.id
            WHERE br.user_email = $1 AND br.status IN {}
            ORDER BY br.borrow_date DESC
            "#,
            ACTIVE_STATUSES
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Full borrow history for a user, newest first
    pub async fn history_for_user(&self, email: &str) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT br.*, b.title, b.authors, b.category, b.shelf_no,
                   b.status AS book_status
            FROM borrows br
            JOIN books b ON br.book_id = b.id
            WHERE br.user_email = $1
            ORDER BY br.borrow_date DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Requests awaiting admin confirmation, newest first
    pub async fn pending_for_admin(
        &self,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<AdminBorrowDetails>, i64)> {
        let offset = (page - 1) * limit;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM borrows WHERE status IN ('pending-borrow', 'pending-return')",
        )
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT br.*, b.title, b.authors, b.category, b.shelf_no,
                   b.status AS book_status, u.name AS user_name
            FROM borrows br
            JOIN books b ON br.book_id = b.id
            JOIN users u ON br.user_email = u.email
            WHERE br.status IN ('pending-borrow', 'pending-return')
            ORDER BY br.borrow_date DESC
            LIMIT {} OFFSET {}
            "#,
            limit, offset
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(admin_details_from_row).collect(), total))
    }

    /// Whole ledger for the admin, pending states first, then by borrow date
    pub async fn all_for_admin(
        &self,
        page: i64,
        limit: i64,
        sort_order: BorrowSortOrder,
    ) -> AppResult<(Vec<AdminBorrowDetails>, i64)> {
        let offset = (page - 1) * limit;
        let direction = match sort_order {
            BorrowSortOrder::Desc => "DESC",
            BorrowSortOrder::Asc => "ASC",
        };

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM borrows")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT br.*, b.title, b.authors, b.category, b.shelf_no,
                   b.status AS book_status, u.name AS user_name
            FROM borrows br
            JOIN books b ON br.book_id = b.id
            JOIN users u ON br.user_email = u.email
            ORDER BY CASE br.status
                         WHEN 'pending-borrow' THEN 0
                         WHEN 'pending-return' THEN 1
                         WHEN 'borrowed' THEN 2
                         ELSE 3
                     END,
                     br.borrow_date {}
            LIMIT {} OFFSET {}
            "#,
            direction, limit, offset
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(admin_details_from_row).collect(), total))
    }

    /// Borrow requests per calendar day (UTC), optionally for one user
    pub async fn borrowed_per_day(
        &self,
        since: DateTime<Utc>,
        email: Option<&str>,
    ) -> AppResult<Vec<(String, i64)>> {
        self.per_day_buckets("borrow_date", None, since, email).await
    }

    /// Records still awaiting borrow confirmation, per request day
    pub async fn pending_per_day(&self, since: DateTime<Utc>) -> AppResult<Vec<(String, i64)>> {
        self.per_day_buckets("borrow_date", Some(BorrowStatus::PendingBorrow), since, None)
            .await
    }

    /// Confirmed returns per calendar day (UTC), optionally for one user
    pub async fn returned_per_day(
        &self,
        since: DateTime<Utc>,
        email: Option<&str>,
    ) -> AppResult<Vec<(String, i64)>> {
        self.per_day_buckets("return_confirmed_at", Some(BorrowStatus::Returned), since, email)
            .await
    }

    async fn per_day_buckets(
        &self,
        date_column: &str,
        status: Option<BorrowStatus>,
        since: DateTime<Utc>,
        email: Option<&str>,
    ) -> AppResult<Vec<(String, i64)>> {
        let mut conditions = vec![format!("{} >= $1", date_column)];
        let mut next_param = 2;

        if status.is_some() {
            conditions.push(format!("status = ${}", next_param));
            next_param += 1;
        }
        if email.is_some() {
            conditions.push(format!("user_email = ${}", next_param));
        }

        let query = format!(
            r#"
            SELECT TO_CHAR({col}, 'YYYY-MM-DD') AS day, COUNT(*) AS count
            FROM borrows
            WHERE {}
            GROUP BY TO_CHAR({col}, 'YYYY-MM-DD')
            ORDER BY day
            "#,
            conditions.join(" AND "),
            col = date_column
        );

        let mut q = sqlx::query(&query).bind(since);
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(email) = email {
            q = q.bind(email);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.get("day"), row.get("count")))
            .collect())
    }

    /// Total number of records ever created, optionally for one user
    pub async fn count_all(&self, email: Option<&str>) -> AppResult<i64> {
        let count = match email {
            Some(email) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM borrows WHERE user_email = $1")
                    .bind(email)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM borrows")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    /// Number of records in a given state, optionally for one user
    pub async fn count_by_status(
        &self,
        status: BorrowStatus,
        email: Option<&str>,
    ) -> AppResult<i64> {
        let count = match email {
            Some(email) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM borrows WHERE status = $1 AND user_email = $2",
                )
                .bind(status)
                .bind(email)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM borrows WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    /// Number of active (not returned) records, optionally for one user
    pub async fn count_active(&self, email: Option<&str>) -> AppResult<i64> {
        let count = match email {
            Some(email) => {
                sqlx::query_scalar::<_, i64>(&format!(
                    "SELECT COUNT(*) FROM borrows WHERE status IN {} AND user_email = $1",
                    ACTIVE_STATUSES
                ))
                .bind(email)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(&format!(
                    "SELECT COUNT(*) FROM borrows WHERE status IN {}",
                    ACTIVE_STATUSES
                ))
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count)
    }

    /// (borrow_date, return_confirmed_at) pairs of returned records for a
    /// user, for the reading-time average
    pub async fn reading_pairs_for_user(
        &self,
        email: &str,
    ) -> AppResult<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
        let rows = sqlx::query(
            r#"
            SELECT borrow_date, return_confirmed_at
            FROM borrows
            WHERE user_email = $1 AND status = 'returned'
              AND return_confirmed_at IS NOT NULL
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("borrow_date"), row.get("return_confirmed_at")))
            .collect())
    }
}

fn record_from_row(row: &PgRow) -> BorrowRecord {
    BorrowRecord {
        id: row.get("id"),
        book_id: row.get("book_id"),
        user_email: row.get("user_email"),
        status: row.get("status"),
        borrow_date: row.get("borrow_date"),
        return_date: row.get("return_date"),
        request_date: row.get("request_date"),
        borrow_confirmed_at: row.get("borrow_confirmed_at"),
        return_confirmed_at: row.get("return_confirmed_at"),
    }
}

fn book_summary_from_row(row: &PgRow) -> BookSummary {
    BookSummary {
        id: row.get("book_id"),
        title: row.get("title"),
        authors: row.get("authors"),
        category: row.get("category"),
        shelf_no: row.get("shelf_no"),
        status: row.get("book_status"),
    }
}

fn details_from_row(row: &PgRow) -> BorrowDetails {
    BorrowDetails {
        record: record_from_row(row),
        book: book_summary_from_row(row),
    }
}

fn admin_details_from_row(row: &PgRow) -> AdminBorrowDetails {
    AdminBorrowDetails {
        record: record_from_row(row),
        book: book_summary_from_row(row),
        user_name: row.get("user_name"),
    }
}
