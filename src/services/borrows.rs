//! Borrow workflow service
//!
//! Orchestrates the record lifecycle: policy checks at request time, admin
//! confirmation with its paired inventory side effect, and the query surface
//! over the ledger.

use chrono::{Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrow::{AdminBorrowDetails, BorrowDetails, BorrowRecord, BorrowSortOrder},
        user::User,
    },
    policy::LoanPolicy,
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    policy: LoanPolicy,
}

impl BorrowsService {
    pub fn new(repository: Repository, policy: LoanPolicy) -> Self {
        Self { repository, policy }
    }

    /// User requests to borrow a book. Creates a `pending-borrow` record;
    /// inventory is untouched until an admin confirms.
    pub async fn request_borrow(&self, user: &User, book_id: i32) -> AppResult<BorrowRecord> {
        let book = self.repository.books.get_by_id(book_id).await?;

        if let Some(active) = self.repository.borrows.find_active(book.id, &user.email).await? {
            return Err(AppError::InvalidTransition(format!(
                "You already have an active borrow for this book ({})",
                active.status
            )));
        }

        let active_count = self.repository.borrows.active_count_for_user(&user.email).await?;
        self.policy
            .can_borrow(user.role, active_count, book.available_copies)?;

        let record = self.repository.borrows.create_request(book.id, &user.email).await?;
        tracing::info!(
            "Borrow requested: book {} by {} (record {})",
            book.id,
            user.email,
            record.id
        );
        Ok(record)
    }

    /// User requests to return a borrowed book
    pub async fn request_return(&self, user: &User, book_id: i32) -> AppResult<BorrowRecord> {
        // Ensure a missing book reads as 404 rather than a transition error
        self.repository.books.get_by_id(book_id).await?;

        let record = self.repository.borrows.request_return(book_id, &user.email).await?;
        tracing::info!(
            "Return requested: book {} by {} (record {})",
            book_id,
            user.email,
            record.id
        );
        Ok(record)
    }

    /// Admin confirms a pending borrow. The due date is computed from the
    /// borrower's role at confirmation time.
    pub async fn confirm_borrow(&self, id: i32) -> AppResult<(BorrowRecord, Book)> {
        let record = self.repository.borrows.get_by_id(id).await?;
        let borrower = self.repository.users.get_by_email(&record.user_email).await?;

        let due_date = Utc::now() + Duration::days(self.policy.loan_duration_days(borrower.role));

        let (record, book) = self.repository.borrows.confirm_borrow(id, due_date).await?;
        tracing::info!(
            "Borrow confirmed: record {} (book {}, {} copies left)",
            record.id,
            book.id,
            book.available_copies
        );
        Ok((record, book))
    }

    /// Admin confirms a pending return
    pub async fn confirm_return(&self, id: i32) -> AppResult<(BorrowRecord, Book)> {
        let (record, book) = self.repository.borrows.confirm_return(id).await?;
        tracing::info!(
            "Return confirmed: record {} (book {}, {} copies available)",
            record.id,
            book.id,
            book.available_copies
        );
        Ok((record, book))
    }

    /// The caller's active record for a book, if any
    pub async fn status_for_book(
        &self,
        user: &User,
        book_id: i32,
    ) -> AppResult<Option<BorrowRecord>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.borrows.find_active(book_id, &user.email).await
    }

    /// The caller's active borrows, joined with book summaries
    pub async fn my_borrowed(&self, user: &User) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.active_for_user(&user.email).await
    }

    /// The caller's full borrow history, newest first
    pub async fn history(&self, user: &User) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.history_for_user(&user.email).await
    }

    /// Requests awaiting confirmation (admin view)
    pub async fn pending_for_admin(
        &self,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<AdminBorrowDetails>, i64)> {
        self.repository.borrows.pending_for_admin(page, limit).await
    }

    /// Whole ledger (admin view)
    pub async fn all_for_admin(
        &self,
        page: i64,
        limit: i64,
        sort_order: BorrowSortOrder,
    ) -> AppResult<(Vec<AdminBorrowDetails>, i64)> {
        self.repository.borrows.all_for_admin(page, limit, sort_order).await
    }
}
