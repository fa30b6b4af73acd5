//! Book catalog service

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Search books; returns the page, the matching total and the page count
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64, i64)> {
        let (books, total) = self.repository.books.search(query).await?;
        let limit = query.limit_or_default();
        let total_pages = (total + limit - 1) / limit;
        Ok((books, total, total_pages))
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        if book.authors.iter().any(|a| a.trim().is_empty()) {
            return Err(AppError::Validation(
                "Author names must not be empty".to_string(),
            ));
        }

        let created = self
            .repository
            .books
            .create(
                book.title.trim(),
                &book.authors,
                book.category.as_deref(),
                book.language.as_deref(),
                book.shelf_no.as_deref(),
                book.total_copies,
            )
            .await?;

        tracing::info!("Created book {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Apply a partial admin edit. The merged copy counts must satisfy
    /// `0 <= available_copies <= total_copies`; the stored status is
    /// recomputed from the result.
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        let current = self.repository.books.get_by_id(id).await?;

        let title = update.title.unwrap_or(current.title);
        let authors = update.authors.unwrap_or(current.authors);
        let category = update.category.or(current.category);
        let language = update.language.or(current.language);
        let shelf_no = update.shelf_no.or(current.shelf_no);
        let total_copies = update.total_copies.unwrap_or(current.total_copies);
        let available_copies = update.available_copies.unwrap_or(current.available_copies);

        if authors.is_empty() || authors.iter().any(|a| a.trim().is_empty()) {
            return Err(AppError::Validation(
                "At least one non-empty author is required".to_string(),
            ));
        }
        if available_copies < 0 || available_copies > total_copies {
            return Err(AppError::Validation(format!(
                "Available copies must be between 0 and {}",
                total_copies
            )));
        }

        self.repository
            .books
            .update(
                id,
                title.trim(),
                &authors,
                category.as_deref(),
                language.as_deref(),
                shelf_no.as_deref(),
                total_copies,
                available_copies,
            )
            .await
    }

    /// Delete a book. Refused while any borrow of it is still active.
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let book = self.repository.books.get_by_id(id).await?;

        let active = self.repository.borrows.active_count_for_book(book.id).await?;
        if active > 0 {
            return Err(AppError::Validation(format!(
                "Book has {} active borrow(s)",
                active
            )));
        }

        self.repository.books.delete(book.id).await?;
        tracing::info!("Deleted book {} ({})", book.id, book.title);
        Ok(())
    }

    /// Distinct categories for the catalog filter
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        self.repository.books.list_categories().await
    }

    /// Newest available books for the landing page
    pub async fn featured(&self) -> AppResult<Vec<Book>> {
        self.repository.books.featured(self.config.featured_limit).await
    }

    /// Most borrowed books with their ledger counts
    pub async fn top_borrowed(&self) -> AppResult<Vec<(Book, i64)>> {
        self.repository
            .books
            .top_borrowed(self.config.top_borrowed_limit)
            .await
    }
}
