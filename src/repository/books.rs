//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookSort, BookStatus},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book. Availability starts at the full copy count.
    pub async fn create(
        &self,
        title: &str,
        authors: &[String],
        category: Option<&str>,
        language: Option<&str>,
        shelf_no: Option<&str>,
        total_copies: i32,
    ) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, authors, category, language, shelf_no,
                               total_copies, available_copies, status)
            VALUES ($1, $2, $3, $4, $5, $6, $6, $7)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(authors)
        .bind(category)
        .bind(language)
        .bind(shelf_no)
        .bind(total_copies)
        .bind(BookStatus::for_copies(total_copies))
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Overwrite a book with fully-resolved values. The caller has already
    /// merged the partial update and validated the copy-count clamp.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        authors: &[String],
        category: Option<&str>,
        language: Option<&str>,
        shelf_no: Option<&str>,
        total_copies: i32,
        available_copies: i32,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, authors = $3, category = $4, language = $5,
                shelf_no = $6, total_copies = $7, available_copies = $8,
                status = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(authors)
        .bind(category)
        .bind(language)
        .bind(shelf_no)
        .bind(total_copies)
        .bind(available_copies)
        .bind(BookStatus::for_copies(available_copies))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Search books with filters, sorting and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page_or_default();
        let limit = query.limit_or_default();
        let offset = (page - 1) * limit;

        let mut conditions = vec!["1=1".to_string()];
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref search) = query.search {
            binds.push(format!("%{}%", search.to_lowercase()));
            let i = binds.len();
            conditions.push(format!(
                "(LOWER(title) LIKE ${i} OR EXISTS (SELECT 1 FROM UNNEST(authors) author WHERE LOWER(author) LIKE ${i}))"
            ));
        }

        if let Some(ref category) = query.category {
            binds.push(category.to_lowercase());
            conditions.push(format!("LOWER(COALESCE(category, '')) = ${}", binds.len()));
        }

        if let Some(status) = query.status {
            binds.push(status.as_str().to_string());
            conditions.push(format!("status = ${}", binds.len()));
        }

        let where_clause = conditions.join(" AND ");

        let count_query = format!("SELECT COUNT(*) FROM books WHERE {}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &binds {
            count = count.bind(bind);
        }
        let total = count.fetch_one(&self.pool).await?;

        let order_by = match query.sort.unwrap_or_default() {
            BookSort::Newest => "created_at DESC".to_string(),
            BookSort::Popular => {
                "(SELECT COUNT(*) FROM borrows br WHERE br.book_id = books.id) DESC, created_at DESC"
                    .to_string()
            }
        };

        let select_query = format!(
            "SELECT * FROM books WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            where_clause, order_by, limit, offset
        );
        let mut select = sqlx::query_as::<_, Book>(&select_query);
        for bind in &binds {
            select = select.bind(bind);
        }
        let books = select.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Distinct categories, for the catalog filter dropdown
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM books WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Newest available books for the landing page
    pub async fn featured(&self, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE status = 'available' ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Most borrowed books with their ledger counts
    pub async fn top_borrowed(&self, limit: i64) -> AppResult<Vec<(Book, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT b.*, COUNT(br.id) AS borrow_count
            FROM books b
            LEFT JOIN borrows br ON br.book_id = b.id
            GROUP BY b.id
            ORDER BY borrow_count DESC, b.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::new();
        for row in rows {
            let book = Book {
                id: row.get("id"),
                title: row.get("title"),
                authors: row.get("authors"),
                category: row.get("category"),
                language: row.get("language"),
                shelf_no: row.get("shelf_no"),
                total_copies: row.get("total_copies"),
                available_copies: row.get("available_copies"),
                status: row.get("status"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            result.push((book, row.get::<i64, _>("borrow_count")));
        }
        Ok(result)
    }

    /// Total number of books in the catalog
    pub async fn count_all(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of books with at least one copy available
    pub async fn count_available(&self) -> AppResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE status = 'available'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Sum of available copies across the catalog
    pub async fn sum_available_copies(&self) -> AppResult<i64> {
        let sum = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(available_copies), 0) FROM books",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(sum)
    }

    /// Adjust availability by `delta`, clamped to `[0, total_copies]`, and
    /// recompute the derived status in the same statement. Fails with
    /// `InventoryInconsistency` when the clamp would be violated.
    pub async fn adjust_availability(&self, book_id: i32, delta: i32) -> AppResult<Book> {
        match Self::apply_delta(&self.pool, book_id, delta).await? {
            Some(book) => Ok(book),
            None => {
                // Distinguish a missing book from a refused clamp
                self.get_by_id(book_id).await?;
                Err(AppError::InventoryInconsistency(format!(
                    "Adjusting book {} by {} would leave the copy count out of range",
                    book_id, delta
                )))
            }
        }
    }

    /// Conditional availability update usable inside a caller's transaction.
    /// Returns `None` when the clamp refuses the delta (or the book is
    /// missing); the caller decides which error that is.
    pub(crate) async fn apply_delta<'e, E>(
        executor: E,
        book_id: i32,
        delta: i32,
    ) -> AppResult<Option<Book>>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET available_copies = available_copies + $2,
                status = CASE WHEN available_copies + $2 > 0
                              THEN 'available' ELSE 'unavailable' END,
                updated_at = NOW()
            WHERE id = $1
              AND available_copies + $2 >= 0
              AND available_copies + $2 <= total_copies
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;

        Ok(book)
    }
}
