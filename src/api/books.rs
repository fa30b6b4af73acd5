//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::{current_user, AuthenticatedUser};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// Book listing response with page count for catalog pagination
#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub total: i64,
    pub total_pages: i64,
    pub page: i64,
}

/// A book together with how often it has been borrowed
#[derive(Serialize, ToSchema)]
pub struct TopBorrowedBook {
    #[serde(flatten)]
    pub book: Book,
    pub borrow_count: i64,
}

/// List books with search, filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookListResponse>> {
    let (books, total, total_pages) = state.services.catalog.search_books(&query).await?;

    Ok(Json(BookListResponse {
        books,
        total,
        total_pages,
        page: query.page_or_default(),
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book (admin only)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state.services.catalog.create_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book (admin only)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state.services.catalog.update_book(id, request).await?;
    Ok(Json(book))
}

/// Delete a book (admin only)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book has active borrows"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the distinct book categories
#[utoipa::path(
    get,
    path = "/books/categories",
    tag = "books",
    responses(
        (status = 200, description = "Category list", body = Vec<String>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<String>>> {
    let categories = state.services.catalog.list_categories().await?;
    Ok(Json(categories))
}

/// Newest available books for the landing page
#[utoipa::path(
    get,
    path = "/featured",
    tag = "books",
    responses(
        (status = 200, description = "Featured books", body = Vec<Book>)
    )
)]
pub async fn featured(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.featured().await?;
    Ok(Json(books))
}

/// Most borrowed books
#[utoipa::path(
    get,
    path = "/top-borrowed",
    tag = "books",
    responses(
        (status = 200, description = "Most borrowed books", body = Vec<TopBorrowedBook>)
    )
)]
pub async fn top_borrowed(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<TopBorrowedBook>>> {
    let entries = state.services.catalog.top_borrowed().await?;
    let books = entries
        .into_iter()
        .map(|(book, borrow_count)| TopBorrowedBook { book, borrow_count })
        .collect();
    Ok(Json(books))
}
