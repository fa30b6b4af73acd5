//! Borrow workflow endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        borrow::{
            AdminBorrowDetails, BorrowDetails, BorrowPageQuery, BorrowRecord, BorrowStatus,
        },
    },
};

use super::{books::PaginatedResponse, current_user, AuthenticatedUser};

/// Response for borrow/return requests
#[derive(Serialize, ToSchema)]
pub struct BorrowActionResponse {
    pub success: bool,
    pub message: String,
    pub record: BorrowRecord,
}

/// Response for admin confirmations, reflecting the updated inventory
#[derive(Serialize, ToSchema)]
pub struct ConfirmResponse {
    pub success: bool,
    pub message: String,
    pub record: BorrowRecord,
    pub book: Book,
}

/// The caller's borrow status for one book
#[derive(Serialize, ToSchema)]
pub struct BookBorrowStatus {
    /// Active lifecycle state, absent when nothing is in flight
    pub status: Option<BorrowStatus>,
    pub record: Option<BorrowRecord>,
}

/// Request to borrow a book. Creates a pending request; inventory is only
/// taken when an admin confirms.
#[utoipa::path(
    post,
    path = "/books/borrow/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Borrow requested", body = BorrowActionResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Limit reached, no copies, or already active")
    )
)]
pub async fn request_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<(StatusCode, Json<BorrowActionResponse>)> {
    let caller = current_user(&state, &identity).await?;

    let record = state.services.borrows.request_borrow(&caller, book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowActionResponse {
            success: true,
            message: "Borrow request submitted, awaiting confirmation".to_string(),
            record,
        }),
    ))
}

/// Request to return a borrowed book
#[utoipa::path(
    post,
    path = "/books/return/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Return requested", body = BorrowActionResponse),
        (status = 404, description = "Book or active borrow not found"),
        (status = 409, description = "Record is not in the borrowed state")
    )
)]
pub async fn request_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BorrowActionResponse>> {
    let caller = current_user(&state, &identity).await?;

    let record = state.services.borrows.request_return(&caller, book_id).await?;

    Ok(Json(BorrowActionResponse {
        success: true,
        message: "Return request submitted, awaiting confirmation".to_string(),
        record,
    }))
}

/// The caller's borrow status for a book
#[utoipa::path(
    get,
    path = "/books/status/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Borrow status", body = BookBorrowStatus),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookBorrowStatus>> {
    let caller = current_user(&state, &identity).await?;

    let record = state.services.borrows.status_for_book(&caller, book_id).await?;

    Ok(Json(BookBorrowStatus {
        status: record.as_ref().map(|r| r.status),
        record,
    }))
}

/// The caller's active borrows
#[utoipa::path(
    get,
    path = "/my-borrowed-books",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active borrows with book details", body = Vec<BorrowDetails>)
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let caller = current_user(&state, &identity).await?;
    let records = state.services.borrows.my_borrowed(&caller).await?;
    Ok(Json(records))
}

/// The caller's full borrow history, newest first
#[utoipa::path(
    get,
    path = "/borrow-history",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrow history with book details", body = Vec<BorrowDetails>)
    )
)]
pub async fn history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let caller = current_user(&state, &identity).await?;
    let records = state.services.borrows.history(&caller).await?;
    Ok(Json(records))
}

/// Requests awaiting confirmation (admin only)
#[utoipa::path(
    get,
    path = "/admin/borrows/pending",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(BorrowPageQuery),
    responses(
        (status = 200, description = "Pending requests", body = PaginatedResponse<AdminBorrowDetails>),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn admin_pending(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Query(query): Query<BorrowPageQuery>,
) -> AppResult<Json<PaginatedResponse<AdminBorrowDetails>>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (items, total) = state.services.borrows.pending_for_admin(page, limit).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: limit,
    }))
}

/// Whole borrow ledger, pending states first (admin only)
#[utoipa::path(
    get,
    path = "/admin/borrows",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(BorrowPageQuery),
    responses(
        (status = 200, description = "All borrow records", body = PaginatedResponse<AdminBorrowDetails>),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn admin_all(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Query(query): Query<BorrowPageQuery>,
) -> AppResult<Json<PaginatedResponse<AdminBorrowDetails>>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let sort_order = query.sort_order.unwrap_or_default();

    let (items, total) = state
        .services
        .borrows
        .all_for_admin(page, limit, sort_order)
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: limit,
    }))
}

/// Confirm a pending borrow: the record becomes `borrowed` and one copy is
/// taken from the inventory (admin only)
#[utoipa::path(
    post,
    path = "/admin/confirm-borrow/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow confirmed", body = ConfirmResponse),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Wrong state or no copies available")
    )
)]
pub async fn confirm_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ConfirmResponse>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let (record, book) = state.services.borrows.confirm_borrow(id).await?;

    Ok(Json(ConfirmResponse {
        success: true,
        message: "Borrow confirmed".to_string(),
        record,
        book,
    }))
}

/// Confirm a pending return: the record becomes `returned` and the copy goes
/// back to the inventory (admin only)
#[utoipa::path(
    post,
    path = "/admin/confirm-return/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Return confirmed", body = ConfirmResponse),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Wrong state")
    )
)]
pub async fn confirm_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ConfirmResponse>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let (record, book) = state.services.borrows.confirm_return(id).await?;

    Ok(Json(ConfirmResponse {
        success: true,
        message: "Return confirmed".to_string(),
        record,
        book,
    }))
}
