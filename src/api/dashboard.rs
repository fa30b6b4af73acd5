//! Dashboard endpoints
//!
//! Each dashboard returns daily series over a fixed window ending today;
//! the series length always equals the window length (absent days are zero).

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::user::Role};

use super::{current_user, AuthenticatedUser};

/// Member activity dashboard (30-day window)
#[derive(Serialize, ToSchema)]
pub struct MemberDashboard {
    /// `YYYY-MM-DD` labels, one per day of the window
    pub labels: Vec<String>,
    pub borrowed_series: Vec<i64>,
    pub returned_series: Vec<i64>,
    pub total_borrowed: i64,
    pub total_returned: i64,
}

/// Teacher activity dashboard (15-day window)
#[derive(Serialize, ToSchema)]
pub struct TeacherDashboard {
    pub labels: Vec<String>,
    pub borrowed_series: Vec<i64>,
    pub total_ever_borrowed: i64,
    /// Records not yet returned
    pub currently_borrowed: i64,
    pub total_returned: i64,
    /// Rounded mean days between borrow and confirmed return
    pub average_reading_days: i64,
}

/// Library-wide dashboard (180-day window, admin only)
#[derive(Serialize, ToSchema)]
pub struct AdminDashboard {
    pub labels: Vec<String>,
    pub borrowed_series: Vec<i64>,
    pub pending_series: Vec<i64>,
    pub returned_series: Vec<i64>,
    pub summary: AdminDashboardSummary,
}

#[derive(Serialize, ToSchema)]
pub struct AdminDashboardSummary {
    pub total_books: i64,
    pub available_books: i64,
    /// Sum of available copies across the catalog
    pub total_copies: i64,
    pub books_on_loan: i64,
    pub active_borrows: i64,
    pub pending_borrow_requests: i64,
    pub total_borrows_ever: i64,
    /// Sum of the last 30 entries of the borrowed series
    pub borrows_last_30_days: i64,
}

/// Member activity dashboard
#[utoipa::path(
    get,
    path = "/dashboard/member",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member dashboard", body = MemberDashboard),
        (status = 403, description = "Access denied")
    )
)]
pub async fn member_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<MemberDashboard>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_role(&[Role::Member, Role::Teacher])?;

    let dashboard = state.services.dashboard.member_dashboard(&caller.email).await?;
    Ok(Json(dashboard))
}

/// Teacher activity dashboard
#[utoipa::path(
    get,
    path = "/dashboard/teacher",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Teacher dashboard", body = TeacherDashboard),
        (status = 403, description = "Access denied")
    )
)]
pub async fn teacher_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<TeacherDashboard>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_role(&[Role::Teacher])?;

    let dashboard = state.services.dashboard.teacher_dashboard(&caller.email).await?;
    Ok(Json(dashboard))
}

/// Library-wide dashboard
#[utoipa::path(
    get,
    path = "/dashboard/admin",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin dashboard", body = AdminDashboard),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn admin_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<AdminDashboard>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let dashboard = state.services.dashboard.admin_dashboard().await?;
    Ok(Json(dashboard))
}
