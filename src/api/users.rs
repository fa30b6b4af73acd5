//! User management endpoints

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
    models::user::{RegisterUser, UpdateProfile, UpdateUserStatus, User, UserQuery},
};

use super::{books::PaginatedResponse, current_user, AuthenticatedUser};

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

/// Current-user response
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub success: bool,
    pub user: User,
}

/// Profile update response
#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

/// Register a new user account. Registering an existing email is a no-op
/// success.
#[utoipa::path(
    post,
    path = "/register",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 200, description = "User already registered", body = RegisterResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, created) = state.services.users.register(request).await?;

    let (status, message) = if created {
        (StatusCode::CREATED, "User registered successfully")
    } else {
        (StatusCode::OK, "User already registered")
    };

    Ok((
        status,
        Json(RegisterResponse {
            success: true,
            message: message.to_string(),
            user,
        }),
    ))
}

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let user = current_user(&state, &identity).await?;
    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}

/// Update the caller's own profile. Only allow-listed fields are applied;
/// role, status and email cannot be changed here.
#[utoipa::path(
    put,
    path = "/update",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(request): Json<UpdateProfile>,
) -> AppResult<Json<ProfileResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .services
        .users
        .update_profile(&identity.email, request)
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile updated".to_string(),
        user,
    }))
}

/// List users with search and pagination (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "List of users", body = PaginatedResponse<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<PaginatedResponse<User>>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let (users, total) = state.services.users.search_users(&query).await?;

    Ok(Json(PaginatedResponse {
        items: users,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Delete a user (admin only; not yourself, not while borrows are active)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "User has active borrows"),
        (status = 403, description = "Admin access only, or deleting yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    state.services.users.delete_user(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set a user's account status (admin only; not yourself)
#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserStatus,
    responses(
        (status = 200, description = "Status updated", body = User),
        (status = 403, description = "Admin access only, or changing yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserStatus>,
) -> AppResult<Json<User>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let user = state
        .services
        .users
        .update_status(&caller, id, request.status)
        .await?;
    Ok(Json(user))
}
