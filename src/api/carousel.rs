//! Carousel slide endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::carousel::{CarouselSlide, CreateSlide, UpdateSlide},
};

use super::{current_user, AuthenticatedUser};

/// List carousel slides in display order
#[utoipa::path(
    get,
    path = "/carousel",
    tag = "carousel",
    responses(
        (status = 200, description = "Carousel slides", body = Vec<CarouselSlide>)
    )
)]
pub async fn list(State(state): State<crate::AppState>) -> AppResult<Json<Vec<CarouselSlide>>> {
    let slides = state.services.carousel.list().await?;
    Ok(Json(slides))
}

/// Create a carousel slide (admin only)
#[utoipa::path(
    post,
    path = "/carousel",
    tag = "carousel",
    security(("bearer_auth" = [])),
    request_body = CreateSlide,
    responses(
        (status = 201, description = "Slide created", body = CarouselSlide),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(request): Json<CreateSlide>,
) -> AppResult<(StatusCode, Json<CarouselSlide>)> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let slide = state.services.carousel.create(request).await?;
    Ok((StatusCode::CREATED, Json(slide)))
}

/// Update a carousel slide (admin only)
#[utoipa::path(
    put,
    path = "/carousel/{id}",
    tag = "carousel",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Slide ID")
    ),
    request_body = UpdateSlide,
    responses(
        (status = 200, description = "Slide updated", body = CarouselSlide),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Slide not found")
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateSlide>,
) -> AppResult<Json<CarouselSlide>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let slide = state.services.carousel.update(id, request).await?;
    Ok(Json(slide))
}

/// Delete a carousel slide (admin only)
#[utoipa::path(
    delete,
    path = "/carousel/{id}",
    tag = "carousel",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Slide ID")
    ),
    responses(
        (status = 204, description = "Slide deleted"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Slide not found")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    state.services.carousel.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
