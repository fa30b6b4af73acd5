//! Contact message endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::contact::{ContactMessage, CreateContactMessage},
};

use super::{current_user, AuthenticatedUser};

#[derive(Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Submit a contact form message
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "contact",
    request_body = CreateContactMessage,
    responses(
        (status = 201, description = "Message stored", body = ContactResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn submit(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateContactMessage>,
) -> AppResult<(StatusCode, Json<ContactResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state.services.contact.submit(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: "Message received".to_string(),
        }),
    ))
}

/// List contact messages (admin only)
#[utoipa::path(
    get,
    path = "/api/contact",
    tag = "contact",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Contact messages", body = Vec<ContactMessage>),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn list(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<Vec<ContactMessage>>> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    let messages = state.services.contact.list().await?;
    Ok(Json(messages))
}

/// Delete a contact message (admin only)
#[utoipa::path(
    delete,
    path = "/api/contact/{id}",
    tag = "contact",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Message ID")
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let caller = current_user(&state, &identity).await?;
    caller.require_admin()?;

    state.services.contact.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
