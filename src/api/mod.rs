//! API handlers for the Libris REST endpoints

pub mod books;
pub mod borrows;
pub mod carousel;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::AppError,
    models::user::{IdentityClaims, User},
    AppState,
};

/// Verified identity from a bearer token. The token carries an email only;
/// role comes from the user store via [`current_user`].
pub struct Identity {
    pub email: String,
}

/// Extractor for the verified identity behind the Authorization header
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized Access".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Unauthorized("Unauthorized Access".to_string()));
        }

        let token = &auth_header[7..];

        let claims = IdentityClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid Token".to_string()))?;

        Ok(AuthenticatedUser(Identity { email: claims.sub }))
    }
}

/// Resolve the caller's account (and thereby role) from the user store.
/// Privileged handlers must go through this rather than trusting anything
/// beyond the email in the token.
pub(crate) async fn current_user(state: &AppState, identity: &Identity) -> Result<User, AppError> {
    state.services.users.get_by_email(&identity.email).await
}
