//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterUser, Role, UpdateProfile, User, UserQuery, UserStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a user. Registering an existing email is a no-op success;
    /// the boolean reports whether a new account was created.
    pub async fn register(&self, register: RegisterUser) -> AppResult<(User, bool)> {
        let role = register.role.unwrap_or(Role::Member);

        if let Some(created) = self.repository.users.create_if_absent(&register, role).await? {
            tracing::info!("Registered new {} account for {}", created.role, created.email);
            return Ok((created, true));
        }

        let existing = self.repository.users.get_by_email(&register.email).await?;
        Ok((existing, false))
    }

    /// Get a user by verified email
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.repository.users.get_by_email(email).await
    }

    /// Update the caller's own profile (allow-listed fields only)
    pub async fn update_profile(&self, email: &str, profile: UpdateProfile) -> AppResult<User> {
        self.repository.users.update_profile(email, &profile).await
    }

    /// Search users (admin listing)
    pub async fn search_users(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.search(query).await
    }

    /// Set a user's account status. Admins cannot change their own.
    pub async fn update_status(
        &self,
        admin: &User,
        id: i32,
        status: UserStatus,
    ) -> AppResult<User> {
        let target = self.repository.users.get_by_id(id).await?;
        if target.id == admin.id {
            return Err(AppError::Forbidden(
                "You cannot change your own account status".to_string(),
            ));
        }
        self.repository.users.update_status(target.id, status).await
    }

    /// Delete a user. Admins cannot delete themselves, and accounts with
    /// active borrows are refused until everything is returned.
    pub async fn delete_user(&self, admin: &User, id: i32) -> AppResult<()> {
        let target = self.repository.users.get_by_id(id).await?;
        if target.id == admin.id {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let active = self
            .repository
            .borrows
            .count_active(Some(&target.email))
            .await?;
        if active > 0 {
            return Err(AppError::Validation(format!(
                "User has {} active borrow(s)",
                active
            )));
        }

        self.repository.users.delete(target.id).await?;
        tracing::info!("Deleted user account {}", target.email);
        Ok(())
    }
}
