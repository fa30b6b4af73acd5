//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterUser, Role, UpdateProfile, User, UserQuery, UserStatus},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Find user by email, if registered
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a user unless the email is already registered.
    /// Returns `None` when the email already exists (idempotent registration).
    pub async fn create_if_absent(
        &self,
        register: &RegisterUser,
        role: Role,
    ) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&register.email)
        .bind(&register.name)
        .bind(role)
        .bind(UserStatus::Active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update the caller's own profile (allow-listed fields only)
    pub async fn update_profile(&self, email: &str, profile: &UpdateProfile) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), updated_at = NOW()
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(&profile.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Search users with pagination
    pub async fn search(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = vec!["1=1".to_string()];
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref search) = query.search {
            binds.push(format!("%{}%", search.to_lowercase()));
            let i = binds.len();
            conditions.push(format!(
                "(LOWER(email) LIKE ${i} OR LOWER(COALESCE(name, '')) LIKE ${i})"
            ));
        }

        let where_clause = conditions.join(" AND ");

        let count_query = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &binds {
            count = count.bind(bind);
        }
        let total = count.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM users WHERE {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut select = sqlx::query_as::<_, User>(&select_query);
        for bind in &binds {
            select = select.bind(bind);
        }
        let users = select.fetch_all(&self.pool).await?;

        Ok((users, total))
    }

    /// Set a user's account status
    pub async fn update_status(&self, id: i32, status: UserStatus) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Delete a user
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
