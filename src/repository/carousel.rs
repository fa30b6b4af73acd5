//! Carousel slides repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::carousel::{CarouselSlide, CreateSlide, UpdateSlide},
};

#[derive(Clone)]
pub struct CarouselRepository {
    pool: Pool<Postgres>,
}

impl CarouselRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List slides in display order
    pub async fn list(&self) -> AppResult<Vec<CarouselSlide>> {
        let slides = sqlx::query_as::<_, CarouselSlide>(
            "SELECT * FROM carousel_slides ORDER BY position, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(slides)
    }

    /// Create a slide
    pub async fn create(&self, slide: &CreateSlide) -> AppResult<CarouselSlide> {
        let created = sqlx::query_as::<_, CarouselSlide>(
            r#"
            INSERT INTO carousel_slides (title, image_url, link, position)
            VALUES ($1, $2, $3, COALESCE($4, 0))
            RETURNING *
            "#,
        )
        .bind(&slide.title)
        .bind(&slide.image_url)
        .bind(&slide.link)
        .bind(slide.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a slide
    pub async fn update(&self, id: i32, slide: &UpdateSlide) -> AppResult<CarouselSlide> {
        sqlx::query_as::<_, CarouselSlide>(
            r#"
            UPDATE carousel_slides
            SET title = COALESCE($2, title),
                image_url = COALESCE($3, image_url),
                link = COALESCE($4, link),
                position = COALESCE($5, position)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&slide.title)
        .bind(&slide.image_url)
        .bind(&slide.link)
        .bind(slide.position)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Carousel slide with id {} not found", id)))
    }

    /// Delete a slide
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM carousel_slides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Carousel slide with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
