//! Carousel slides service

use crate::{
    error::AppResult,
    models::carousel::{CarouselSlide, CreateSlide, UpdateSlide},
    repository::Repository,
};

#[derive(Clone)]
pub struct CarouselService {
    repository: Repository,
}

impl CarouselService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<CarouselSlide>> {
        self.repository.carousel.list().await
    }

    pub async fn create(&self, slide: CreateSlide) -> AppResult<CarouselSlide> {
        self.repository.carousel.create(&slide).await
    }

    pub async fn update(&self, id: i32, slide: UpdateSlide) -> AppResult<CarouselSlide> {
        self.repository.carousel.update(id, &slide).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.carousel.delete(id).await
    }
}
