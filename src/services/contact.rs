//! Contact messages service

use crate::{
    error::AppResult,
    models::contact::{ContactMessage, CreateContactMessage},
    repository::Repository,
};

#[derive(Clone)]
pub struct ContactService {
    repository: Repository,
}

impl ContactService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn submit(&self, message: CreateContactMessage) -> AppResult<ContactMessage> {
        self.repository.contact.create(&message).await
    }

    pub async fn list(&self) -> AppResult<Vec<ContactMessage>> {
        self.repository.contact.list().await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.contact.delete(id).await
    }
}
