//! Libris Library Management Backend
//!
//! A Rust REST API server for a school library: book catalog, user accounts,
//! a borrow/return workflow with admin confirmation, and activity dashboards.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
