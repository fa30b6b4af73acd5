//! Business logic services

pub mod borrows;
pub mod carousel;
pub mod catalog;
pub mod contact;
pub mod dashboard;
pub mod users;

use crate::{
    config::{CatalogConfig, PolicyConfig},
    policy::LoanPolicy,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub borrows: borrows::BorrowsService,
    pub dashboard: dashboard::DashboardService,
    pub contact: contact::ContactService,
    pub carousel: carousel::CarouselService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        policy_config: PolicyConfig,
        catalog_config: CatalogConfig,
    ) -> Self {
        let policy = LoanPolicy::new(policy_config);
        Self {
            users: users::UsersService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), catalog_config),
            borrows: borrows::BorrowsService::new(repository.clone(), policy),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            contact: contact::ContactService::new(repository.clone()),
            carousel: carousel::CarouselService::new(repository),
        }
    }
}
