//! Repository layer for database operations

pub mod books;
pub mod borrows;
pub mod carousel;
pub mod contact;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub borrows: borrows::BorrowsRepository,
    pub contact: contact::ContactRepository,
    pub carousel: carousel::CarouselRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            contact: contact::ContactRepository::new(pool.clone()),
            carousel: carousel::CarouselRepository::new(pool.clone()),
            pool,
        }
    }
}
