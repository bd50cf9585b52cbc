//! Service layer between the HTTP handlers and the store

mod categories;
mod items;
mod orders;
mod users;

pub use categories::CategoryService;
pub use items::ItemService;
pub use orders::OrderService;
pub use users::UserService;

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid login or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
