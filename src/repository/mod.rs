//! Store interfaces consumed by the HTTP layer and the trend aggregator.
//!
//! Handlers only see these traits; `PgStore` is the PostgreSQL implementation.

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        dream::{Dream, NewDream},
        user::{NewUser, User},
    },
};

pub mod postgres;

pub use postgres::PgStore;

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A duplicate email is `AppError::Conflict`.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}

/// Entry store.
#[async_trait]
pub trait DreamRepository: Send + Sync {
    async fn create_dream(&self, new_dream: NewDream) -> Result<Dream, AppError>;

    /// Every dream owned by `user_id`, newest first. No limit.
    async fn list_dreams_by_user(&self, user_id: i64) -> Result<Vec<Dream>, AppError>;

    async fn count_dreams_by_user(&self, user_id: i64) -> Result<i64, AppError>;
}
