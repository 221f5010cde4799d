use async_trait::async_trait;
use sqlx::PgPool;

use super::{DreamRepository, UserRepository};
use crate::{
    error::AppError,
    models::{
        dream::{Dream, NewDream},
        user::{NewUser, User},
    },
};

/// PostgreSQL-backed credential and entry store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, avatar, created_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                AppError::Conflict(format!("Email '{}' is already registered", new_user.email))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, avatar, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, avatar, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl DreamRepository for PgStore {
    async fn create_dream(&self, new_dream: NewDream) -> Result<Dream, AppError> {
        sqlx::query_as::<_, Dream>(
            r#"
            INSERT INTO dreams (user_id, text, date, privacy, image, insights)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, text, date, privacy, image, insights
            "#,
        )
        .bind(new_dream.user_id)
        .bind(&new_dream.text)
        .bind(new_dream.date)
        .bind(new_dream.privacy.as_str())
        .bind(&new_dream.image)
        .bind(&new_dream.insights)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create dream: {:?}", e);
            AppError::from(e)
        })
    }

    async fn list_dreams_by_user(&self, user_id: i64) -> Result<Vec<Dream>, AppError> {
        let dreams = sqlx::query_as::<_, Dream>(
            r#"
            SELECT id, user_id, text, date, privacy, image, insights
            FROM dreams
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list dreams: {:?}", e);
            AppError::from(e)
        })?;

        Ok(dreams)
    }

    async fn count_dreams_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dreams WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
