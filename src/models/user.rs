// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_AVATAR: &str = "🌙";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    pub name: String,

    /// Unique, stored lower-cased.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// Short display glyph (usually an emoji).
    pub avatar: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for the credential store. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
}

/// DTO for creating a new user (Signup).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name length must be between 1 and 100 characters."
    ))]
    pub name: String,
    #[validate(email(message = "Email address is not valid."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(length(max = 16, message = "Avatar must be at most 16 characters."))]
    pub avatar: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Returned by signup and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Current user's profile and statistics.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub dreams_count: i64,
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
