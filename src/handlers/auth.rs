// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{
        AuthResponse, DEFAULT_AVATAR, LoginRequest, MeResponse, NewUser, SignupRequest,
        normalize_email,
    },
    repository::{DreamRepository, UserRepository},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{CurrentUser, sign_jwt},
    },
};

/// Registers a new user and signs them in.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with a token and the user (excluding password).
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn signup(
    State(users): State<Arc<dyn UserRepository>>,
    State(config): State<Config>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Length limits apply to the name as stored.
    payload.name = payload.name.trim().to_string();
    payload.validate()?;

    let avatar = payload
        .avatar
        .as_deref()
        .map(str::trim)
        .filter(|avatar| !avatar.is_empty())
        .unwrap_or(DEFAULT_AVATAR)
        .to_string();

    let user = users
        .create_user(NewUser {
            name: payload.name,
            email: normalize_email(&payload.email),
            password_hash: hash_password(&payload.password)?,
            avatar,
        })
        .await?;

    tracing::info!(user_id = user.id, "New user registered");

    let token = sign_jwt(&user.email, &config.jwt_secret, config.jwt_expiration)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown email and wrong password get the same 401 message.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(users): State<Arc<dyn UserRepository>>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invalid = || AppError::AuthError("Invalid credentials".to_string());

    let user = users
        .find_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let token = sign_jwt(&user.email, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(AuthResponse { token, user }))
}

/// Get current user's profile and statistics.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn me(
    State(dreams): State<Arc<dyn DreamRepository>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let dreams_count = dreams.count_dreams_by_user(user.id).await?;

    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        avatar: user.avatar,
        created_at: user.created_at,
        dreams_count,
    }))
}
