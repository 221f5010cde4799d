// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode, header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user::User, state::AppState};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the user's email.
    pub sub: String,
    /// Issued-at as Unix timestamp.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new HS256 token whose subject is `email`.
pub fn sign_jwt(email: &str, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize;

    let claims = Claims {
        sub: email.to_owned(),
        iat: now,
        exp: now + expiration_seconds as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies signature and expiry, returning the decoded `Claims`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication.
///
/// Validates the bearer token and injects `Claims` into the request extensions.
/// Anything else is rejected with 401 before the handler runs.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match verify_jwt(token, &config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(_) => {
            tracing::debug!("Rejected request with invalid token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// The authenticated caller, resolved from the token's email subject.
///
/// Requires `auth_middleware` on the route. A valid token whose user no longer
/// exists is rejected with 404.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or(AppError::AuthError("Missing credentials".to_string()))?;

        let user = state
            .users
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn signed_token_carries_email_subject() {
        let token = sign_jwt("dreamer@example.com", SECRET, 600).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "dreamer@example.com");
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt("dreamer@example.com", SECRET, 600).unwrap();
        assert!(matches!(
            verify_jwt(&token, "another_secret"),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            sub: "dreamer@example.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
    }
}
