// tests/middleware_tests.rs

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{MemoryStore, test_config};
use dreamscape::{routes, state::AppState, utils::jwt::sign_jwt};
use tower::ServiceExt;

fn app() -> axum::Router {
    let store = Arc::new(MemoryStore::default());
    routes::create_router(AppState {
        users: store.clone(),
        dreams: store,
        images: None,
        config: test_config(),
    })
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let response = app()
        .oneshot(Request::get("/api/trends").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::get("/api/dreams")
                .header(header::AUTHORIZATION, "Basic ZHJlYW06ZXI=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() {
    let token = sign_jwt("dreamer@example.com", "some_other_secret", 600).unwrap();

    let response = app()
        .oneshot(
            Request::get("/api/trends")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_for_unknown_user_is_not_found() {
    let config = test_config();
    let token = sign_jwt("ghost@example.com", &config.jwt_secret, 600).unwrap();

    let response = app()
        .oneshot(
            Request::get("/api/trends")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
