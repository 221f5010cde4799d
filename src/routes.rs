// src/routes.rs

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    handlers::{auth, docs, dreams, trends},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public auth routes, optionally rate limited per client IP.
/// * Token-protected dream, trend and profile routes.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let mut auth_routes: Router<AppState> = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login));

    if let Some(limit) = state.config.rate_limit {
        // Keyed by peer IP: serve with `into_make_service_with_connect_info`.
        match GovernorConfigBuilder::default()
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .finish()
        {
            Some(governor_conf) => {
                auth_routes = auth_routes.layer(GovernorLayer::new(Arc::new(governor_conf)));
            }
            None => tracing::warn!("Invalid rate limit {:?}, auth routes are unlimited", limit),
        }
    }

    let protected_routes: Router<AppState> = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/dreams",
            get(dreams::list_dreams).post(dreams::create_dream),
        )
        .route("/api/trends", get(trends::get_trends))
        .route("/api/trends/users/{user_id}", get(trends::get_user_trends))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(auth_routes)
        .merge(protected_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
