// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dreamscape::config::Config;
use dreamscape::repository::PgStore;
use dreamscape::routes;
use dreamscape::services::image::{HttpImageGenerator, ImageGenerator};
use dreamscape::state::AppState;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {}", e));

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let pool = connect_with_retry(&config.database_url).await;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to run database migrations: {}", e));
    tracing::info!("Migrations applied successfully.");

    let images: Option<Arc<dyn ImageGenerator>> = match HttpImageGenerator::from_config(&config) {
        Ok(Some(generator)) => {
            tracing::info!("Image generation enabled");
            Some(Arc::new(generator))
        }
        Ok(None) => {
            tracing::info!("IMAGE_API_URL not set, dreams get placeholder images");
            None
        }
        Err(e) => {
            tracing::error!("Failed to build image client, using placeholders: {}", e);
            None
        }
    };

    let store = PgStore::new(pool);
    let state = AppState {
        users: Arc::new(store.clone()),
        dreams: Arc::new(store),
        images,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", addr, e));

    // Connect info feeds the per-IP rate limiter.
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!("Server error: {}", e);
    }
}

/// Initialize Database Pool with Retry
async fn connect_with_retry(database_url: &str) -> PgPool {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => return pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
