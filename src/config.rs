// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

use crate::services::image::DEFAULT_MAX_IMAGE_BYTES;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Image generation endpoint. Placeholder images are used when unset.
    pub image_api_url: Option<Url>,
    pub image_api_key: Option<String>,
    pub image_api_timeout: Duration,
    /// Largest accepted image body, in bytes.
    pub image_api_max_bytes: usize,
    /// Per-IP limit on the auth routes. Disabled when unset.
    pub rate_limit: Option<RateLimit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

const DEFAULT_JWT_EXPIRATION: u64 = 86_400;
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RATE_LIMIT_BURST: u32 = 5;

impl Config {
    /// Reads the configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or("DATABASE_URL must be set")?;
        let jwt_secret = get("JWT_SECRET").ok_or("JWT_SECRET must be set")?;

        let jwt_expiration =
            parse_or("JWT_EXPIRATION", get("JWT_EXPIRATION"), DEFAULT_JWT_EXPIRATION)?;
        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let image_api_url = get("IMAGE_API_URL")
            .map(|raw| parse_http_url(&raw))
            .transpose()?;
        let image_api_key = get("IMAGE_API_KEY");
        let image_api_timeout = Duration::from_secs(parse_or(
            "IMAGE_API_TIMEOUT_SECS",
            get("IMAGE_API_TIMEOUT_SECS"),
            DEFAULT_IMAGE_TIMEOUT_SECS,
        )?);

        let image_api_max_bytes = parse_or(
            "IMAGE_API_MAX_BYTES",
            get("IMAGE_API_MAX_BYTES"),
            DEFAULT_MAX_IMAGE_BYTES,
        )?;

        let rate_limit = match get("RATE_LIMIT_PER_SECOND") {
            Some(raw) => Some(RateLimit {
                per_second: parse_or("RATE_LIMIT_PER_SECOND", Some(raw), 0)?,
                burst_size: parse_or(
                    "RATE_LIMIT_BURST",
                    get("RATE_LIMIT_BURST"),
                    DEFAULT_RATE_LIMIT_BURST,
                )?,
            }),
            None => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            cors_origins,
            image_api_url,
            image_api_key,
            image_api_timeout,
            image_api_max_bytes,
            rate_limit,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", key, value)),
        None => Ok(default),
    }
}

fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("IMAGE_API_URL is invalid: {}", e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("IMAGE_API_URL must be http or https, got {}", other)),
    }
}
