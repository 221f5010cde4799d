//! Image enrichment for newly submitted dreams.
//!
//! The dream text is posted to an external generator as a prompt. Any failure
//! falls back to a deterministic placeholder URL, so submission never fails
//! because of this step.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde_json::json;
use url::Url;

use crate::config::Config;

const FALLBACK_MIME: &str = "image/png";
/// Upper bound on a generated image body, in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Raw image returned by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    /// `image/*` type reported by the generator, if any.
    pub content_type: Option<String>,
}

impl GeneratedImage {
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type.as_deref().unwrap_or(FALLBACK_MIME),
            BASE64.encode(&self.bytes)
        )
    }
}

#[derive(Debug)]
pub enum ImageError {
    Request(reqwest::Error),
    Status(StatusCode),
    EmptyBody,
    /// Body exceeded the configured limit (in bytes).
    TooLarge(usize),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Request(e) => write!(f, "image request failed: {}", e),
            ImageError::Status(status) => write!(f, "image generation failed with status: {}", status),
            ImageError::EmptyBody => write!(f, "image generator returned an empty body"),
            ImageError::TooLarge(limit) => {
                write!(f, "image generator returned more than {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl From<reqwest::Error> for ImageError {
    fn from(err: reqwest::Error) -> Self {
        ImageError::Request(err)
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError>;
}

/// Posts `{"prompt": ...}` to a configured endpoint and expects image bytes back.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    max_bytes: usize,
}

impl HttpImageGenerator {
    pub fn new(endpoint: Url, api_key: Option<String>, timeout: Duration) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// `None` when no endpoint is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ImageError> {
        config
            .image_api_url
            .clone()
            .map(|endpoint| {
                Self::new(
                    endpoint,
                    config.image_api_key.clone(),
                    config.image_api_timeout,
                )
                .map(|generator| generator.with_max_bytes(config.image_api_max_bytes))
            })
            .transpose()
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "prompt": prompt }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let mut response = request.send().await?;
        if response.status() != StatusCode::OK {
            return Err(ImageError::Status(response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|mime| mime.trim().to_ascii_lowercase())
            .filter(|mime| mime.starts_with("image/"));

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(ImageError::TooLarge(self.max_bytes));
        }

        // Content-Length may be absent or wrong; enforce the limit while reading.
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(ImageError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(ImageError::EmptyBody);
        }

        Ok(GeneratedImage {
            bytes,
            content_type,
        })
    }
}

/// Resolves the image reference for a dream. Never fails.
pub async fn enrich_image(generator: Option<&dyn ImageGenerator>, text: &str) -> String {
    let Some(generator) = generator else {
        return placeholder_image_url(text);
    };

    match generator.generate(text).await {
        Ok(image) => image.to_data_uri(),
        Err(e) => {
            tracing::warn!(error = %e, "Image generation failed, using placeholder image");
            placeholder_image_url(text)
        }
    }
}

/// Deterministic stock image seeded by the text.
pub fn placeholder_image_url(text: &str) -> String {
    format!("https://picsum.photos/seed/{}/400/400", text_seed(text))
}

/// 32-bit polynomial hash (multiplier 31) over UTF-16 code units.
fn text_seed(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl ImageGenerator for Failing {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, ImageError> {
            Err(ImageError::EmptyBody)
        }
    }

    struct Fixed;

    #[async_trait]
    impl ImageGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, ImageError> {
            Ok(GeneratedImage {
                bytes: b"img".to_vec(),
                content_type: Some("image/jpeg".to_string()),
            })
        }
    }

    #[test]
    fn seed_matches_known_values() {
        assert_eq!(text_seed(""), 0);
        assert_eq!(text_seed("ab"), 3105);
        assert_eq!(text_seed("hello"), 99_162_322);
        assert_eq!(text_seed("hello world"), 1_794_106_052);
    }

    #[test]
    fn placeholder_is_stable() {
        assert_eq!(
            placeholder_image_url("hello"),
            "https://picsum.photos/seed/99162322/400/400"
        );
    }

    #[test]
    fn data_uri_defaults_to_png() {
        let image = GeneratedImage {
            bytes: b"img".to_vec(),
            content_type: None,
        };
        assert_eq!(image.to_data_uri(), "data:image/png;base64,aW1n");
    }

    #[tokio::test]
    async fn failures_fall_back_to_placeholder() {
        let failing: &dyn ImageGenerator = &Failing;
        assert_eq!(
            enrich_image(Some(failing), "hello").await,
            placeholder_image_url("hello")
        );
        assert_eq!(enrich_image(None, "hello").await, placeholder_image_url("hello"));
    }

    #[tokio::test]
    async fn generated_images_become_data_uris() {
        let fixed: &dyn ImageGenerator = &Fixed;
        assert_eq!(
            enrich_image(Some(fixed), "hello").await,
            "data:image/jpeg;base64,aW1n"
        );
    }
}
