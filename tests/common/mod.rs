// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dreamscape::{
    config::Config,
    error::AppError,
    models::{
        dream::{Dream, NewDream},
        user::{NewUser, User},
    },
    repository::{DreamRepository, UserRepository},
    routes,
    services::image::{GeneratedImage, ImageError, ImageGenerator},
    state::AppState,
};

/// In-memory credential and entry store.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    dreams: Mutex<Vec<Dream>>,
}

impl MemoryStore {
    /// Stores a dream with raw insights text, bypassing the HTTP layer.
    pub fn insert_dream(&self, user_id: i64, insights: Option<&str>) -> Dream {
        let mut dreams = self.dreams.lock().unwrap();
        let dream = Dream {
            id: dreams.len() as i64 + 1,
            user_id,
            text: "seeded dream".to_string(),
            date: chrono::Utc::now().date_naive(),
            privacy: "private".to_string(),
            image: None,
            insights: insights.map(str::to_string),
        };
        dreams.push(dream.clone());
        dream
    }

    pub fn remove_user(&self, email: &str) {
        self.users.lock().unwrap().retain(|user| user.email != email);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.email == new_user.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                new_user.email
            )));
        }

        let user = User {
            id: users.len() as i64 + 1,
            name: new_user.name,
            email: new_user.email,
            password: new_user.password_hash,
            avatar: new_user.avatar,
            created_at: chrono::Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == id).cloned())
    }
}

#[async_trait]
impl DreamRepository for MemoryStore {
    async fn create_dream(&self, new_dream: NewDream) -> Result<Dream, AppError> {
        let mut dreams = self.dreams.lock().unwrap();
        let dream = Dream {
            id: dreams.len() as i64 + 1,
            user_id: new_dream.user_id,
            text: new_dream.text,
            date: new_dream.date,
            privacy: new_dream.privacy.as_str().to_string(),
            image: new_dream.image,
            insights: new_dream.insights,
        };
        dreams.push(dream.clone());
        Ok(dream)
    }

    async fn list_dreams_by_user(&self, user_id: i64) -> Result<Vec<Dream>, AppError> {
        let dreams = self.dreams.lock().unwrap();
        let mut owned: Vec<Dream> = dreams
            .iter()
            .filter(|dream| dream.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn count_dreams_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        let dreams = self.dreams.lock().unwrap();
        Ok(dreams.iter().filter(|dream| dream.user_id == user_id).count() as i64)
    }
}

/// Image generator double that always fails.
pub struct FailingImages;

#[async_trait]
impl ImageGenerator for FailingImages {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, ImageError> {
        Err(ImageError::EmptyBody)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        image_api_url: None,
        image_api_key: None,
        image_api_timeout: Duration::from_secs(5),
        image_api_max_bytes: 1024,
        rate_limit: None,
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port with placeholder images.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_images(None).await
}

pub async fn spawn_app_with_images(images: Option<Arc<dyn ImageGenerator>>) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        users: store.clone(),
        dreams: store.clone(),
        images,
        config: test_config(),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    }
}

pub fn unique_email() -> String {
    format!("dreamer_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/signup"))
            .json(&serde_json::json!({
                "name": "Dreamer",
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers a fresh user and returns (token, user id).
    pub async fn register_user(&self) -> (String, i64) {
        let body: serde_json::Value = self
            .signup(&unique_email(), "password123")
            .await
            .json()
            .await
            .expect("Failed to parse signup json");

        (
            body["token"].as_str().expect("Token not found").to_string(),
            body["user"]["id"].as_i64().expect("User id not found"),
        )
    }

    pub async fn post_dream(&self, token: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/dreams"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_json(&self, token: &str, path: &str) -> (u16, serde_json::Value) {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}
