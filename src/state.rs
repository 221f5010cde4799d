use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    repository::{DreamRepository, UserRepository},
    services::image::ImageGenerator,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub dreams: Arc<dyn DreamRepository>,
    /// `None` means dreams always get a placeholder image.
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<dyn UserRepository> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Arc<dyn DreamRepository> {
    fn from_ref(state: &AppState) -> Self {
        state.dreams.clone()
    }
}

impl FromRef<AppState> for Option<Arc<dyn ImageGenerator>> {
    fn from_ref(state: &AppState) -> Self {
        state.images.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
