use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::dream::{CreateDreamRequest, Dream, NewDream},
    repository::DreamRepository,
    services::{
        image::{ImageGenerator, enrich_image},
        insights::normalize_insights,
    },
    utils::jwt::CurrentUser,
};

/// Submit a new dream.
///
/// The text is stored trimmed but otherwise as written, the date is set server-side and an image is
/// generated before the dream is stored. Image failures fall back to a
/// placeholder and never fail the request.
#[utoipa::path(
    post,
    path = "/api/dreams",
    tag = "dreams",
    request_body = CreateDreamRequest,
    responses(
        (status = 201, description = "Dream stored", body = Dream),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn create_dream(
    State(dreams): State<Arc<dyn DreamRepository>>,
    State(images): State<Option<Arc<dyn ImageGenerator>>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateDreamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let text = payload.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::BadRequest("Dream text must not be empty".to_string()));
    }

    let image = enrich_image(images.as_deref(), &text).await;

    let dream = dreams
        .create_dream(NewDream {
            user_id: user.id,
            date: chrono::Utc::now().date_naive(),
            privacy: payload.privacy,
            image: Some(image),
            insights: normalize_insights(payload.insights),
            text,
        })
        .await?;

    tracing::info!(user_id = user.id, dream_id = dream.id, "Dream saved");

    Ok((StatusCode::CREATED, Json(dream)))
}

/// List all dreams of the current user, newest first.
#[utoipa::path(
    get,
    path = "/api/dreams",
    tag = "dreams",
    responses(
        (status = 200, description = "The caller's dreams", body = Vec<Dream>),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn list_dreams(
    State(dreams): State<Arc<dyn DreamRepository>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let list = dreams.list_dreams_by_user(user.id).await?;
    Ok(Json(list))
}
