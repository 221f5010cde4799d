use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::trend::TrendReport,
    repository::{DreamRepository, UserRepository},
    services::trends::{trends_for_user, trends_for_user_id},
    utils::jwt::CurrentUser,
};

/// Emotion and theme trends across the caller's dreams.
#[utoipa::path(
    get,
    path = "/api/trends",
    tag = "trends",
    responses(
        (status = 200, description = "Trend counts including totalDreams", body = TrendReport),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_trends(
    State(dreams): State<Arc<dyn DreamRepository>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let report = trends_for_user(dreams.as_ref(), &user).await?;
    Ok(Json(report))
}

/// Trends keyed by user id. Callers may only read their own id.
#[utoipa::path(
    get,
    path = "/api/trends/users/{user_id}",
    tag = "trends",
    params(("user_id" = i64, Path, description = "Owner of the dreams")),
    responses(
        (status = 200, description = "Trend counts", body = TrendReport),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Another user's id"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_user_trends(
    State(users): State<Arc<dyn UserRepository>>,
    State(dreams): State<Arc<dyn DreamRepository>>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if user.id != user_id {
        return Err(AppError::Forbidden(
            "You can only view your own trends".to_string(),
        ));
    }

    let report = trends_for_user_id(users.as_ref(), dreams.as_ref(), user_id).await?;
    Ok(Json(report))
}
