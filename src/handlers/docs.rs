use axum::Json;
use utoipa::OpenApi;

use crate::{
    handlers::{auth, dreams, trends},
    models::{
        dream::{CreateDreamRequest, Dream, Privacy},
        trend::TrendReport,
        user::{AuthResponse, LoginRequest, MeResponse, SignupRequest, User},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Dreamscape API", description = "Dream journal with image enrichment and trend analysis"),
    paths(
        auth::signup,
        auth::login,
        auth::me,
        dreams::create_dream,
        dreams::list_dreams,
        trends::get_trends,
        trends::get_user_trends,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        AuthResponse,
        MeResponse,
        User,
        CreateDreamRequest,
        Dream,
        Privacy,
        TrendReport,
    )),
    tags(
        (name = "auth", description = "Signup, login and profile"),
        (name = "dreams", description = "Dream journal entries"),
        (name = "trends", description = "Emotion and theme frequencies"),
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
