use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'dreams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Dream {
    pub id: i64,

    /// Owner. Never exposed to clients.
    #[serde(skip)]
    pub user_id: i64,

    pub text: String,

    /// Server-side submission date (UTC).
    pub date: chrono::NaiveDate,

    /// 'private', 'public' or 'anonymous'.
    pub privacy: String,

    /// Generated image as a `data:` URI, or a placeholder URL.
    pub image: Option<String>,

    /// Serialized insights JSON produced by the analysis step. Not validated.
    pub insights: Option<String>,
}

/// Insert payload for the entry store.
#[derive(Debug, Clone)]
pub struct NewDream {
    pub user_id: i64,
    pub text: String,
    pub date: chrono::NaiveDate,
    pub privacy: Privacy,
    pub image: Option<String>,
    pub insights: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Public,
    Anonymous,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Private => "private",
            Privacy::Public => "public",
            Privacy::Anonymous => "anonymous",
        }
    }
}

/// DTO for submitting a dream.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDreamRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Dream text length must be between 1 and 2000 chars"
    ))]
    pub text: String,

    #[serde(default)]
    pub privacy: Privacy,

    /// Either a JSON string (what the web client sends) or a JSON object.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub insights: Option<serde_json::Value>,
}
