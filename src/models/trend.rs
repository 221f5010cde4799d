use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Emotion and theme frequencies across one user's dreams.
///
/// `total_dreams` is only reported by the email-resolved entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_dreams: Option<usize>,
    pub emotion_trends: BTreeMap<String, u64>,
    pub theme_trends: BTreeMap<String, u64>,
}
