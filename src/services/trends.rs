//! Insight-trend aggregation.
//!
//! Every call rebuilds its counters from the stored dreams; nothing is cached.
//! Each dream is first classified into an [`EntryOutcome`], so one malformed
//! insights payload only removes that dream's contribution.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::{
    error::AppError,
    models::{dream::Dream, trend::TrendReport, user::User},
    repository::{DreamRepository, UserRepository},
};

/// Labels found in one dream's insights. Each label counts once per dream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightLabels {
    pub emotions: BTreeSet<String>,
    pub themes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Insights are null or empty.
    NoInsights,
    /// Text is not valid JSON.
    Malformed(String),
    /// Valid JSON, but not an object at the top level.
    NotAnObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Counted(InsightLabels),
    Skipped(SkipReason),
}

/// Classifies one insights payload.
///
/// Recognized keys:
/// * `"emotions"`: object, one label per key (values ignored).
/// * `"themes"`: array, one label per element.
/// * `"emotion"` / `"theme"`: a single scalar label.
///
/// A key holding any other shape contributes nothing; the rest of the object
/// is still read.
pub fn classify_insights(insights: Option<&str>) -> EntryOutcome {
    let raw = match insights {
        Some(raw) if !raw.is_empty() => raw,
        _ => return EntryOutcome::Skipped(SkipReason::NoInsights),
    };

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return EntryOutcome::Skipped(SkipReason::NotAnObject),
        Err(e) => return EntryOutcome::Skipped(SkipReason::Malformed(e.to_string())),
    };

    EntryOutcome::Counted(collect_labels(&object))
}

fn collect_labels(object: &Map<String, Value>) -> InsightLabels {
    let mut labels = InsightLabels::default();

    if let Some(Value::Object(emotions)) = object.get("emotions") {
        labels.emotions.extend(emotions.keys().cloned());
    }
    if let Some(Value::Array(themes)) = object.get("themes") {
        labels
            .themes
            .extend(themes.iter().filter_map(element_label));
    }

    if let Some(emotion) = object.get("emotion").and_then(scalar_label) {
        labels.emotions.insert(emotion);
    }
    if let Some(theme) = object.get("theme").and_then(scalar_label) {
        labels.themes.insert(theme);
    }

    labels
}

/// String form of a `themes` element. Nested containers render as compact JSON.
fn element_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Running totals over a scan.
#[derive(Debug, Clone, Default)]
pub struct TrendTally {
    scanned: usize,
    skipped: usize,
    emotions: BTreeMap<String, u64>,
    themes: BTreeMap<String, u64>,
}

impl TrendTally {
    pub fn record(&mut self, outcome: EntryOutcome) {
        self.scanned += 1;
        match outcome {
            EntryOutcome::Counted(labels) => {
                for emotion in labels.emotions {
                    *self.emotions.entry(emotion).or_insert(0) += 1;
                }
                for theme in labels.themes {
                    *self.themes.entry(theme).or_insert(0) += 1;
                }
            }
            EntryOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    /// Number of dreams seen, with or without insights.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_report(self, include_total: bool) -> TrendReport {
        TrendReport {
            total_dreams: include_total.then_some(self.scanned),
            emotion_trends: self.emotions,
            theme_trends: self.themes,
        }
    }
}

/// Tallies a set of dreams. Unparseable insights are logged and skipped.
pub fn aggregate(dreams: &[Dream]) -> TrendTally {
    let mut tally = TrendTally::default();

    for dream in dreams {
        let outcome = classify_insights(dream.insights.as_deref());
        match &outcome {
            EntryOutcome::Skipped(SkipReason::Malformed(error)) => {
                tracing::warn!(dream_id = dream.id, %error, "Failed to parse insights");
            }
            EntryOutcome::Skipped(SkipReason::NotAnObject) => {
                tracing::warn!(dream_id = dream.id, "Insights are not a JSON object");
            }
            _ => {}
        }
        tally.record(outcome);
    }

    tally
}

/// Trends for an already-resolved user, including `totalDreams`.
pub async fn trends_for_user(
    dreams: &dyn DreamRepository,
    user: &User,
) -> Result<TrendReport, AppError> {
    let entries = dreams.list_dreams_by_user(user.id).await?;
    let tally = aggregate(&entries);

    tracing::debug!(
        user_id = user.id,
        scanned = tally.scanned(),
        skipped = tally.skipped(),
        "Computed dream trends"
    );

    Ok(tally.into_report(true))
}

/// Trends keyed by numeric user id. Omits `totalDreams`.
pub async fn trends_for_user_id(
    users: &dyn UserRepository,
    dreams: &dyn DreamRepository,
    user_id: i64,
) -> Result<TrendReport, AppError> {
    let user = users
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let entries = dreams.list_dreams_by_user(user.id).await?;
    Ok(aggregate(&entries).into_report(false))
}
