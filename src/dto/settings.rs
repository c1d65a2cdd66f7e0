use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::Difficulty,
    state::trivia::RoundSettings,
};

/// Payload replacing a broadcaster's round settings.
///
/// Values outside the accepted ranges are rejected, never clamped.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SettingsUpdateRequest {
    /// Time viewers have to answer, in milliseconds.
    #[validate(range(min = 5_000, max = 60_000))]
    pub answer_time_ms: u64,
    /// Time between questions, in milliseconds.
    #[validate(range(min = 60_000, max = 1_800_000))]
    pub interval_ms: u64,
    /// Categories questions are drawn from; empty means all.
    #[serde(default)]
    pub categories: Vec<Uuid>,
    /// Difficulties questions are drawn from; empty means all three.
    #[serde(default)]
    pub difficulties: Vec<Difficulty>,
}

impl From<SettingsUpdateRequest> for RoundSettings {
    fn from(value: SettingsUpdateRequest) -> Self {
        Self {
            answer_time_ms: value.answer_time_ms,
            interval_ms: value.interval_ms,
            categories: value.categories.into_iter().collect::<HashSet<_>>(),
            difficulties: value.difficulties.into_iter().collect::<HashSet<_>>(),
        }
    }
}

/// Settings returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsView {
    /// Broadcaster the settings belong to.
    pub broadcaster_id: String,
    /// Time viewers have to answer, in milliseconds.
    pub answer_time_ms: u64,
    /// Time between questions, in milliseconds.
    pub interval_ms: u64,
    /// Categories questions are drawn from; empty means all.
    pub categories: Vec<Uuid>,
    /// Difficulties questions are drawn from; empty means all three.
    pub difficulties: Vec<Difficulty>,
}

impl SettingsView {
    /// Project runtime settings into the client-facing shape.
    pub fn from_settings(broadcaster_id: &str, settings: &RoundSettings) -> Self {
        let mut categories: Vec<Uuid> = settings.categories.iter().copied().collect();
        categories.sort();
        let mut difficulties: Vec<Difficulty> = settings.difficulties.iter().copied().collect();
        difficulties.sort_by_key(|d| d.as_str());

        Self {
            broadcaster_id: broadcaster_id.to_owned(),
            answer_time_ms: settings.answer_time_ms,
            interval_ms: settings.interval_ms,
            categories,
            difficulties,
        }
    }
}
