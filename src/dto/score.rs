use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::ScoreEntity;
use crate::dto::format_system_time;

/// One viewer's persistent score total.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreView {
    /// Viewer the total belongs to.
    pub user_id: String,
    /// Accumulated points across all rounds.
    pub points: i64,
    /// Last time points were added, RFC 3339.
    pub updated_at: String,
}

impl From<ScoreEntity> for ScoreView {
    fn from(value: ScoreEntity) -> Self {
        Self {
            user_id: value.user_id,
            points: value.points,
            updated_at: format_system_time(value.updated_at),
        }
    }
}

/// A single viewer's persistent total.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserTotalResponse {
    /// Viewer the total belongs to.
    pub user_id: String,
    /// Accumulated points across all rounds.
    pub points: i64,
}

/// Query parameters accepted by the leaderboard route.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TopScoresQuery {
    /// Maximum number of entries to return (default 10, capped at 100).
    #[serde(default)]
    pub limit: Option<u32>,
}
