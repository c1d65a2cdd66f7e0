use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Question difficulty tier, shared between persistence, DTOs, and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Lowest scoring tier.
    Easy,
    /// Middle scoring tier, also the fallback for unclassified questions.
    Medium,
    /// Highest scoring tier.
    Hard,
}

impl Difficulty {
    /// All difficulty tiers, in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Stable lowercase name used in storage filters and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// Trivia question persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionEntity {
    /// Primary key of the question.
    pub id: Uuid,
    /// Question text shown to viewers.
    pub text: String,
    /// The single correct answer.
    pub correct_answer: String,
    /// The three distractors presented alongside the correct answer.
    pub wrong_answers: [String; 3],
    /// Category the question belongs to.
    pub category_id: Uuid,
    /// Difficulty tier driving the base points.
    pub difficulty: Difficulty,
}

/// Per-broadcaster round settings persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsEntity {
    /// Broadcaster the settings belong to.
    pub broadcaster_id: String,
    /// Time viewers have to answer a question, in milliseconds.
    pub answer_time_ms: u64,
    /// Time between questions, in milliseconds.
    pub interval_ms: u64,
    /// Categories questions are drawn from; empty means all.
    pub categories: Vec<Uuid>,
    /// Difficulties questions are drawn from; empty means all three.
    pub difficulties: Vec<Difficulty>,
    /// Last time the settings were updated.
    pub updated_at: SystemTime,
}

/// Persistent score total for one viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Viewer the total belongs to.
    pub user_id: String,
    /// Accumulated points across all rounds.
    pub points: i64,
    /// Last time points were added.
    pub updated_at: SystemTime,
}
