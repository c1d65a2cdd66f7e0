use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::Difficulty,
    dto::validation::validate_user_id,
    state::round::RoundPhase,
};

/// Answer submitted by a viewer while a question is live.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerSubmission {
    /// Viewer submitting the answer.
    pub user_id: String,
    /// Choice the viewer picked.
    pub selected_answer: String,
    /// Correct answer echoed back by the overlay that displayed the question.
    pub correct_answer: String,
    /// How long the viewer took to answer, in milliseconds.
    pub answer_time_ms: u64,
    /// Difficulty of the answered question.
    pub difficulty: Difficulty,
    /// Answer window of the answered question, in milliseconds.
    pub question_duration_ms: u64,
}

impl Validate for AnswerSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_user_id(&self.user_id) {
            errors.add("user_id", e);
        }

        if self.selected_answer.trim().is_empty() {
            let mut err = ValidationError::new("selected_answer_empty");
            err.message = Some("selected answer must not be empty".into());
            errors.add("selected_answer", err);
        }

        if self.correct_answer.trim().is_empty() {
            let mut err = ValidationError::new("correct_answer_empty");
            err.message = Some("correct answer must not be empty".into());
            errors.add("correct_answer", err);
        }

        if self.question_duration_ms == 0 {
            let mut err = ValidationError::new("question_duration_zero");
            err.message = Some("question duration must be strictly positive".into());
            errors.add("question_duration_ms", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Result of an answer submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerOutcome {
    /// Whether the submission was counted (false when no question was live).
    pub accepted: bool,
    /// Whether the selected answer matched the correct one.
    pub correct: bool,
    /// Points awarded for this answer.
    pub points: u32,
    /// Maximum points the question's difficulty allows.
    pub base_points: u32,
    /// Share of the base points kept after the time decay, in percent.
    pub time_bonus_percent: u8,
    /// Viewer's total for the current round.
    pub session_total: i64,
    /// Viewer's persistent total; absent while storage is degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_total: Option<i64>,
}

/// Outcome of a start or end command.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundActionResponse {
    /// Whether the command changed anything.
    pub performed: bool,
    /// Human-readable summary of what happened.
    pub message: String,
}

/// Round phase as exposed to clients.
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum VisibleRoundPhase {
    /// No round is running.
    Inactive,
    /// Counting down to the next question.
    Countdown,
    /// A question is live and accepting answers.
    QuestionLive,
}

impl From<RoundPhase> for VisibleRoundPhase {
    fn from(value: RoundPhase) -> Self {
        match value {
            RoundPhase::Inactive => VisibleRoundPhase::Inactive,
            RoundPhase::Countdown => VisibleRoundPhase::Countdown,
            RoundPhase::QuestionLive => VisibleRoundPhase::QuestionLive,
        }
    }
}

/// Read-only snapshot of the round controller used by overlays on connect.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundStatusResponse {
    /// Current round phase.
    pub phase: VisibleRoundPhase,
    /// Broadcaster owning the round, when one is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcaster_id: Option<String>,
    /// Time until the next question fires, when scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question_in_ms: Option<u64>,
    /// Question currently on screen, when one is live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question_id: Option<Uuid>,
    /// True when the backend operates without a storage backend connection.
    pub degraded: bool,
}

/// One viewer's total in the per-round scoreboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionScoreEntry {
    /// Viewer the total belongs to.
    pub user_id: String,
    /// Points accumulated in the current round.
    pub points: i64,
}
