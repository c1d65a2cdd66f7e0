use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::Difficulty;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// SSE event name, when the payload is typed.
    pub event: Option<String>,
    /// Serialized payload placed in the SSE data field.
    pub data: String,
}

impl ServerEvent {
    /// Wrap an already-serialized payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

/// Events the round controller publishes to viewers.
#[derive(Debug, Clone)]
pub enum RoundEvent {
    /// A round just started.
    RoundStarted(RoundStartedEvent),
    /// A question went live.
    Question(QuestionEvent),
    /// Time remaining before the next question.
    Countdown(CountdownEvent),
    /// The round ended.
    RoundEnded(RoundEndedEvent),
    /// A broadcaster's settings changed.
    SettingsChanged(SettingsChangedEvent),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Broadcast once when a round starts.
pub struct RoundStartedEvent {
    /// Configured pause between questions.
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Broadcast when a question goes live.
///
/// Carries the correct answer so the overlay can reveal it when the window
/// closes, even if the backend degrades in the meantime.
pub struct QuestionEvent {
    /// Identifier of the question.
    pub question_id: Uuid,
    /// Question text.
    pub text: String,
    /// All four choices in presentation order (already shuffled).
    pub choices: Vec<String>,
    /// The correct answer.
    pub correct_answer: String,
    /// Time viewers have to answer.
    pub duration_ms: u64,
    /// Category of the question.
    pub category_id: Uuid,
    /// Difficulty tier of the question.
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Broadcast every tick while counting down to the next question.
pub struct CountdownEvent {
    /// Time remaining before the next question fires.
    pub time_remaining_ms: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Broadcast once when a round ends.
pub struct RoundEndedEvent {}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Broadcast when a broadcaster's settings are replaced.
pub struct SettingsChangedEvent {
    /// New answer window.
    pub answer_time_ms: u64,
    /// New pause between questions.
    pub interval_ms: u64,
}
