//! The round controller: lifecycle commands, the periodic tick, and answer
//! handling.
//!
//! All round state lives behind one async lock on [`AppState`]. Guard flags
//! are flipped before the first suspension point of every mutating path and
//! the lock is never held across a store query or broadcast, so the 1 Hz
//! tick can never deadlock behind an in-flight command.
//!
//! [`AppState`]: crate::state::AppState

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    dto::{
        round::{AnswerOutcome, AnswerSubmission, RoundStatusResponse, SessionScoreEntry},
        sse::{CountdownEvent, QuestionEvent, RoundEndedEvent, RoundEvent, RoundStartedEvent},
    },
    error::ServiceError,
    services::{question_service, scoring, settings_service},
    state::{SharedState, round::TickAction},
};

/// Grace buffer appended to the answer window before the countdown resumes.
const ANSWER_GRACE: Duration = Duration::from_secs(5);

/// Result of a start command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new round was started with the given question interval.
    Started {
        /// Pause between questions for this round.
        interval_ms: u64,
    },
    /// A round was already running; nothing changed.
    AlreadyRunning,
}

/// Result of an end command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// The running round was ended.
    Ended,
    /// No round was running; nothing changed.
    NotRunning,
}

/// Start a round for `broadcaster_id`.
///
/// The active flag is set before the settings lookup and the announcement so
/// a second start arriving mid-flight observes it and no-ops; if the
/// announcement fails the flag is rolled back and the error surfaces.
pub async fn start_round(
    state: &SharedState,
    broadcaster_id: &str,
) -> Result<StartOutcome, ServiceError> {
    {
        let mut round = state.round().write().await;
        if !round.activate(broadcaster_id) {
            return Ok(StartOutcome::AlreadyRunning);
        }
    }

    let settings = settings_service::resolve(state, broadcaster_id).await;
    let event = RoundEvent::RoundStarted(RoundStartedEvent {
        interval_ms: settings.interval_ms,
    });
    if let Err(err) = state.broadcaster().publish(broadcaster_id, &event) {
        warn!(broadcaster_id, error = %err, "failed to announce round start; rolling back");
        state.round().write().await.deactivate();
        return Err(err.into());
    }

    let now = Instant::now();
    {
        let mut round = state.round().write().await;
        // The round may have been ended while the announcement was out.
        if round.is_active() {
            round.arm_countdown(now, Duration::from_millis(settings.interval_ms));
        }
    }

    info!(
        broadcaster_id,
        interval_ms = settings.interval_ms,
        "trivia round started"
    );
    Ok(StartOutcome::Started {
        interval_ms: settings.interval_ms,
    })
}

/// End the running round.
///
/// Idempotent: ending while inactive reports [`EndOutcome::NotRunning`] and
/// changes nothing. The round state is already cleared when the farewell is
/// published, so a broadcast failure cannot resurrect the round.
pub async fn end_round(state: &SharedState, broadcaster_id: &str) -> EndOutcome {
    let was_active = state.round().write().await.deactivate();
    if !was_active {
        return EndOutcome::NotRunning;
    }

    let event = RoundEvent::RoundEnded(RoundEndedEvent {});
    if let Err(err) = state.broadcaster().publish(broadcaster_id, &event) {
        warn!(broadcaster_id, error = %err, "failed to announce round end");
    }

    info!(broadcaster_id, "trivia round ended");
    EndOutcome::Ended
}

/// One beat of the 1 Hz timer, the sole driver of round progress.
pub async fn tick(state: &SharedState) {
    let now = Instant::now();
    let (action, broadcaster_id) = {
        let round = state.round().read().await;
        (round.tick_action(now), round.broadcaster().map(str::to_owned))
    };
    let Some(broadcaster_id) = broadcaster_id else {
        return;
    };

    match action {
        TickAction::Idle => {}
        TickAction::Countdown { time_remaining } => {
            let event = RoundEvent::Countdown(CountdownEvent {
                time_remaining_ms: time_remaining.as_millis() as u64,
            });
            if let Err(err) = state.broadcaster().publish(&broadcaster_id, &event) {
                warn!(broadcaster_id, error = %err, "failed to broadcast countdown");
            }
        }
        TickAction::CompleteQuestion => {
            let settings = settings_service::resolve(state, &broadcaster_id).await;
            let mut round = state.round().write().await;
            if round.complete_question(
                Instant::now(),
                Duration::from_millis(settings.interval_ms),
            ) {
                debug!(broadcaster_id, "question window closed; countdown rearmed");
            }
        }
        TickAction::FireQuestion => {
            if let Err(err) = send_question(state, &broadcaster_id).await {
                warn!(broadcaster_id, error = %err, "failed to send question; retrying next tick");
            }
        }
    }
}

/// Select and broadcast the next question.
///
/// The in-progress flag is claimed synchronously before any await; on any
/// selection or broadcast failure it is released again so the next tick can
/// retry. A call while a question is already in progress is a no-op.
pub async fn send_question(state: &SharedState, broadcaster_id: &str) -> Result<(), ServiceError> {
    {
        let mut round = state.round().write().await;
        if !round.begin_question() {
            return Ok(());
        }
    }

    match send_question_inner(state, broadcaster_id).await {
        Ok(()) => Ok(()),
        Err(err) => {
            state.round().write().await.abort_question();
            Err(err)
        }
    }
}

async fn send_question_inner(
    state: &SharedState,
    broadcaster_id: &str,
) -> Result<(), ServiceError> {
    let settings = settings_service::resolve(state, broadcaster_id).await;
    let mut used = { state.round().read().await.used_questions().clone() };
    let store = state.trivia_store().await;

    let question = question_service::select_question(
        store,
        state.config().fallback_questions(),
        &settings,
        &mut used,
    )
    .await
    .ok_or_else(|| ServiceError::NotFound("no question matches the current filters".into()))?;

    let event = RoundEvent::Question(QuestionEvent {
        question_id: question.id,
        text: question.text.clone(),
        choices: question.shuffled_choices(),
        correct_answer: question.correct_answer.clone(),
        duration_ms: settings.answer_time_ms,
        category_id: question.category_id,
        difficulty: question.difficulty,
    });
    state.broadcaster().publish(broadcaster_id, &event)?;

    let now = Instant::now();
    let window = Duration::from_millis(settings.answer_time_ms) + ANSWER_GRACE;
    {
        let mut round = state.round().write().await;
        // Skip the bookkeeping when the round ended mid-flight; deactivation
        // already cleared the in-progress flag.
        if round.is_active() {
            round.set_used_questions(used);
            round.question_live(now, question.id, window);
        }
    }

    info!(
        broadcaster_id,
        question_id = %question.id,
        difficulty = question.difficulty.as_str(),
        "question broadcast"
    );
    Ok(())
}

/// Score and record one answer submission.
///
/// Submissions outside a question window are reported as a rejected outcome
/// rather than an error. A Score Store outage degrades to session-only
/// totals.
pub async fn submit_answer(state: &SharedState, submission: AnswerSubmission) -> AnswerOutcome {
    let (correct, score, session_total) = {
        let mut round = state.round().write().await;
        if !round.question_window_open() {
            return AnswerOutcome {
                accepted: false,
                correct: false,
                points: 0,
                base_points: scoring::base_points(submission.difficulty),
                time_bonus_percent: 0,
                session_total: round.session_points(&submission.user_id),
                overall_total: None,
            };
        }

        let correct = submission.selected_answer.trim() == submission.correct_answer.trim();
        let score = scoring::score_answer(
            correct,
            submission.difficulty,
            submission.answer_time_ms,
            submission.question_duration_ms,
        );
        let session_total = if score.points > 0 {
            round.record_session_points(&submission.user_id, i64::from(score.points))
        } else {
            round.session_points(&submission.user_id)
        };
        (correct, score, session_total)
    };

    let overall_total = if score.points > 0 {
        match state.trivia_store().await {
            Some(store) => match store
                .add_points(submission.user_id.clone(), i64::from(score.points))
                .await
            {
                Ok(total) => Some(total),
                Err(err) => {
                    warn!(
                        user_id = %submission.user_id,
                        error = %err,
                        "failed to persist score; keeping the session total only"
                    );
                    None
                }
            },
            None => None,
        }
    } else {
        None
    };

    AnswerOutcome {
        accepted: true,
        correct,
        points: score.points,
        base_points: score.base_points,
        time_bonus_percent: score.time_bonus_percent,
        session_total,
        overall_total,
    }
}

/// Read-only snapshot of the controller for overlays.
pub async fn status(state: &SharedState) -> RoundStatusResponse {
    let degraded = state.is_degraded().await;
    let now = Instant::now();
    let round = state.round().read().await;

    RoundStatusResponse {
        phase: round.phase().into(),
        broadcaster_id: round.broadcaster().map(str::to_owned),
        next_question_in_ms: round
            .time_to_next_question(now)
            .map(|d| d.as_millis() as u64),
        current_question_id: round.current_question_id(),
        degraded,
    }
}

/// Per-round totals, best first.
pub async fn session_scoreboard(state: &SharedState) -> Vec<SessionScoreEntry> {
    let round = state.round().read().await;
    round
        .session_scoreboard()
        .into_iter()
        .map(|(user_id, points)| SessionScoreEntry { user_id, points })
        .collect()
}
