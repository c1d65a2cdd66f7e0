//! End-to-end tests of the round controller, driven through a paused clock.

mod common;

use std::{collections::HashSet, sync::Arc, time::Duration};

use indexmap::IndexSet;
use tokio::time::advance;
use uuid::Uuid;

use common::{
    MemoryStore, RecordingBroadcaster, fast_settings, question_pool, test_state,
};
use trivia_live_back::{
    dao::{models::Difficulty, trivia_store::TriviaStore},
    dto::round::{AnswerSubmission, VisibleRoundPhase},
    services::{
        question_service::{USED_RESET_THRESHOLD, select_question},
        round_service::{self, EndOutcome, StartOutcome},
    },
    state::{SharedState, trivia::RoundSettings},
};

const BROADCASTER: &str = "streamer";
/// Matches [`fast_settings`].
const INTERVAL: Duration = Duration::from_millis(60_000);
/// Answer time from [`fast_settings`] plus the 5 s grace buffer.
const WINDOW: Duration = Duration::from_millis(10_000);

async fn running_state(
    pool_size: usize,
) -> (SharedState, Arc<RecordingBroadcaster>, Arc<MemoryStore>) {
    let (state, broadcaster) = test_state(vec![]);
    let store = MemoryStore::new(question_pool(pool_size));
    store.store_settings(fast_settings(BROADCASTER));
    state.install_trivia_store(store.clone()).await;

    let outcome = round_service::start_round(&state, BROADCASTER)
        .await
        .expect("start should succeed");
    assert!(matches!(outcome, StartOutcome::Started { .. }));

    (state, broadcaster, store)
}

async fn fire_question(state: &SharedState) {
    advance(INTERVAL).await;
    round_service::tick(state).await;
}

#[tokio::test(start_paused = true)]
async fn start_announces_and_counts_down() {
    let (state, broadcaster, _store) = running_state(3).await;
    assert_eq!(broadcaster.count_round_started(), 1);

    advance(Duration::from_secs(1)).await;
    round_service::tick(&state).await;
    advance(Duration::from_secs(1)).await;
    round_service::tick(&state).await;

    assert_eq!(broadcaster.count_countdowns(), 2);
    assert!(broadcaster.questions().is_empty());

    let status = round_service::status(&state).await;
    assert!(matches!(status.phase, VisibleRoundPhase::Countdown));
    assert_eq!(status.broadcaster_id.as_deref(), Some(BROADCASTER));
}

#[tokio::test(start_paused = true)]
async fn second_start_is_a_noop_and_does_not_double_broadcast() {
    let (state, broadcaster, _store) = running_state(3).await;

    let second = round_service::start_round(&state, BROADCASTER)
        .await
        .expect("second start should not error");
    assert_eq!(second, StartOutcome::AlreadyRunning);
    assert_eq!(broadcaster.count_round_started(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_start_announcement_rolls_the_round_back() {
    let (state, broadcaster) = test_state(vec![]);
    broadcaster.fail_next(1);

    assert!(round_service::start_round(&state, BROADCASTER).await.is_err());
    assert_eq!(broadcaster.count_round_started(), 0);
    let status = round_service::status(&state).await;
    assert!(matches!(status.phase, VisibleRoundPhase::Inactive));

    // Nothing lingers from the failed attempt.
    let retry = round_service::start_round(&state, BROADCASTER)
        .await
        .expect("retry should succeed");
    assert!(matches!(retry, StartOutcome::Started { .. }));
    assert_eq!(broadcaster.count_round_started(), 1);
}

#[tokio::test(start_paused = true)]
async fn question_fires_once_then_the_cycle_repeats() {
    let (state, broadcaster, _store) = running_state(3).await;

    fire_question(&state).await;
    let questions = broadcaster.questions();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].choices.len(), 4);
    assert!(questions[0].choices.contains(&questions[0].correct_answer));
    assert_eq!(questions[0].duration_ms, 5_000);

    // Ticks inside the window neither re-send nor emit countdowns.
    let countdowns = broadcaster.count_countdowns();
    advance(Duration::from_secs(1)).await;
    round_service::tick(&state).await;
    advance(Duration::from_secs(1)).await;
    round_service::tick(&state).await;
    assert_eq!(broadcaster.questions().len(), 1);
    assert_eq!(broadcaster.count_countdowns(), countdowns);

    // Explicit re-entry while in progress is a no-op too.
    round_service::send_question(&state, BROADCASTER)
        .await
        .expect("guarded send should be a silent no-op");
    assert_eq!(broadcaster.questions().len(), 1);

    // Window closes, countdown re-arms, and the next question differs.
    advance(WINDOW - Duration::from_secs(2)).await;
    round_service::tick(&state).await;
    fire_question(&state).await;

    let questions = broadcaster.questions();
    assert_eq!(questions.len(), 2);
    assert_ne!(questions[0].question_id, questions[1].question_id);
}

#[tokio::test(start_paused = true)]
async fn failed_selection_heals_on_the_next_tick() {
    let (state, broadcaster, store) = running_state(2).await;

    store.set_fail_questions(true);
    fire_question(&state).await;
    assert!(broadcaster.questions().is_empty());

    // Deadline stays in the past, so the very next tick retries.
    store.set_fail_questions(false);
    advance(Duration::from_secs(1)).await;
    round_service::tick(&state).await;
    assert_eq!(broadcaster.questions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn end_is_idempotent_and_cancels_the_cycle() {
    let (state, broadcaster) = test_state(vec![]);

    assert_eq!(
        round_service::end_round(&state, BROADCASTER).await,
        EndOutcome::NotRunning
    );
    assert_eq!(broadcaster.count_round_ended(), 0);

    let (state, broadcaster, _store) = running_state(2).await;
    fire_question(&state).await;

    assert_eq!(
        round_service::end_round(&state, BROADCASTER).await,
        EndOutcome::Ended
    );
    assert_eq!(broadcaster.count_round_ended(), 1);
    assert_eq!(
        round_service::end_round(&state, BROADCASTER).await,
        EndOutcome::NotRunning
    );
    assert_eq!(broadcaster.count_round_ended(), 1);

    // The in-flight window and the old schedule are dead.
    let events_after_end = broadcaster.events().len();
    advance(WINDOW).await;
    round_service::tick(&state).await;
    advance(INTERVAL).await;
    round_service::tick(&state).await;
    assert_eq!(broadcaster.events().len(), events_after_end);

    let status = round_service::status(&state).await;
    assert!(matches!(status.phase, VisibleRoundPhase::Inactive));
    assert!(status.next_question_in_ms.is_none());
}

#[tokio::test(start_paused = true)]
async fn answers_are_scored_inside_the_window_only() {
    let (state, broadcaster, store) = running_state(2).await;
    fire_question(&state).await;
    let question = broadcaster.questions()[0].clone();

    let submission = |user: &str, answer: &str, time_ms: u64| AnswerSubmission {
        user_id: user.into(),
        selected_answer: answer.into(),
        correct_answer: question.correct_answer.clone(),
        answer_time_ms: time_ms,
        difficulty: question.difficulty,
        question_duration_ms: question.duration_ms,
    };

    let outcome =
        round_service::submit_answer(&state, submission("viewer1", &question.correct_answer, 0))
            .await;
    assert!(outcome.accepted);
    assert!(outcome.correct);
    assert_eq!(outcome.points, 1_000);
    assert_eq!(outcome.session_total, 1_000);
    assert_eq!(outcome.overall_total, Some(1_000));
    assert_eq!(store.stored_points("viewer1"), 1_000);

    let outcome =
        round_service::submit_answer(&state, submission("viewer2", "definitely wrong", 0)).await;
    assert!(outcome.accepted);
    assert!(!outcome.correct);
    assert_eq!(outcome.points, 0);
    assert_eq!(store.stored_points("viewer2"), 0);

    let scoreboard = round_service::session_scoreboard(&state).await;
    assert_eq!(scoreboard[0].user_id, "viewer1");
    assert_eq!(scoreboard[0].points, 1_000);

    // Window elapses: late answers are reported as a rejected no-op.
    advance(WINDOW).await;
    round_service::tick(&state).await;
    let outcome =
        round_service::submit_answer(&state, submission("viewer3", &question.correct_answer, 0))
            .await;
    assert!(!outcome.accepted);
    assert_eq!(outcome.points, 0);
    assert_eq!(store.stored_points("viewer3"), 0);
}

#[tokio::test]
async fn store_draws_never_repeat_until_the_window_resets() {
    let pool = question_pool(USED_RESET_THRESHOLD + 2);
    let store: Arc<dyn TriviaStore> = MemoryStore::new(pool.clone());
    let settings = RoundSettings::default();
    let mut used = IndexSet::new();

    let mut seen = IndexSet::new();
    for _ in 0..pool.len() {
        let question = select_question(Some(store.clone()), &[], &settings, &mut used)
            .await
            .expect("pool should not be exhausted yet");
        assert!(seen.insert(question.id), "question repeated inside a round");
    }

    // Every question is used and the window is past the threshold: it is
    // cleared and selection recovers instead of stalling.
    let question = select_question(Some(store.clone()), &[], &settings, &mut used)
        .await
        .expect("window reset should recover the pool");
    assert!(pool.iter().any(|q| q.id == question.id));
    assert_eq!(used.len(), 1);
}

#[tokio::test]
async fn filters_are_dropped_before_stalling_the_round() {
    let store: Arc<dyn TriviaStore> = MemoryStore::new(question_pool(3));
    let mut settings = RoundSettings::default();
    settings.difficulties = HashSet::from([Difficulty::Hard]);

    // Nothing matches and the window is empty: the chain ends at NotFound.
    let mut used = IndexSet::new();
    assert!(
        select_question(Some(store.clone()), &[], &settings, &mut used)
            .await
            .is_none()
    );

    // With a non-empty window the chain broadens past the filters instead.
    let mut used = IndexSet::from([Uuid::new_v4()]);
    let question = select_question(Some(store.clone()), &[], &settings, &mut used)
        .await
        .expect("unfiltered retry should find a question");
    assert_eq!(question.difficulty, Difficulty::Medium);
}
