use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexSet;
use tokio::time::Instant;
use uuid::Uuid;

/// High-level phases a trivia round can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No round is running.
    Inactive,
    /// A round is running and the next question is being counted down.
    Countdown,
    /// A question is live and answers are being accepted.
    QuestionLive,
}

/// What the periodic tick should do next.
///
/// The decision is computed without side effects so the caller can release
/// the state lock before performing broadcasts or store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Nothing to do this tick.
    Idle,
    /// Broadcast the remaining time until the next question.
    Countdown {
        /// Time left before the next question fires.
        time_remaining: Duration,
    },
    /// The next-question deadline passed; a question should be sent.
    FireQuestion,
    /// The live question's window (answer time plus grace) elapsed; the
    /// round should re-arm the countdown.
    CompleteQuestion,
}

/// In-memory state of the single active trivia round.
///
/// Owned exclusively by the round controller behind one async lock; every
/// mutation happens through the methods below and never from two concurrent
/// contexts. Nothing here is persisted: a process restart ends the round.
#[derive(Debug, Default)]
pub struct RoundState {
    active: bool,
    broadcaster_id: Option<String>,
    next_question_at: Option<Instant>,
    round_end_at: Option<Instant>,
    question_in_progress: bool,
    current_question_id: Option<Uuid>,
    used_question_ids: IndexSet<Uuid>,
    session_scores: HashMap<String, i64>,
}

impl RoundState {
    /// Create a fresh, inactive round state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a round is currently running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Broadcaster that owns the running round, if any.
    pub fn broadcaster(&self) -> Option<&str> {
        self.broadcaster_id.as_deref()
    }

    /// Derive the externally visible phase from the state flags.
    pub fn phase(&self) -> RoundPhase {
        if !self.active {
            RoundPhase::Inactive
        } else if self.question_in_progress {
            RoundPhase::QuestionLive
        } else {
            RoundPhase::Countdown
        }
    }

    /// Identifier of the question currently on screen, if one is live.
    pub fn current_question_id(&self) -> Option<Uuid> {
        self.current_question_id
    }

    /// Time left until the next question fires.
    pub fn time_to_next_question(&self, now: Instant) -> Option<Duration> {
        self.next_question_at
            .map(|at| at.saturating_duration_since(now))
    }

    /// Begin a round for `broadcaster_id`.
    ///
    /// Returns `false` without touching anything when a round is already
    /// running. Must be called before the first suspension point of the
    /// start path so a second concurrent start observes the flag.
    pub fn activate(&mut self, broadcaster_id: &str) -> bool {
        if self.active {
            return false;
        }

        self.active = true;
        self.broadcaster_id = Some(broadcaster_id.to_owned());
        self.next_question_at = None;
        self.round_end_at = None;
        self.question_in_progress = false;
        self.current_question_id = None;
        self.used_question_ids.clear();
        self.session_scores.clear();
        true
    }

    /// Schedule the next question `interval` from `now`.
    pub fn arm_countdown(&mut self, now: Instant, interval: Duration) {
        self.next_question_at = Some(now + interval);
    }

    /// End the round, clearing every per-round counter.
    ///
    /// Returns whether a round was actually running; calling this while
    /// inactive is harmless.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.active;
        *self = Self::default();
        was_active
    }

    /// Decide what the 1 Hz tick should do at `now`.
    ///
    /// Countdown chatter is suppressed while a question is live, either via
    /// the in-progress flag or the not-yet-elapsed round end timestamp.
    pub fn tick_action(&self, now: Instant) -> TickAction {
        if !self.active {
            return TickAction::Idle;
        }
        let Some(next_question_at) = self.next_question_at else {
            return TickAction::Idle;
        };

        if self.question_in_progress {
            return match self.round_end_at {
                Some(end) if now >= end => TickAction::CompleteQuestion,
                _ => TickAction::Idle,
            };
        }

        if now < next_question_at {
            if self.round_end_at.is_some_and(|end| now < end) {
                return TickAction::Idle;
            }
            return TickAction::Countdown {
                time_remaining: next_question_at - now,
            };
        }

        TickAction::FireQuestion
    }

    /// Claim the question-send slot.
    ///
    /// Returns `false` when no round is running or a question send is
    /// already underway. Flipped back by [`Self::abort_question`] on failure
    /// or [`Self::complete_question`] once the window elapses. Like
    /// [`Self::activate`], this must run before the send path first awaits.
    pub fn begin_question(&mut self) -> bool {
        if !self.active || self.question_in_progress {
            return false;
        }
        self.question_in_progress = true;
        true
    }

    /// Record a successfully broadcast question whose window closes after
    /// `window` (answer time plus the grace buffer).
    pub fn question_live(&mut self, now: Instant, question_id: Uuid, window: Duration) {
        self.round_end_at = Some(now + window);
        self.current_question_id = Some(question_id);
    }

    /// Release the question-send slot after a failed send so the next tick
    /// can retry.
    pub fn abort_question(&mut self) {
        self.question_in_progress = false;
    }

    /// Close the live question's window and re-arm the countdown.
    ///
    /// No-op when the round ended while the question was in flight.
    pub fn complete_question(&mut self, now: Instant, interval: Duration) -> bool {
        if !self.active || !self.question_in_progress {
            return false;
        }
        self.question_in_progress = false;
        self.current_question_id = None;
        self.round_end_at = None;
        self.next_question_at = Some(now + interval);
        true
    }

    /// Whether answers are currently accepted.
    pub fn question_window_open(&self) -> bool {
        self.active && self.question_in_progress
    }

    /// Questions already shown this round, in presentation order.
    pub fn used_questions(&self) -> &IndexSet<Uuid> {
        &self.used_question_ids
    }

    /// Replace the used-question set after a selection pass.
    ///
    /// The selector works on a detached copy so the lock is not held across
    /// store queries; the result is synced back here.
    pub fn set_used_questions(&mut self, used: IndexSet<Uuid>) {
        self.used_question_ids = used;
    }

    /// Add points to a viewer's per-round counter, returning the new total.
    pub fn record_session_points(&mut self, user_id: &str, points: i64) -> i64 {
        let total = self.session_scores.entry(user_id.to_owned()).or_insert(0);
        *total += points;
        *total
    }

    /// A viewer's per-round total.
    pub fn session_points(&self, user_id: &str) -> i64 {
        self.session_scores.get(user_id).copied().unwrap_or(0)
    }

    /// Per-round totals, best first.
    pub fn session_scoreboard(&self) -> Vec<(String, i64)> {
        let mut scores: Vec<(String, i64)> = self
            .session_scores
            .iter()
            .map(|(user, total)| (user.clone(), *total))
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(120);
    const WINDOW: Duration = Duration::from_secs(35);

    fn running_round(now: Instant) -> RoundState {
        let mut round = RoundState::new();
        assert!(round.activate("streamer"));
        round.arm_countdown(now, INTERVAL);
        round
    }

    #[test]
    fn initial_state_is_inactive() {
        let round = RoundState::new();
        assert_eq!(round.phase(), RoundPhase::Inactive);
        assert!(!round.question_window_open());
    }

    #[test]
    fn activate_is_rejected_while_running() {
        let mut round = RoundState::new();
        assert!(round.activate("streamer"));
        assert!(!round.activate("streamer"));
        assert!(!round.activate("someone_else"));
        assert_eq!(round.broadcaster(), Some("streamer"));
    }

    #[test]
    fn tick_is_idle_without_a_round_or_schedule() {
        let now = Instant::now();
        let round = RoundState::new();
        assert_eq!(round.tick_action(now), TickAction::Idle);

        let mut round = RoundState::new();
        round.activate("streamer");
        // Active but nothing scheduled yet (start still in flight).
        assert_eq!(round.tick_action(now), TickAction::Idle);
    }

    #[test]
    fn countdown_reports_remaining_time_then_fires() {
        let now = Instant::now();
        let round = running_round(now);

        match round.tick_action(now + Duration::from_secs(30)) {
            TickAction::Countdown { time_remaining } => {
                assert_eq!(time_remaining, Duration::from_secs(90));
            }
            other => panic!("expected countdown, got {other:?}"),
        }

        assert_eq!(round.tick_action(now + INTERVAL), TickAction::FireQuestion);
        assert_eq!(
            round.tick_action(now + INTERVAL + Duration::from_secs(7)),
            TickAction::FireQuestion
        );
    }

    #[test]
    fn begin_question_claims_the_slot_once() {
        let now = Instant::now();
        let mut round = running_round(now);

        assert!(round.begin_question());
        assert!(!round.begin_question());
        assert_eq!(round.phase(), RoundPhase::QuestionLive);

        round.abort_question();
        assert!(round.begin_question());
    }

    #[test]
    fn live_question_suppresses_countdown_until_window_elapses() {
        let now = Instant::now();
        let mut round = running_round(now);
        let fired_at = now + INTERVAL;

        assert!(round.begin_question());
        round.question_live(fired_at, Uuid::new_v4(), WINDOW);

        assert_eq!(round.tick_action(fired_at), TickAction::Idle);
        assert_eq!(
            round.tick_action(fired_at + WINDOW - Duration::from_secs(1)),
            TickAction::Idle
        );
        assert_eq!(
            round.tick_action(fired_at + WINDOW),
            TickAction::CompleteQuestion
        );
    }

    #[test]
    fn complete_question_rearms_the_countdown() {
        let now = Instant::now();
        let mut round = running_round(now);
        let fired_at = now + INTERVAL;

        round.begin_question();
        round.question_live(fired_at, Uuid::new_v4(), WINDOW);
        let completed_at = fired_at + WINDOW;
        assert!(round.complete_question(completed_at, INTERVAL));

        assert!(round.current_question_id().is_none());
        assert!(!round.question_window_open());
        assert_eq!(
            round.time_to_next_question(completed_at),
            Some(INTERVAL),
        );
        assert!(matches!(
            round.tick_action(completed_at + Duration::from_secs(1)),
            TickAction::Countdown { .. }
        ));
    }

    #[test]
    fn complete_question_is_a_noop_after_the_round_ended() {
        let now = Instant::now();
        let mut round = running_round(now);
        round.begin_question();
        round.question_live(now, Uuid::new_v4(), WINDOW);

        assert!(round.deactivate());
        assert!(!round.complete_question(now + WINDOW, INTERVAL));
        assert_eq!(round.phase(), RoundPhase::Inactive);
    }

    #[test]
    fn deactivate_clears_everything_and_is_idempotent() {
        let now = Instant::now();
        let mut round = running_round(now);
        round.begin_question();
        round.question_live(now, Uuid::new_v4(), WINDOW);
        round.record_session_points("viewer", 450);
        round.set_used_questions(IndexSet::from([Uuid::new_v4()]));

        assert!(round.deactivate());
        assert!(!round.deactivate());

        assert_eq!(round.phase(), RoundPhase::Inactive);
        assert!(round.time_to_next_question(now).is_none());
        assert!(round.used_questions().is_empty());
        assert_eq!(round.session_points("viewer"), 0);
    }

    #[test]
    fn starting_a_new_round_clears_the_previous_dedup_window() {
        let now = Instant::now();
        let mut round = running_round(now);
        round.set_used_questions(IndexSet::from([Uuid::new_v4(), Uuid::new_v4()]));
        round.record_session_points("viewer", 150);
        round.deactivate();

        assert!(round.activate("streamer"));
        assert!(round.used_questions().is_empty());
        assert_eq!(round.session_points("viewer"), 0);
    }

    #[test]
    fn session_scoreboard_sorts_best_first() {
        let now = Instant::now();
        let mut round = running_round(now);
        round.record_session_points("alice", 450);
        round.record_session_points("bob", 1000);
        round.record_session_points("alice", 150);

        assert_eq!(
            round.session_scoreboard(),
            vec![("bob".to_owned(), 1000), ("alice".to_owned(), 600)]
        );
    }
}
