//! Shared test doubles: an in-memory trivia store and a scriptable broadcaster.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::SystemTime,
};

use futures::future::BoxFuture;
use uuid::Uuid;

use trivia_live_back::{
    config::AppConfig,
    dao::{
        models::{Difficulty, QuestionEntity, ScoreEntity, SettingsEntity},
        storage::{StorageError, StorageResult},
        trivia_store::{QuestionQuery, TriviaStore},
    },
    dto::sse::{QuestionEvent, RoundEvent},
    services::sse_events::{Broadcaster, PublishError},
    state::{AppState, SharedState, SseHub, trivia::Question},
};

/// Deterministic in-memory [`TriviaStore`]: draws return the first matching
/// question in insertion order.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_questions: AtomicBool,
}

struct Inner {
    questions: Vec<QuestionEntity>,
    settings: HashMap<String, SettingsEntity>,
    scores: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new(questions: Vec<QuestionEntity>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                questions,
                settings: HashMap::new(),
                scores: HashMap::new(),
            }),
            fail_questions: AtomicBool::new(false),
        })
    }

    /// Make every question draw fail until reset, simulating an outage.
    pub fn set_fail_questions(&self, fail: bool) {
        self.fail_questions.store(fail, Ordering::SeqCst);
    }

    pub fn store_settings(&self, entity: SettingsEntity) {
        let mut inner = self.inner.lock().unwrap();
        inner.settings.insert(entity.broadcaster_id.clone(), entity);
    }

    pub fn stored_points(&self, user_id: &str) -> i64 {
        let inner = self.inner.lock().unwrap();
        inner.scores.get(user_id).copied().unwrap_or(0)
    }

    fn injected_failure() -> StorageError {
        StorageError::unavailable(
            "memory store failure".into(),
            std::io::Error::other("injected failure"),
        )
    }
}

fn matches_query(question: &QuestionEntity, query: &QuestionQuery) -> bool {
    (query.categories.is_empty() || query.categories.contains(&question.category_id))
        && (query.difficulties.is_empty() || query.difficulties.contains(&question.difficulty))
        && !query.exclude.contains(&question.id)
}

impl TriviaStore for MemoryStore {
    fn random_question(
        &self,
        query: QuestionQuery,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let result = if self.fail_questions.load(Ordering::SeqCst) {
            Err(Self::injected_failure())
        } else {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .questions
                .iter()
                .find(|q| matches_query(q, &query))
                .cloned())
        };
        Box::pin(async move { result })
    }

    fn count_questions(&self, query: QuestionQuery) -> BoxFuture<'static, StorageResult<u64>> {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .questions
            .iter()
            .filter(|q| matches_query(q, &query))
            .count() as u64;
        Box::pin(async move { Ok(count) })
    }

    fn insert_questions(
        &self,
        questions: Vec<QuestionEntity>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let mut inner = self.inner.lock().unwrap();
        let added = questions.len() as u64;
        inner.questions.extend(questions);
        Box::pin(async move { Ok(added) })
    }

    fn get_settings(
        &self,
        broadcaster_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<SettingsEntity>>> {
        let inner = self.inner.lock().unwrap();
        let settings = inner.settings.get(&broadcaster_id).cloned();
        Box::pin(async move { Ok(settings) })
    }

    fn put_settings(&self, settings: SettingsEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.store_settings(settings);
        Box::pin(async move { Ok(()) })
    }

    fn add_points(&self, user_id: String, points: i64) -> BoxFuture<'static, StorageResult<i64>> {
        let mut inner = self.inner.lock().unwrap();
        let total = inner.scores.entry(user_id).or_insert(0);
        *total += points;
        let total = *total;
        Box::pin(async move { Ok(total) })
    }

    fn get_points(&self, user_id: String) -> BoxFuture<'static, StorageResult<i64>> {
        let total = self.stored_points(&user_id);
        Box::pin(async move { Ok(total) })
    }

    fn top_scores(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let inner = self.inner.lock().unwrap();
        let mut scores: Vec<ScoreEntity> = inner
            .scores
            .iter()
            .map(|(user_id, points)| ScoreEntity {
                user_id: user_id.clone(),
                points: *points,
                updated_at: SystemTime::now(),
            })
            .collect();
        scores.sort_by(|a, b| b.points.cmp(&a.points));
        scores.truncate(limit as usize);
        Box::pin(async move { Ok(scores) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}

/// Broadcaster recording every published event, with scriptable failures.
pub struct RecordingBroadcaster {
    events: Mutex<Vec<(String, RoundEvent)>>,
    failures: AtomicUsize,
}

impl RecordingBroadcaster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            failures: AtomicUsize::new(0),
        })
    }

    /// Make the next `count` publishes fail.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<(String, RoundEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<QuestionEvent> {
        self.events()
            .into_iter()
            .filter_map(|(_, event)| match event {
                RoundEvent::Question(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn count_round_started(&self) -> usize {
        self.count(|event| matches!(event, RoundEvent::RoundStarted(_)))
    }

    pub fn count_round_ended(&self) -> usize {
        self.count(|event| matches!(event, RoundEvent::RoundEnded(_)))
    }

    pub fn count_countdowns(&self) -> usize {
        self.count(|event| matches!(event, RoundEvent::Countdown(_)))
    }

    fn count(&self, predicate: impl Fn(&RoundEvent) -> bool) -> usize {
        self.events()
            .into_iter()
            .filter(|(_, event)| predicate(event))
            .count()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn publish(&self, channel_id: &str, event: &RoundEvent) -> Result<(), PublishError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            let encode_failure = serde_json::from_str::<serde_json::Value>("").unwrap_err();
            return Err(PublishError::Encode(encode_failure));
        }

        self.events
            .lock()
            .unwrap()
            .push((channel_id.to_owned(), event.clone()));
        Ok(())
    }
}

/// Questions with distinct ids, all medium difficulty and one category.
pub fn question_pool(len: usize) -> Vec<QuestionEntity> {
    (0..len)
        .map(|i| QuestionEntity {
            id: Uuid::new_v4(),
            text: format!("question {i}"),
            correct_answer: format!("answer {i}"),
            wrong_answers: ["wrong a".into(), "wrong b".into(), "wrong c".into()],
            category_id: Uuid::nil(),
            difficulty: Difficulty::Medium,
        })
        .collect()
}

/// Settings entity with the fastest accepted timings, to keep tests short.
pub fn fast_settings(broadcaster_id: &str) -> SettingsEntity {
    SettingsEntity {
        broadcaster_id: broadcaster_id.to_owned(),
        answer_time_ms: 5_000,
        interval_ms: 60_000,
        categories: vec![],
        difficulties: vec![],
        updated_at: SystemTime::now(),
    }
}

/// Shared state wired to a recording broadcaster, without a store installed.
pub fn test_state(fallback: Vec<Question>) -> (SharedState, Arc<RecordingBroadcaster>) {
    let broadcaster = RecordingBroadcaster::new();
    let state = AppState::with_broadcaster(
        AppConfig::with_fallback_questions(fallback),
        SseHub::new(16),
        broadcaster.clone(),
    );
    (state, broadcaster)
}
