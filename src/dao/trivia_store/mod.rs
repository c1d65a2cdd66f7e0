#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{Difficulty, QuestionEntity, ScoreEntity, SettingsEntity};
use crate::dao::storage::StorageResult;

/// Filter applied when drawing or counting questions.
///
/// Empty category/difficulty lists mean "no restriction"; `exclude` always
/// applies.
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    /// Restrict to these categories (empty = all).
    pub categories: Vec<Uuid>,
    /// Restrict to these difficulties (empty = all).
    pub difficulties: Vec<Difficulty>,
    /// Question ids that must not be returned.
    pub exclude: Vec<Uuid>,
}

/// Abstraction over the persistence layer for questions, settings, and scores.
pub trait TriviaStore: Send + Sync {
    /// Draw one random question matching the query, if any exists.
    fn random_question(
        &self,
        query: QuestionQuery,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>>;
    /// Count the questions matching the query (exclusions included).
    fn count_questions(&self, query: QuestionQuery) -> BoxFuture<'static, StorageResult<u64>>;
    /// Insert a batch of questions, returning how many were stored.
    fn insert_questions(
        &self,
        questions: Vec<QuestionEntity>,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    /// Fetch the stored settings for a broadcaster, if any.
    fn get_settings(
        &self,
        broadcaster_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<SettingsEntity>>>;
    /// Replace the stored settings for a broadcaster.
    fn put_settings(&self, settings: SettingsEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Add points to a viewer's persistent total, returning the new total.
    fn add_points(&self, user_id: String, points: i64) -> BoxFuture<'static, StorageResult<i64>>;
    /// Fetch a viewer's persistent total (0 when the viewer has never scored).
    fn get_points(&self, user_id: String) -> BoxFuture<'static, StorageResult<i64>>;
    /// Fetch the highest persistent totals, best first.
    fn top_scores(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>>;
    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
