use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{self, DateTime, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;

use super::{
    connection::{MongoConfig, establish_connection},
    error::{MongoDaoError, MongoResult},
    models::{MongoQuestionDocument, MongoScoreDocument, MongoSettingsDocument, uuid_as_binary},
};
use crate::dao::{
    models::{QuestionEntity, ScoreEntity, SettingsEntity},
    storage::StorageResult,
    trivia_store::{QuestionQuery, TriviaStore},
};

const QUESTION_COLLECTION_NAME: &str = "questions";
const SETTINGS_COLLECTION_NAME: &str = "settings";
const SCORE_COLLECTION_NAME: &str = "scores";

/// MongoDB-backed trivia store holding questions, settings, and score totals.
#[derive(Clone)]
pub struct MongoTriviaStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoTriviaStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let question_index = mongodb::IndexModel::builder()
            .keys(doc! {"category_id": 1, "difficulty": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("question_filter_idx".to_owned()))
                    .build(),
            )
            .build();

        self.question_collection()
            .await
            .create_index(question_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: QUESTION_COLLECTION_NAME,
                index: "category_id,difficulty",
                source,
            })?;

        // Leaderboard reads sort by points descending.
        let score_index = mongodb::IndexModel::builder()
            .keys(doc! {"points": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("score_points_idx".to_owned()))
                    .build(),
            )
            .build();

        self.score_collection()
            .await
            .create_index(score_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SCORE_COLLECTION_NAME,
                index: "points",
                source,
            })?;

        Ok(())
    }

    async fn question_collection(&self) -> Collection<MongoQuestionDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoQuestionDocument>(QUESTION_COLLECTION_NAME)
    }

    async fn settings_collection(&self) -> Collection<MongoSettingsDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoSettingsDocument>(SETTINGS_COLLECTION_NAME)
    }

    async fn score_collection(&self) -> Collection<MongoScoreDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoScoreDocument>(SCORE_COLLECTION_NAME)
    }

    async fn random_question(&self, query: QuestionQuery) -> MongoResult<Option<QuestionEntity>> {
        let pipeline = vec![
            doc! {"$match": question_filter(&query)},
            doc! {"$sample": {"size": 1}},
        ];

        let collection = self.question_collection().await;
        let mut cursor = collection
            .aggregate(pipeline)
            .await
            .map_err(|source| MongoDaoError::QueryQuestions { source })?;

        let Some(document) = cursor
            .try_next()
            .await
            .map_err(|source| MongoDaoError::QueryQuestions { source })?
        else {
            return Ok(None);
        };

        let decoded: MongoQuestionDocument = bson::deserialize_from_document(document)
            .map_err(|source| MongoDaoError::DecodeQuestion { source })?;
        decoded.try_into().map(Some)
    }

    async fn count_questions(&self, query: QuestionQuery) -> MongoResult<u64> {
        let collection = self.question_collection().await;
        collection
            .count_documents(question_filter(&query))
            .await
            .map_err(|source| MongoDaoError::QueryQuestions { source })
    }

    async fn insert_questions(&self, questions: Vec<QuestionEntity>) -> MongoResult<u64> {
        if questions.is_empty() {
            return Ok(0);
        }

        let count = questions.len();
        let documents: Vec<MongoQuestionDocument> =
            questions.into_iter().map(Into::into).collect();

        let collection = self.question_collection().await;
        let result = collection
            .insert_many(documents)
            .await
            .map_err(|source| MongoDaoError::InsertQuestions { count, source })?;

        Ok(result.inserted_ids.len() as u64)
    }

    async fn get_settings(&self, broadcaster_id: String) -> MongoResult<Option<SettingsEntity>> {
        let collection = self.settings_collection().await;
        let document = collection
            .find_one(doc! {"_id": &broadcaster_id})
            .await
            .map_err(|source| MongoDaoError::Settings {
                broadcaster_id,
                source,
            })?;

        Ok(document.map(Into::into))
    }

    async fn put_settings(&self, settings: SettingsEntity) -> MongoResult<()> {
        let broadcaster_id = settings.broadcaster_id.clone();
        let document: MongoSettingsDocument = settings.into();

        let collection = self.settings_collection().await;
        collection
            .replace_one(doc! {"_id": &broadcaster_id}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Settings {
                broadcaster_id,
                source,
            })?;

        Ok(())
    }

    async fn add_points(&self, user_id: String, points: i64) -> MongoResult<i64> {
        let collection = self.score_collection().await;
        let updated = collection
            .find_one_and_update(
                doc! {"_id": &user_id},
                doc! {
                    "$inc": {"points": points},
                    "$set": {"updated_at": DateTime::now()},
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Score { user_id, source })?;

        Ok(updated.map(|doc| doc.points).unwrap_or(points))
    }

    async fn get_points(&self, user_id: String) -> MongoResult<i64> {
        let collection = self.score_collection().await;
        let document = collection
            .find_one(doc! {"_id": &user_id})
            .await
            .map_err(|source| MongoDaoError::Score { user_id, source })?;

        Ok(document.map(|doc| doc.points).unwrap_or(0))
    }

    async fn top_scores(&self, limit: u32) -> MongoResult<Vec<ScoreEntity>> {
        let collection = self.score_collection().await;
        let documents: Vec<MongoScoreDocument> = collection
            .find(doc! {})
            .sort(doc! {"points": -1})
            .limit(i64::from(limit))
            .await
            .map_err(|source| MongoDaoError::TopScores { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::TopScores { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

/// Translate a [`QuestionQuery`] into a `$match` filter document.
fn question_filter(query: &QuestionQuery) -> Document {
    let mut filter = doc! {};

    if !query.categories.is_empty() {
        let ids: Vec<_> = query
            .categories
            .iter()
            .map(|id| uuid_as_binary(*id))
            .collect();
        filter.insert("category_id", doc! {"$in": ids});
    }

    if !query.difficulties.is_empty() {
        let names: Vec<_> = query.difficulties.iter().map(|d| d.as_str()).collect();
        filter.insert("difficulty", doc! {"$in": names});
    }

    if !query.exclude.is_empty() {
        let ids: Vec<_> = query.exclude.iter().map(|id| uuid_as_binary(*id)).collect();
        filter.insert("_id", doc! {"$nin": ids});
    }

    filter
}

impl TriviaStore for MongoTriviaStore {
    fn random_question(
        &self,
        query: QuestionQuery,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.random_question(query).await.map_err(Into::into) })
    }

    fn count_questions(&self, query: QuestionQuery) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.count_questions(query).await.map_err(Into::into) })
    }

    fn insert_questions(
        &self,
        questions: Vec<QuestionEntity>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.insert_questions(questions).await.map_err(Into::into) })
    }

    fn get_settings(
        &self,
        broadcaster_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<SettingsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.get_settings(broadcaster_id).await.map_err(Into::into) })
    }

    fn put_settings(&self, settings: SettingsEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.put_settings(settings).await.map_err(Into::into) })
    }

    fn add_points(&self, user_id: String, points: i64) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move { store.add_points(user_id, points).await.map_err(Into::into) })
    }

    fn get_points(&self, user_id: String) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move { store.get_points(user_id).await.map_err(Into::into) })
    }

    fn top_scores(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.top_scores(limit).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
