use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB-specific operations.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Errors raised by the MongoDB trivia store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection string could not be parsed.
    #[error("invalid MongoDB uri `{uri}`")]
    InvalidUri {
        /// The offending connection string.
        uri: String,
        /// Driver-level parse failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// The driver client could not be constructed.
    #[error("failed to construct MongoDB client")]
    ClientConstruction {
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// The database never answered the initial ping.
    #[error("MongoDB did not answer the initial ping after {attempts} attempts")]
    InitialPing {
        /// Number of ping attempts made before giving up.
        attempts: u32,
        /// Last ping failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// A health-check ping failed on an established connection.
    #[error("MongoDB health ping failed")]
    HealthPing {
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// Index creation failed during bootstrap.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Index key description.
        index: &'static str,
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// A question query failed.
    #[error("question query failed")]
    QueryQuestions {
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// A sampled question document could not be decoded.
    #[error("failed to decode question document")]
    DecodeQuestion {
        /// BSON deserialization failure.
        #[source]
        source: mongodb::bson::error::Error,
    },
    /// A question batch insert failed.
    #[error("failed to insert question batch of {count}")]
    InsertQuestions {
        /// Size of the failing batch.
        count: usize,
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// Settings lookup or write failed for a broadcaster.
    #[error("settings operation failed for broadcaster `{broadcaster_id}`")]
    Settings {
        /// Broadcaster whose settings were touched.
        broadcaster_id: String,
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// A score read or update failed for a viewer.
    #[error("score operation failed for user `{user_id}`")]
    Score {
        /// Viewer whose score was touched.
        user_id: String,
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// The leaderboard query failed.
    #[error("top scores query failed")]
    TopScores {
        /// Driver-level failure.
        #[source]
        source: mongodb::error::Error,
    },
    /// A question id round-tripped through storage in an unusable form.
    #[error("stored question `{id}` is malformed")]
    MalformedQuestion {
        /// Primary key of the malformed document.
        id: Uuid,
    },
}
