use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::models::{Difficulty, QuestionEntity, ScoreEntity, SettingsEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoQuestionDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    text: String,
    correct_answer: String,
    wrong_answers: Vec<String>,
    category_id: Uuid,
    difficulty: Difficulty,
}

impl From<QuestionEntity> for MongoQuestionDocument {
    fn from(value: QuestionEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            correct_answer: value.correct_answer,
            wrong_answers: value.wrong_answers.into(),
            category_id: value.category_id,
            difficulty: value.difficulty,
        }
    }
}

impl TryFrom<MongoQuestionDocument> for QuestionEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoQuestionDocument) -> Result<Self, Self::Error> {
        let id = value.id;
        let wrong_answers: [String; 3] = value
            .wrong_answers
            .try_into()
            .map_err(|_| MongoDaoError::MalformedQuestion { id })?;

        Ok(Self {
            id,
            text: value.text,
            correct_answer: value.correct_answer,
            wrong_answers,
            category_id: value.category_id,
            difficulty: value.difficulty,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettingsDocument {
    #[serde(rename = "_id")]
    broadcaster_id: String,
    answer_time_ms: i64,
    interval_ms: i64,
    categories: Vec<Uuid>,
    difficulties: Vec<Difficulty>,
    updated_at: DateTime,
}

impl From<SettingsEntity> for MongoSettingsDocument {
    fn from(value: SettingsEntity) -> Self {
        Self {
            broadcaster_id: value.broadcaster_id,
            answer_time_ms: value.answer_time_ms as i64,
            interval_ms: value.interval_ms as i64,
            categories: value.categories,
            difficulties: value.difficulties,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoSettingsDocument> for SettingsEntity {
    fn from(value: MongoSettingsDocument) -> Self {
        Self {
            broadcaster_id: value.broadcaster_id,
            answer_time_ms: value.answer_time_ms.max(0) as u64,
            interval_ms: value.interval_ms.max(0) as u64,
            categories: value.categories,
            difficulties: value.difficulties,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    user_id: String,
    pub points: i64,
    updated_at: DateTime,
}

impl From<MongoScoreDocument> for ScoreEntity {
    fn from(value: MongoScoreDocument) -> Self {
        Self {
            user_id: value.user_id,
            points: value.points,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
