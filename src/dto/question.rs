use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dao::models::{Difficulty, QuestionEntity};

/// Batch of questions to add to the store.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QuestionImportRequest {
    /// Questions to import.
    #[validate(length(min = 1), nested)]
    pub questions: Vec<QuestionInput>,
}

/// One incoming question definition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct QuestionInput {
    /// Question text shown to viewers.
    pub text: String,
    /// The single correct answer.
    pub correct_answer: String,
    /// Exactly three distractors.
    pub wrong_answers: [String; 3],
    /// Category of the question; omitted means uncategorized.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Difficulty tier; omitted means medium.
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Validate for QuestionInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.text.trim().is_empty() {
            let mut err = ValidationError::new("text_empty");
            err.message = Some("question text must not be empty".into());
            errors.add("text", err);
        }

        if self.correct_answer.trim().is_empty() {
            let mut err = ValidationError::new("correct_answer_empty");
            err.message = Some("correct answer must not be empty".into());
            errors.add("correct_answer", err);
        }

        if self.wrong_answers.iter().any(|a| a.trim().is_empty()) {
            let mut err = ValidationError::new("wrong_answer_empty");
            err.message = Some("wrong answers must not be empty".into());
            errors.add("wrong_answers", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<QuestionInput> for QuestionEntity {
    fn from(value: QuestionInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: value.text,
            correct_answer: value.correct_answer,
            wrong_answers: value.wrong_answers,
            category_id: value.category_id.unwrap_or(Uuid::nil()),
            difficulty: value.difficulty,
        }
    }
}

/// Summary returned once an import completed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportSummary {
    /// How many questions were stored.
    pub imported: u64,
}

/// Size of the question pool.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionCountResponse {
    /// Number of stored questions.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> QuestionInput {
        QuestionInput {
            text: "Which planet is known as the Red Planet?".into(),
            correct_answer: "Mars".into(),
            wrong_answers: ["Venus".into(), "Jupiter".into(), "Mercury".into()],
            category_id: None,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn blank_distractor_is_rejected() {
        let mut bad = input();
        bad.wrong_answers[1] = "  ".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn empty_batch_is_rejected() {
        let request = QuestionImportRequest { questions: vec![] };
        assert!(request.validate().is_err());
    }
}
