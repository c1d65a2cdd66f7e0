use std::collections::HashSet;
use std::time::SystemTime;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::dao::models::{Difficulty, QuestionEntity, SettingsEntity};

/// Lower bound for the per-question answer window.
pub const MIN_ANSWER_TIME_MS: u64 = 5_000;
/// Upper bound for the per-question answer window.
pub const MAX_ANSWER_TIME_MS: u64 = 60_000;
/// Lower bound for the pause between questions.
pub const MIN_INTERVAL_MS: u64 = 60_000;
/// Upper bound for the pause between questions.
pub const MAX_INTERVAL_MS: u64 = 1_800_000;

/// Answer window applied when a broadcaster has not stored settings.
pub const DEFAULT_ANSWER_TIME_MS: u64 = 30_000;
/// Question interval applied when a broadcaster has not stored settings.
pub const DEFAULT_INTERVAL_MS: u64 = 300_000;

/// Runtime representation of a trivia question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Stable identifier for the question.
    pub id: Uuid,
    /// Question text shown to viewers.
    pub text: String,
    /// The single correct answer.
    pub correct_answer: String,
    /// The three distractors presented alongside the correct answer.
    pub wrong_answers: [String; 3],
    /// Category the question belongs to.
    pub category_id: Uuid,
    /// Difficulty tier driving the base points.
    pub difficulty: Difficulty,
}

impl Question {
    /// All four choices in a fresh random order.
    ///
    /// The stored order always keeps the correct answer first, so every
    /// presentation must go through this shuffle.
    pub fn shuffled_choices(&self) -> Vec<String> {
        let mut choices: Vec<String> = Vec::with_capacity(4);
        choices.push(self.correct_answer.clone());
        choices.extend(self.wrong_answers.iter().cloned());
        choices.shuffle(&mut rand::rng());
        choices
    }
}

impl From<QuestionEntity> for Question {
    fn from(value: QuestionEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            correct_answer: value.correct_answer,
            wrong_answers: value.wrong_answers,
            category_id: value.category_id,
            difficulty: value.difficulty,
        }
    }
}

/// Per-broadcaster round configuration, cached in memory and swapped whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSettings {
    /// Time viewers have to answer a question, in milliseconds.
    pub answer_time_ms: u64,
    /// Time between questions, in milliseconds.
    pub interval_ms: u64,
    /// Categories questions are drawn from; empty means all.
    pub categories: HashSet<Uuid>,
    /// Difficulties questions are drawn from; empty means all three.
    pub difficulties: HashSet<Difficulty>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            answer_time_ms: DEFAULT_ANSWER_TIME_MS,
            interval_ms: DEFAULT_INTERVAL_MS,
            categories: HashSet::new(),
            difficulties: HashSet::new(),
        }
    }
}

impl RoundSettings {
    /// Project into a storage entity for the given broadcaster.
    pub fn to_entity(&self, broadcaster_id: &str) -> SettingsEntity {
        SettingsEntity {
            broadcaster_id: broadcaster_id.to_owned(),
            answer_time_ms: self.answer_time_ms,
            interval_ms: self.interval_ms,
            categories: self.categories.iter().copied().collect(),
            difficulties: self.difficulties.iter().copied().collect(),
            updated_at: SystemTime::now(),
        }
    }
}

impl From<SettingsEntity> for RoundSettings {
    fn from(value: SettingsEntity) -> Self {
        Self {
            answer_time_ms: value.answer_time_ms,
            interval_ms: value.interval_ms,
            categories: value.categories.into_iter().collect(),
            difficulties: value.difficulties.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            id: Uuid::new_v4(),
            text: "Which planet is closest to the sun?".into(),
            correct_answer: "Mercury".into(),
            wrong_answers: ["Venus".into(), "Mars".into(), "Pluto".into()],
            category_id: Uuid::new_v4(),
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn shuffle_keeps_all_four_choices() {
        let question = sample_question();
        let choices = question.shuffled_choices();
        assert_eq!(choices.len(), 4);
        for expected in ["Mercury", "Venus", "Mars", "Pluto"] {
            assert!(choices.iter().any(|c| c == expected), "missing {expected}");
        }
    }

    #[test]
    fn default_settings_sit_inside_the_accepted_ranges() {
        let settings = RoundSettings::default();
        assert!((MIN_ANSWER_TIME_MS..=MAX_ANSWER_TIME_MS).contains(&settings.answer_time_ms));
        assert!((MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&settings.interval_ms));
        assert!(settings.categories.is_empty());
        assert!(settings.difficulties.is_empty());
    }
}
