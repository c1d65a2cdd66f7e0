//! Application-level configuration loading, including the static fallback question list.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{dao::models::Difficulty, state::trivia::Question};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TRIVIA_LIVE_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    fallback_questions: Vec<Question>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to a baked-in question list.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = app_config.fallback_questions.len(),
                        "loaded fallback question list from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration holding exactly the given fallback questions.
    pub fn with_fallback_questions(fallback_questions: Vec<Question>) -> Self {
        Self { fallback_questions }
    }

    /// Questions served when the store cannot supply one.
    pub fn fallback_questions(&self) -> &[Question] {
        &self.fallback_questions
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fallback_questions: default_questions(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    fallback_questions: Vec<RawQuestion>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let fallback_questions = value
            .fallback_questions
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();
        Self { fallback_questions }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single fallback question inside the configuration file.
struct RawQuestion {
    text: String,
    correct_answer: String,
    wrong_answers: [String; 3],
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    category_id: Option<Uuid>,
}

impl From<RawQuestion> for Question {
    fn from(value: RawQuestion) -> Self {
        Self {
            // Fallback questions live outside the store, so they get fresh
            // ids for the lifetime of the process.
            id: Uuid::new_v4(),
            text: value.text,
            correct_answer: value.correct_answer,
            wrong_answers: value.wrong_answers,
            category_id: value.category_id.unwrap_or(Uuid::nil()),
            difficulty: value.difficulty,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in question list shipped with the binary.
fn default_questions() -> Vec<Question> {
    let baked: [(&str, &str, [&str; 3], Difficulty); 6] = [
        (
            "Which planet is known as the Red Planet?",
            "Mars",
            ["Venus", "Jupiter", "Mercury"],
            Difficulty::Easy,
        ),
        (
            "How many minutes are in a full week?",
            "10080",
            ["7200", "10240", "9600"],
            Difficulty::Medium,
        ),
        (
            "What is the largest ocean on Earth?",
            "Pacific",
            ["Atlantic", "Indian", "Arctic"],
            Difficulty::Easy,
        ),
        (
            "Which element has the chemical symbol Au?",
            "Gold",
            ["Silver", "Aluminium", "Argon"],
            Difficulty::Medium,
        ),
        (
            "In which year did the first email get sent?",
            "1971",
            ["1965", "1983", "1977"],
            Difficulty::Hard,
        ),
        (
            "What is the capital of New Zealand?",
            "Wellington",
            ["Auckland", "Christchurch", "Canberra"],
            Difficulty::Medium,
        ),
    ];

    baked
        .into_iter()
        .map(|(text, correct, wrong, difficulty)| Question {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            correct_answer: correct.to_owned(),
            wrong_answers: wrong.map(str::to_owned),
            category_id: Uuid::nil(),
            difficulty,
        })
        .collect()
}
