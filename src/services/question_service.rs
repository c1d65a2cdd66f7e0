//! Question selection and pool management.
//!
//! Selection runs an ordered chain of attempts and prefers violating the
//! broadcaster's filters over stalling the round: filtered draw, then a
//! reset-or-unfiltered retry, then the static fallback list.

use std::sync::Arc;

use indexmap::IndexSet;
use rand::seq::IndexedRandom;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::QuestionEntity,
        trivia_store::{QuestionQuery, TriviaStore},
    },
    dto::question::{ImportSummary, QuestionCountResponse, QuestionImportRequest},
    error::ServiceError,
    state::{SharedState, trivia::{Question, RoundSettings}},
};

/// Used-question entries tolerated before an exhausted pool clears the dedup window.
pub const USED_RESET_THRESHOLD: usize = 10;

/// Pick the next question for a round.
///
/// `used` is a detached copy of the round's dedup window; the caller syncs
/// it back under the state lock once the question is on its way. Returns
/// `None` only when every step of the chain came up empty.
pub async fn select_question(
    store: Option<Arc<dyn TriviaStore>>,
    fallback: &[Question],
    settings: &RoundSettings,
    used: &mut IndexSet<Uuid>,
) -> Option<Question> {
    if let Some(store) = store {
        if let Some(question) = draw(&store, filtered_query(settings, used)).await {
            used.insert(question.id);
            return Some(question);
        }

        if !used.is_empty() {
            let retried = if used.len() > USED_RESET_THRESHOLD {
                // The dedup window ate the whole pool; forget it and try the
                // same filters once more.
                used.clear();
                draw(&store, filtered_query(settings, used)).await
            } else {
                // Broaden instead: drop the filters but keep the window.
                draw(&store, unfiltered_query(used)).await
            };

            if let Some(question) = retried {
                used.insert(question.id);
                return Some(question);
            }
        }
    }

    pick_fallback(fallback, used)
}

fn filtered_query(settings: &RoundSettings, used: &IndexSet<Uuid>) -> QuestionQuery {
    QuestionQuery {
        categories: settings.categories.iter().copied().collect(),
        difficulties: settings.difficulties.iter().copied().collect(),
        exclude: used.iter().copied().collect(),
    }
}

fn unfiltered_query(used: &IndexSet<Uuid>) -> QuestionQuery {
    QuestionQuery {
        exclude: used.iter().copied().collect(),
        ..QuestionQuery::default()
    }
}

/// Run one store draw, demoting errors to an empty result so the chain
/// continues instead of failing the round.
async fn draw(store: &Arc<dyn TriviaStore>, query: QuestionQuery) -> Option<Question> {
    match store.random_question(query).await {
        Ok(entity) => entity.map(Question::from),
        Err(err) => {
            warn!(error = %err, "question draw failed; continuing down the fallback chain");
            None
        }
    }
}

/// Last step of the chain: the static list from the configuration.
fn pick_fallback(fallback: &[Question], used: &mut IndexSet<Uuid>) -> Option<Question> {
    if fallback.is_empty() {
        return None;
    }

    let mut fresh: Vec<&Question> = fallback.iter().filter(|q| !used.contains(&q.id)).collect();
    if fresh.is_empty() {
        // Same exhaustion rule as the store path: a large window resets,
        // a small one means the list is genuinely too short to continue.
        if used.len() <= USED_RESET_THRESHOLD {
            return None;
        }
        used.clear();
        fresh = fallback.iter().collect();
    }

    let question = fresh.choose(&mut rand::rng()).map(|q| (*q).clone())?;
    used.insert(question.id);
    Some(question)
}

/// Store a validated batch of questions.
pub async fn import_questions(
    state: &SharedState,
    request: QuestionImportRequest,
) -> Result<ImportSummary, ServiceError> {
    let store = state.require_trivia_store().await?;
    let entities: Vec<QuestionEntity> = request.questions.into_iter().map(Into::into).collect();
    let imported = store.insert_questions(entities).await?;
    info!(imported, "imported question batch");
    Ok(ImportSummary { imported })
}

/// Size of the stored question pool.
pub async fn count_questions(state: &SharedState) -> Result<QuestionCountResponse, ServiceError> {
    let store = state.require_trivia_store().await?;
    let total = store.count_questions(QuestionQuery::default()).await?;
    Ok(QuestionCountResponse { total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::Difficulty;

    fn fallback_list(len: usize) -> Vec<Question> {
        (0..len)
            .map(|i| Question {
                id: Uuid::new_v4(),
                text: format!("fallback question {i}"),
                correct_answer: "yes".into(),
                wrong_answers: ["no".into(), "maybe".into(), "later".into()],
                category_id: Uuid::nil(),
                difficulty: Difficulty::Medium,
            })
            .collect()
    }

    #[tokio::test]
    async fn fallback_list_never_repeats_until_exhausted() {
        let fallback = fallback_list(4);
        let settings = RoundSettings::default();
        let mut used = IndexSet::new();

        let mut seen = IndexSet::new();
        for _ in 0..4 {
            let question = select_question(None, &fallback, &settings, &mut used)
                .await
                .expect("fallback should supply a question");
            assert!(seen.insert(question.id), "question repeated early");
        }

        // Window is small, so exhaustion reports NotFound instead of resetting.
        assert!(
            select_question(None, &fallback, &settings, &mut used)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn large_exhausted_window_resets_and_recovers() {
        let fallback = fallback_list(USED_RESET_THRESHOLD + 2);
        let settings = RoundSettings::default();
        let mut used = IndexSet::new();

        for _ in 0..fallback.len() {
            assert!(
                select_question(None, &fallback, &settings, &mut used)
                    .await
                    .is_some()
            );
        }
        assert_eq!(used.len(), fallback.len());

        // Every id is used and the window exceeds the threshold: it resets
        // and selection keeps going.
        let question = select_question(None, &fallback, &settings, &mut used)
            .await
            .expect("pool should reset");
        assert!(fallback.iter().any(|q| q.id == question.id));
        assert_eq!(used.len(), 1);
    }

    #[tokio::test]
    async fn empty_fallback_reports_not_found() {
        let settings = RoundSettings::default();
        let mut used = IndexSet::new();
        assert!(select_question(None, &[], &settings, &mut used).await.is_none());
    }
}
