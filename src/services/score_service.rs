use crate::{
    dto::{
        score::{ScoreView, UserTotalResponse},
        validation::validate_user_id,
    },
    error::ServiceError,
    state::SharedState,
};

const DEFAULT_TOP_LIMIT: u32 = 10;
const MAX_TOP_LIMIT: u32 = 100;

/// Highest persistent totals, best first.
pub async fn top_scores(
    state: &SharedState,
    limit: Option<u32>,
) -> Result<Vec<ScoreView>, ServiceError> {
    let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT).min(MAX_TOP_LIMIT);
    let store = state.require_trivia_store().await?;
    let scores = store.top_scores(limit).await?;
    Ok(scores.into_iter().map(Into::into).collect())
}

/// One viewer's persistent total; zero when the viewer has never scored.
pub async fn user_total(
    state: &SharedState,
    user_id: &str,
) -> Result<UserTotalResponse, ServiceError> {
    validate_user_id(user_id)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_trivia_store().await?;
    let points = store.get_points(user_id.to_owned()).await?;
    Ok(UserTotalResponse {
        user_id: user_id.to_owned(),
        points,
    })
}
