use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::score::{ScoreView, TopScoresQuery, UserTotalResponse},
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Routes exposing persistent score totals.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/scores/top", get(top_scores))
        .route("/scores/{user_id}", get(user_total))
}

/// Highest persistent totals, best first.
#[utoipa::path(
    get,
    path = "/scores/top",
    tag = "scores",
    params(("limit" = Option<u32>, Query, description = "Maximum entries (default 10, capped at 100)")),
    responses(
        (status = 200, description = "Leaderboard", body = [ScoreView]),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn top_scores(
    State(state): State<SharedState>,
    Query(query): Query<TopScoresQuery>,
) -> Result<Json<Vec<ScoreView>>, AppError> {
    let scores = score_service::top_scores(&state, query.limit).await?;
    Ok(Json(scores))
}

/// One viewer's persistent total.
#[utoipa::path(
    get,
    path = "/scores/{user_id}",
    tag = "scores",
    params(("user_id" = String, Path, description = "Viewer the total belongs to")),
    responses(
        (status = 200, description = "Viewer total", body = UserTotalResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn user_total(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserTotalResponse>, AppError> {
    let total = score_service::user_total(&state, &user_id).await?;
    Ok(Json(total))
}
