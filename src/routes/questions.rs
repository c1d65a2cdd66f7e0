use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::question::{ImportSummary, QuestionCountResponse, QuestionImportRequest},
    error::AppError,
    services::question_service,
    state::SharedState,
};

/// Routes managing the question pool.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/questions/import", post(import_questions))
        .route("/questions/count", get(count_questions))
}

/// Import a batch of questions into the pool.
#[utoipa::path(
    post,
    path = "/questions/import",
    tag = "questions",
    request_body = QuestionImportRequest,
    responses(
        (status = 200, description = "Batch stored", body = ImportSummary),
        (status = 400, description = "Malformed question in the batch"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn import_questions(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<QuestionImportRequest>>,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = question_service::import_questions(&state, payload).await?;
    Ok(Json(summary))
}

/// Number of questions in the pool.
#[utoipa::path(
    get,
    path = "/questions/count",
    tag = "questions",
    responses(
        (status = 200, description = "Pool size", body = QuestionCountResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn count_questions(
    State(state): State<SharedState>,
) -> Result<Json<QuestionCountResponse>, AppError> {
    let count = question_service::count_questions(&state).await?;
    Ok(Json(count))
}
