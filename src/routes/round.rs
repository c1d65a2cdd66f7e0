use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        round::{
            AnswerOutcome, AnswerSubmission, RoundActionResponse, RoundStatusResponse,
            SessionScoreEntry,
        },
        validation::validate_user_id,
    },
    error::AppError,
    services::round_service::{self, EndOutcome, StartOutcome},
    state::SharedState,
};

/// Routes driving the round lifecycle and answer intake.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/round/{broadcaster_id}/start", post(start_round))
        .route("/round/{broadcaster_id}/end", post(end_round))
        .route("/round/status", get(round_status))
        .route("/round/answers", post(submit_answer))
        .route("/round/scoreboard", get(session_scoreboard))
}

/// Start a trivia round for the broadcaster.
#[utoipa::path(
    post,
    path = "/round/{broadcaster_id}/start",
    tag = "round",
    params(("broadcaster_id" = String, Path, description = "Broadcaster starting the round")),
    responses(
        (status = 200, description = "Round started or already running", body = RoundActionResponse),
        (status = 503, description = "Round could not be announced")
    )
)]
pub async fn start_round(
    State(state): State<SharedState>,
    Path(broadcaster_id): Path<String>,
) -> Result<Json<RoundActionResponse>, AppError> {
    validate_user_id(&broadcaster_id)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let outcome = round_service::start_round(&state, &broadcaster_id)
        .await
        .map_err(|_| AppError::ServiceUnavailable("failed to start trivia round".into()))?;

    let response = match outcome {
        StartOutcome::Started { interval_ms } => RoundActionResponse {
            performed: true,
            message: format!("trivia round started (next question in {interval_ms} ms)"),
        },
        StartOutcome::AlreadyRunning => RoundActionResponse {
            performed: false,
            message: "trivia already running".into(),
        },
    };
    Ok(Json(response))
}

/// End the running trivia round.
#[utoipa::path(
    post,
    path = "/round/{broadcaster_id}/end",
    tag = "round",
    params(("broadcaster_id" = String, Path, description = "Broadcaster ending the round")),
    responses(
        (status = 200, description = "Round ended or nothing was running", body = RoundActionResponse)
    )
)]
pub async fn end_round(
    State(state): State<SharedState>,
    Path(broadcaster_id): Path<String>,
) -> Result<Json<RoundActionResponse>, AppError> {
    validate_user_id(&broadcaster_id)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let response = match round_service::end_round(&state, &broadcaster_id).await {
        EndOutcome::Ended => RoundActionResponse {
            performed: true,
            message: "trivia round ended".into(),
        },
        EndOutcome::NotRunning => RoundActionResponse {
            performed: false,
            message: "no trivia round is running".into(),
        },
    };
    Ok(Json(response))
}

/// Snapshot of the round controller.
#[utoipa::path(
    get,
    path = "/round/status",
    tag = "round",
    responses((status = 200, description = "Current round state", body = RoundStatusResponse))
)]
pub async fn round_status(State(state): State<SharedState>) -> Json<RoundStatusResponse> {
    Json(round_service::status(&state).await)
}

/// Submit a viewer's answer to the live question.
#[utoipa::path(
    post,
    path = "/round/answers",
    tag = "round",
    request_body = AnswerSubmission,
    responses(
        (status = 200, description = "Answer scored (or rejected when no question is live)", body = AnswerOutcome)
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Valid(Json(submission)): Valid<Json<AnswerSubmission>>,
) -> Json<AnswerOutcome> {
    Json(round_service::submit_answer(&state, submission).await)
}

/// Per-round scoreboard, best first.
#[utoipa::path(
    get,
    path = "/round/scoreboard",
    tag = "round",
    responses((status = 200, description = "Session scoreboard", body = [SessionScoreEntry]))
)]
pub async fn session_scoreboard(
    State(state): State<SharedState>,
) -> Json<Vec<SessionScoreEntry>> {
    Json(round_service::session_scoreboard(&state).await)
}
