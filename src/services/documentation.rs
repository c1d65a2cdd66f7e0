use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Trivia Live Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::round_stream,
        crate::routes::round::start_round,
        crate::routes::round::end_round,
        crate::routes::round::round_status,
        crate::routes::round::submit_answer,
        crate::routes::round::session_scoreboard,
        crate::routes::settings::get_settings,
        crate::routes::settings::put_settings,
        crate::routes::questions::import_questions,
        crate::routes::questions::count_questions,
        crate::routes::scores::top_scores,
        crate::routes::scores::user_total,
    ),
    components(
        schemas(
            crate::dao::models::Difficulty,
            crate::dto::health::HealthResponse,
            crate::dto::round::AnswerSubmission,
            crate::dto::round::AnswerOutcome,
            crate::dto::round::RoundActionResponse,
            crate::dto::round::RoundStatusResponse,
            crate::dto::round::SessionScoreEntry,
            crate::dto::round::VisibleRoundPhase,
            crate::dto::settings::SettingsUpdateRequest,
            crate::dto::settings::SettingsView,
            crate::dto::question::QuestionImportRequest,
            crate::dto::question::QuestionInput,
            crate::dto::question::ImportSummary,
            crate::dto::question::QuestionCountResponse,
            crate::dto::score::ScoreView,
            crate::dto::score::UserTotalResponse,
            crate::dto::sse::RoundStartedEvent,
            crate::dto::sse::QuestionEvent,
            crate::dto::sse::CountdownEvent,
            crate::dto::sse::RoundEndedEvent,
            crate::dto::sse::SettingsChangedEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "round", description = "Round lifecycle and answer intake"),
        (name = "settings", description = "Per-broadcaster round settings"),
        (name = "questions", description = "Question pool management"),
        (name = "scores", description = "Persistent score totals"),
    )
)]
pub struct ApiDoc;
