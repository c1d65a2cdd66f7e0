use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::{
        settings::{SettingsUpdateRequest, SettingsView},
        validation::validate_user_id,
    },
    error::AppError,
    services::settings_service,
    state::SharedState,
};

/// Routes handling per-broadcaster settings.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/settings/{broadcaster_id}",
        get(get_settings).put(put_settings),
    )
}

/// Current round settings for a broadcaster (defaults when none are stored).
#[utoipa::path(
    get,
    path = "/settings/{broadcaster_id}",
    tag = "settings",
    params(("broadcaster_id" = String, Path, description = "Broadcaster the settings belong to")),
    responses((status = 200, description = "Effective settings", body = SettingsView))
)]
pub async fn get_settings(
    State(state): State<SharedState>,
    Path(broadcaster_id): Path<String>,
) -> Result<Json<SettingsView>, AppError> {
    validate_user_id(&broadcaster_id)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    Ok(Json(settings_service::fetch(&state, &broadcaster_id).await))
}

/// Replace a broadcaster's round settings.
#[utoipa::path(
    put,
    path = "/settings/{broadcaster_id}",
    tag = "settings",
    params(("broadcaster_id" = String, Path, description = "Broadcaster the settings belong to")),
    request_body = SettingsUpdateRequest,
    responses(
        (status = 200, description = "Settings stored", body = SettingsView),
        (status = 400, description = "Values outside the accepted ranges"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn put_settings(
    State(state): State<SharedState>,
    Path(broadcaster_id): Path<String>,
    Valid(Json(payload)): Valid<Json<SettingsUpdateRequest>>,
) -> Result<Json<SettingsView>, AppError> {
    validate_user_id(&broadcaster_id)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let view = settings_service::update(&state, &broadcaster_id, payload).await?;
    Ok(Json(view))
}
