use tracing::{info, warn};

use crate::{
    dto::{
        settings::{SettingsUpdateRequest, SettingsView},
        sse::{RoundEvent, SettingsChangedEvent},
    },
    error::ServiceError,
    state::{SharedState, trivia::RoundSettings},
};

/// Resolve a broadcaster's settings: cache first, then storage, then defaults.
///
/// Storage trouble degrades to the defaults so the round keeps running.
pub async fn resolve(state: &SharedState, broadcaster_id: &str) -> RoundSettings {
    if let Some(cached) = state.settings_cache().get(broadcaster_id) {
        return cached.clone();
    }

    let Some(store) = state.trivia_store().await else {
        return RoundSettings::default();
    };

    match store.get_settings(broadcaster_id.to_owned()).await {
        Ok(Some(entity)) => {
            let settings: RoundSettings = entity.into();
            state
                .settings_cache()
                .insert(broadcaster_id.to_owned(), settings.clone());
            settings
        }
        Ok(None) => RoundSettings::default(),
        Err(err) => {
            warn!(broadcaster_id, error = %err, "failed to load settings; using defaults");
            RoundSettings::default()
        }
    }
}

/// Current settings for a broadcaster in client-facing form.
pub async fn fetch(state: &SharedState, broadcaster_id: &str) -> SettingsView {
    let settings = resolve(state, broadcaster_id).await;
    SettingsView::from_settings(broadcaster_id, &settings)
}

/// Replace a broadcaster's settings.
///
/// The payload was already range-checked at the boundary; persistence must
/// succeed before the cache is touched so a storage outage never leaves the
/// cache ahead of the store.
pub async fn update(
    state: &SharedState,
    broadcaster_id: &str,
    request: SettingsUpdateRequest,
) -> Result<SettingsView, ServiceError> {
    let settings: RoundSettings = request.into();

    let store = state.require_trivia_store().await?;
    store.put_settings(settings.to_entity(broadcaster_id)).await?;

    state
        .settings_cache()
        .insert(broadcaster_id.to_owned(), settings.clone());

    let event = RoundEvent::SettingsChanged(SettingsChangedEvent {
        answer_time_ms: settings.answer_time_ms,
        interval_ms: settings.interval_ms,
    });
    if let Err(err) = state.broadcaster().publish(broadcaster_id, &event) {
        warn!(broadcaster_id, error = %err, "failed to announce settings change");
    }

    info!(
        broadcaster_id,
        answer_time_ms = settings.answer_time_ms,
        interval_ms = settings.interval_ms,
        "settings updated"
    );
    Ok(SettingsView::from_settings(broadcaster_id, &settings))
}
