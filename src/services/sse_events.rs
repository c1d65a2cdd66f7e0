use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    dto::sse::{RoundEvent, ServerEvent},
    state::SseHub,
};

const EVENT_ROUND_STARTED: &str = "round.started";
const EVENT_QUESTION: &str = "round.question";
const EVENT_COUNTDOWN: &str = "round.countdown";
const EVENT_ROUND_ENDED: &str = "round.ended";
const EVENT_SETTINGS_CHANGED: &str = "settings.changed";

/// Event name used on the SSE wire for each round event.
pub fn event_name(event: &RoundEvent) -> &'static str {
    match event {
        RoundEvent::RoundStarted(_) => EVENT_ROUND_STARTED,
        RoundEvent::Question(_) => EVENT_QUESTION,
        RoundEvent::Countdown(_) => EVENT_COUNTDOWN,
        RoundEvent::RoundEnded(_) => EVENT_ROUND_ENDED,
        RoundEvent::SettingsChanged(_) => EVENT_SETTINGS_CHANGED,
    }
}

/// Error raised when an event could not be handed to the channel.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The payload could not be serialized.
    #[error("failed to encode event payload")]
    Encode(#[from] serde_json::Error),
}

/// Channel the round controller publishes its events through.
///
/// Delivery is fire-and-forget: a successful publish only means the channel
/// accepted the event, not that any viewer saw it.
pub trait Broadcaster: Send + Sync {
    /// Publish one event on the given broadcaster's channel.
    fn publish(&self, channel_id: &str, event: &RoundEvent) -> Result<(), PublishError>;
}

/// Production broadcaster fanning events out through the SSE hub.
pub struct SseBroadcaster {
    hub: SseHub,
}

impl SseBroadcaster {
    /// Wrap the shared hub.
    pub fn new(hub: SseHub) -> Self {
        Self { hub }
    }
}

/// Wire envelope adding the channel to the typed payload.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    channel: &'a str,
    #[serde(flatten)]
    payload: &'a T,
}

impl Broadcaster for SseBroadcaster {
    fn publish(&self, channel_id: &str, event: &RoundEvent) -> Result<(), PublishError> {
        let name = event_name(event).to_string();
        let server_event = match event {
            RoundEvent::RoundStarted(payload) => wrap(name, channel_id, payload)?,
            RoundEvent::Question(payload) => wrap(name, channel_id, payload)?,
            RoundEvent::Countdown(payload) => wrap(name, channel_id, payload)?,
            RoundEvent::RoundEnded(payload) => wrap(name, channel_id, payload)?,
            RoundEvent::SettingsChanged(payload) => wrap(name, channel_id, payload)?,
        };

        debug!(event = server_event.event.as_deref(), channel_id, "publishing round event");
        self.hub.broadcast(server_event);
        Ok(())
    }
}

fn wrap<T: Serialize>(
    name: String,
    channel_id: &str,
    payload: &T,
) -> Result<ServerEvent, PublishError> {
    let envelope = Envelope {
        channel: channel_id,
        payload,
    };
    Ok(ServerEvent::json(Some(name), &envelope)?)
}
