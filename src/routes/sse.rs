use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/round",
    tag = "sse",
    responses((status = 200, description = "Round event stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime round events to connected overlays and viewers.
pub async fn round_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe(&state);
    info!("new viewer SSE connection");
    sse_service::broadcast_info(state.sse(), "round stream connected");
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/round", get(round_stream))
}
