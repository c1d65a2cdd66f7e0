use axum::Router;

use crate::state::SharedState;

/// OpenAPI documentation routes.
pub mod docs;
/// Health check routes.
pub mod health;
/// Question pool routes.
pub mod questions;
/// Round lifecycle and answer routes.
pub mod round;
/// Persistent score routes.
pub mod scores;
/// Per-broadcaster settings routes.
pub mod settings;
/// Server-sent events routes.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(round::router())
        .merge(settings::router())
        .merge(questions::router())
        .merge(scores::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
