/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Question selection and pool management.
pub mod question_service;
/// Round lifecycle state management and answer handling.
pub mod round_service;
/// Persistent score projections.
pub mod score_service;
/// Deterministic answer scoring.
pub mod scoring;
/// Per-broadcaster settings resolution and updates.
pub mod settings_service;
/// Round event broadcasting primitives.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervision and degraded-mode handling.
pub mod storage_supervisor;
/// The 1 Hz loop driving round progress.
pub mod ticker;
