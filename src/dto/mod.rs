//! Request, response, and event payload shapes exposed over HTTP and SSE.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Health payloads.
pub mod health;
/// Question import payloads.
pub mod question;
/// Round lifecycle and answer payloads.
pub mod round;
/// Score and leaderboard payloads.
pub mod score;
/// Settings payloads.
pub mod settings;
/// SSE envelope and round event payloads.
pub mod sse;
/// Validation helpers shared by the DTOs.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
