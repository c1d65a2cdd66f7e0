use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::{services::round_service, state::SharedState};

/// Cadence of the round controller's tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drive the round controller at 1 Hz until the process shuts down.
///
/// This loop is the only source of time-based progress; start, end, and
/// answer submissions arrive through HTTP but every deadline is observed
/// here.
pub async fn run(state: SharedState) {
    debug!(period_ms = TICK_PERIOD.as_millis() as u64, "round ticker running");

    let mut ticker = interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        round_service::tick(&state).await;
    }
}
