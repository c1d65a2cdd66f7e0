/// Round lifecycle state machine.
pub mod round;
mod sse;
/// Domain types for questions and per-broadcaster settings.
pub mod trivia;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig,
    dao::trivia_store::TriviaStore,
    error::ServiceError,
    services::sse_events::{Broadcaster, SseBroadcaster},
    state::{round::RoundState, trivia::RoundSettings},
};

pub use self::sse::SseHub;

/// Cheaply cloneable handle to the shared application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the round, its collaborators, and the SSE hub.
pub struct AppState {
    trivia_store: RwLock<Option<Arc<dyn TriviaStore>>>,
    sse: SseHub,
    broadcaster: Arc<dyn Broadcaster>,
    round: RwLock<RoundState>,
    settings_cache: DashMap<String, RoundSettings>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct the shared state with the SSE hub as the broadcast channel.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed by the supervisor.
    pub fn new(config: AppConfig) -> SharedState {
        let sse = SseHub::new(16);
        let broadcaster = Arc::new(SseBroadcaster::new(sse.clone()));
        Self::with_broadcaster(config, sse, broadcaster)
    }

    /// Construct the shared state around an arbitrary broadcast channel.
    ///
    /// Tests use this to script publish failures; production code goes
    /// through [`AppState::new`].
    pub fn with_broadcaster(
        config: AppConfig,
        sse: SseHub,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            trivia_store: RwLock::new(None),
            sse,
            broadcaster,
            round: RwLock::new(RoundState::new()),
            settings_cache: DashMap::new(),
            degraded: degraded_tx,
            config,
        })
    }

    /// Obtain a handle to the current trivia store, if one is installed.
    pub async fn trivia_store(&self) -> Option<Arc<dyn TriviaStore>> {
        let guard = self.trivia_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the trivia store or fail with a degraded-mode error.
    pub async fn require_trivia_store(&self) -> Result<Arc<dyn TriviaStore>, ServiceError> {
        self.trivia_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new trivia store implementation and leave degraded mode.
    pub async fn install_trivia_store(&self, store: Arc<dyn TriviaStore>) {
        {
            let mut guard = self.trivia_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current trivia store and enter degraded mode.
    pub async fn clear_trivia_store(&self) {
        {
            let mut guard = self.trivia_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.trivia_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Broadcast hub feeding the viewer SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Broadcast channel the round controller publishes through.
    pub fn broadcaster(&self) -> &Arc<dyn Broadcaster> {
        &self.broadcaster
    }

    /// Exclusive owner of all round state; the lone serialization point.
    pub fn round(&self) -> &RwLock<RoundState> {
        &self.round
    }

    /// Per-broadcaster settings cache, replaced whole on every write.
    pub fn settings_cache(&self) -> &DashMap<String, RoundSettings> {
        &self.settings_cache
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
