pub mod card_engine;
pub mod commands;
pub mod game;
mod hub;
pub mod selector;
pub mod store;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::{
    config::AppConfig,
    dao::{
        game_state_file::FileStateStorage, music::MusicService,
        playlist_registry::PlaylistRegistry, saved_games::SavedGames, storage::StorageResult,
    },
    error::ServiceError,
};

pub use self::hub::{ClientConnection, EventHub, send_event};
use self::store::GameStateStore;

/// Handle to the application state shared by every handler and task.
pub type SharedState = Arc<AppState>;

const EVENT_CAPACITY: usize = 64;

/// Central application state handed to every handler.
pub struct AppState {
    config: AppConfig,
    store: GameStateStore,
    registry: PlaylistRegistry,
    saved_games: SavedGames,
    music: Arc<dyn MusicService>,
    session: RwLock<Option<String>>,
    hub: EventHub,
}

impl AppState {
    /// Open every persisted document below the configured data directory and
    /// wrap the result in an [`Arc`] so it can be cloned cheaply.
    pub async fn initialise(
        config: AppConfig,
        music: Arc<dyn MusicService>,
        session_token: Option<String>,
    ) -> StorageResult<SharedState> {
        let store = GameStateStore::open(Arc::new(FileStateStorage::new(
            config.game_state_path(),
        )))
        .await?;
        let registry = PlaylistRegistry::new(config.playlists_path());
        let saved_games = SavedGames::new(config.saved_games_dir());

        if session_token.is_some() {
            info!("music service session installed from environment");
        }

        Ok(Arc::new(Self {
            config,
            store,
            registry,
            saved_games,
            music,
            session: RwLock::new(session_token),
            hub: EventHub::new(EVENT_CAPACITY),
        }))
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Owner of the live game state.
    pub fn store(&self) -> &GameStateStore {
        &self.store
    }

    /// Playlists remembered by the host.
    pub fn registry(&self) -> &PlaylistRegistry {
        &self.registry
    }

    /// Saved game snapshots.
    pub fn saved_games(&self) -> &SavedGames {
        &self.saved_games
    }

    /// External music service client.
    pub fn music(&self) -> &Arc<dyn MusicService> {
        &self.music
    }

    /// Real-time fan-out hub.
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Access token of the current music service session.
    pub async fn require_music_session(&self) -> Result<String, ServiceError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(ServiceError::AuthRequired)
    }

    /// Whether a music service session is installed.
    pub async fn has_music_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Install or replace the music service session token.
    pub async fn set_music_session(&self, token: String) {
        *self.session.write().await = Some(token);
        info!("music service session installed");
    }

    /// Forget the current music service session.
    pub async fn clear_music_session(&self) {
        self.session.write().await.take();
        info!("music service session cleared");
    }
}
