//! Application-level configuration loading: data locations, pool sizing and
//! the music service endpoint.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::spotify::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, SpotifyConfig};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MUSIC_BINGO_CONFIG_PATH";
/// Default directory holding every persisted document.
const DEFAULT_DATA_DIR: &str = "data";
/// Default number of tracks sampled from a playlist into the pool.
pub const DEFAULT_MAX_POOL_SIZE: usize = 100;

const GAME_STATE_FILE: &str = "game_state.json";
const PLAYLISTS_FILE: &str = "playlists.json";
const SAVED_GAMES_DIR: &str = "saved_games";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    data_dir: PathBuf,
    max_pool_size: usize,
    spotify: SpotifyConfig,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    /// Load the configuration stored at `path`, falling back to built-in defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        data_dir = %app_config.data_dir.display(),
                        max_pool_size = app_config.max_pool_size,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Configuration rooted at `data_dir`, every other field left at its default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Directory holding every persisted document.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the game state document.
    pub fn game_state_path(&self) -> PathBuf {
        self.data_dir.join(GAME_STATE_FILE)
    }

    /// Location of the playlist registry.
    pub fn playlists_path(&self) -> PathBuf {
        self.data_dir.join(PLAYLISTS_FILE)
    }

    /// Directory of saved games.
    pub fn saved_games_dir(&self) -> PathBuf {
        self.data_dir.join(SAVED_GAMES_DIR)
    }

    /// Upper bound on the number of tracks loaded into the pool.
    pub fn max_pool_size(&self) -> usize {
        self.max_pool_size
    }

    /// How to reach the Spotify Web API.
    pub fn spotify(&self) -> &SpotifyConfig {
        &self.spotify
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            spotify: SpotifyConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    data_dir: Option<PathBuf>,
    max_pool_size: Option<usize>,
    spotify: RawSpotify,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSpotify {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let spotify = SpotifyConfig::new(
            value
                .spotify
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            value
                .spotify
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        );
        Self {
            data_dir: value
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            max_pool_size: value
                .max_pool_size
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_MAX_POOL_SIZE),
            spotify,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
