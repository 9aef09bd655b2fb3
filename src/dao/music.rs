use futures::future::BoxFuture;
use reqwest::StatusCode;
use thiserror::Error;

use crate::state::game::Track;

/// Result alias for calls to the external music service.
pub type MusicResult<T> = Result<T, MusicServiceError>;

/// Failures reported by the external music service client.
#[derive(Debug, Error)]
pub enum MusicServiceError {
    /// The session token was rejected.
    #[error("music service session is missing or expired; please log in again")]
    Unauthorized,
    /// The requested playlist or device does not exist.
    #[error("music service resource `{path}` not found")]
    NotFound {
        /// Request path.
        path: String,
    },
    /// No answer within the configured timeout.
    #[error("music service request to `{path}` timed out")]
    Timeout {
        /// Request path.
        path: String,
    },
    /// The request could not be delivered.
    #[error("failed to reach music service at `{path}`")]
    RequestSend {
        /// Request path.
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with an unexpected status.
    #[error("music service returned status {status} for `{path}`")]
    RequestStatus {
        /// Request path.
        path: String,
        /// Status received.
        status: StatusCode,
    },
    /// The response body did not have the expected shape.
    #[error("failed to decode music service response for `{path}`")]
    DecodeResponse {
        /// Request path.
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Building the HTTP client failed.
    #[error("failed to build music service client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
}

impl MusicServiceError {
    /// The service understood the request but refused it (4xx), e.g. a
    /// restricted device or an account without playback rights.
    pub fn is_refusal(&self) -> bool {
        matches!(self, MusicServiceError::RequestStatus { status, .. } if status.is_client_error())
    }
}

/// A playback target known to the music service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Device identifier used to address playback.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Device category (computer, smartphone, speaker, ...).
    pub kind: String,
    /// Whether the device currently holds the playback session.
    pub is_active: bool,
    /// Current volume, if reported.
    pub volume_percent: Option<u8>,
}

/// Opaque client of the external music service.
///
/// Every call takes the session access token; the futures own their inputs
/// so callers never hold locks across the network round trip.
pub trait MusicService: Send + Sync {
    /// All playable tracks of a playlist, following pagination.
    fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> BoxFuture<'static, MusicResult<Vec<Track>>>;

    /// Devices available to the logged-in account.
    fn devices(&self, token: &str) -> BoxFuture<'static, MusicResult<Vec<Device>>>;

    /// Start playing `track_id` on `device_id`.
    fn start_playback(
        &self,
        token: &str,
        device_id: &str,
        track_id: &str,
    ) -> BoxFuture<'static, MusicResult<()>>;

    /// Pause the current playback.
    fn pause_playback(&self, token: &str) -> BoxFuture<'static, MusicResult<()>>;

    /// Move playback to `device_id` without starting it.
    fn transfer_playback(&self, token: &str, device_id: &str)
    -> BoxFuture<'static, MusicResult<()>>;
}
