use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always `ok` while the process serves requests.
    pub status: String,
    /// Whether a music service session is installed.
    pub music_session: bool,
    /// Connected real-time clients.
    pub realtime_clients: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(music_session: bool, realtime_clients: usize) -> Self {
        Self {
            status: "ok".to_string(),
            music_session,
            realtime_clients,
        }
    }
}
