use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness together with the session and real-time client counters.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.has_music_session().await, state.hub().client_count())
}
