use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{
        common::MessageResponse,
        playback::{
            DeviceDto, DevicesResponse, PlayResponse, PlayedTracksResponse, SelectDeviceRequest,
        },
    },
    error::AppError,
    services::playback_service,
    state::SharedState,
};

/// Playback endpoints. Everything except the play history needs a music
/// service session.
pub fn router(state: SharedState) -> Router<SharedState> {
    let controlled = Router::new()
        .route("/api/play", post(play))
        .route("/api/pause", post(pause))
        .route("/api/get_devices", get(get_devices))
        .route("/api/select_device", post(select_device))
        .route_layer(middleware::from_fn_with_state(state, require_music_session));

    Router::new()
        .route("/api/played_tracks", get(played_tracks))
        .merge(controlled)
}

/// Draw a random track from the pool and start it on the active device.
#[utoipa::path(
    post,
    path = "/api/play",
    tag = "playback",
    responses(
        (status = 200, description = "Track drawn and playing", body = PlayResponse),
        (status = 400, description = "Pool exhausted, no active device or playback refused"),
        (status = 401, description = "Not logged in to the music service"),
        (status = 500, description = "Music service failure"),
        (status = 503, description = "Music service timed out")
    )
)]
pub async fn play(State(state): State<SharedState>) -> Result<Json<PlayResponse>, AppError> {
    let outcome = playback_service::play_random(&state).await?;
    Ok(Json(PlayResponse {
        message: format!(
            "now playing `{}` by {}",
            outcome.track.name, outcome.track.artist
        ),
        track: outcome.track,
        device: outcome.device.name,
    }))
}

/// Pause playback.
#[utoipa::path(
    post,
    path = "/api/pause",
    tag = "playback",
    responses(
        (status = 200, description = "Playback paused", body = MessageResponse),
        (status = 400, description = "Music service refused to pause"),
        (status = 401, description = "Not logged in to the music service"),
        (status = 500, description = "Music service failure")
    )
)]
pub async fn pause(State(state): State<SharedState>) -> Result<Json<MessageResponse>, AppError> {
    playback_service::pause(&state).await?;
    Ok(Json(MessageResponse::new("playback paused")))
}

/// Tracks drawn so far in the round.
#[utoipa::path(
    get,
    path = "/api/played_tracks",
    tag = "playback",
    responses((status = 200, description = "Play history", body = PlayedTracksResponse))
)]
pub async fn played_tracks(State(state): State<SharedState>) -> Json<PlayedTracksResponse> {
    let played = playback_service::played_tracks(&state).await;
    Json(PlayedTracksResponse {
        total_played: played.tracks.len(),
        total_remaining: played.remaining,
        played_tracks: played.tracks,
    })
}

/// Playback devices of the logged-in account.
#[utoipa::path(
    get,
    path = "/api/get_devices",
    tag = "playback",
    responses(
        (status = 200, description = "Available devices", body = DevicesResponse),
        (status = 401, description = "Not logged in to the music service")
    )
)]
pub async fn get_devices(
    State(state): State<SharedState>,
) -> Result<Json<DevicesResponse>, AppError> {
    let devices = playback_service::devices(&state)
        .await?
        .into_iter()
        .map(DeviceDto::from)
        .collect();
    Ok(Json(DevicesResponse { devices }))
}

/// Move playback to another device.
#[utoipa::path(
    post,
    path = "/api/select_device",
    tag = "playback",
    request_body = SelectDeviceRequest,
    responses(
        (status = 200, description = "Playback transferred", body = MessageResponse),
        (status = 401, description = "Not logged in to the music service"),
        (status = 404, description = "Unknown device")
    )
)]
pub async fn select_device(
    State(state): State<SharedState>,
    Json(payload): Json<SelectDeviceRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    playback_service::select_device(&state, &payload.device_id).await?;
    Ok(Json(MessageResponse::new("playback device selected")))
}

async fn require_music_session(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    state.require_music_session().await?;
    Ok(next.run(req).await)
}
