use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use validator::Validate;

use crate::{
    dto::{
        common::MessageResponse,
        playlist::{
            AddPlaylistRequest, LoadPlaylistRequest, LoadPlaylistResponse, PlaylistDto,
            PlaylistsResponse, SetDefaultPlaylistRequest,
        },
    },
    error::AppError,
    services::playlist_service,
    state::SharedState,
};

/// Playlist registry and pool loading endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/get_playlists", get(get_playlists))
        .route("/api/add_playlist", post(add_playlist))
        .route("/api/set_default_playlist", post(set_default_playlist))
        .route("/api/playlists/{id}", delete(remove_playlist))
        .route("/api/load_playlist", post(load_playlist))
}

/// List every playlist remembered by the host.
#[utoipa::path(
    get,
    path = "/api/get_playlists",
    tag = "playlists",
    responses((status = 200, description = "Registry entries", body = PlaylistsResponse))
)]
pub async fn get_playlists(
    State(state): State<SharedState>,
) -> Result<Json<PlaylistsResponse>, AppError> {
    let playlists = playlist_service::list_playlists(&state)
        .await?
        .into_iter()
        .map(PlaylistDto::from)
        .collect();
    Ok(Json(PlaylistsResponse { playlists }))
}

/// Remember a playlist, optionally making it the default.
#[utoipa::path(
    post,
    path = "/api/add_playlist",
    tag = "playlists",
    request_body = AddPlaylistRequest,
    responses(
        (status = 200, description = "Playlist stored", body = MessageResponse),
        (status = 400, description = "Missing or malformed id or name")
    )
)]
pub async fn add_playlist(
    State(state): State<SharedState>,
    Json(payload): Json<AddPlaylistRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    let entry = playlist_service::add_playlist(&state, payload).await?;
    Ok(Json(MessageResponse::new(format!(
        "playlist `{}` added",
        entry.name
    ))))
}

/// Make one playlist the only default.
#[utoipa::path(
    post,
    path = "/api/set_default_playlist",
    tag = "playlists",
    request_body = SetDefaultPlaylistRequest,
    responses(
        (status = 200, description = "Default updated", body = MessageResponse),
        (status = 404, description = "Unknown playlist")
    )
)]
pub async fn set_default_playlist(
    State(state): State<SharedState>,
    Json(payload): Json<SetDefaultPlaylistRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    let id = playlist_service::set_default_playlist(&state, &payload.playlist_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "playlist `{id}` is now the default"
    ))))
}

/// Forget a playlist.
#[utoipa::path(
    delete,
    path = "/api/playlists/{id}",
    tag = "playlists",
    params(("id" = String, Path, description = "Playlist identifier")),
    responses(
        (status = 200, description = "Playlist removed", body = MessageResponse),
        (status = 404, description = "Unknown playlist")
    )
)]
pub async fn remove_playlist(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = playlist_service::remove_playlist(&state, &id).await?;
    Ok(Json(MessageResponse::new(format!("playlist `{id}` removed"))))
}

/// Load a playlist into the draw pool, starting a new round.
#[utoipa::path(
    post,
    path = "/api/load_playlist",
    tag = "playlists",
    request_body(content = LoadPlaylistRequest, description = "Omit the body or the id to load the default playlist"),
    responses(
        (status = 200, description = "Pool loaded", body = LoadPlaylistResponse),
        (status = 400, description = "No playlist id or no playable tracks"),
        (status = 401, description = "Not logged in to the music service")
    )
)]
pub async fn load_playlist(
    State(state): State<SharedState>,
    payload: Option<Json<LoadPlaylistRequest>>,
) -> Result<Json<LoadPlaylistResponse>, AppError> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    payload.validate()?;
    let loaded = playlist_service::load_playlist(&state, payload.playlist_id.as_deref()).await?;
    Ok(Json(LoadPlaylistResponse {
        message: format!(
            "loaded {} tracks from playlist `{}`",
            loaded.tracks_loaded, loaded.playlist_id
        ),
        tracks_loaded: loaded.tracks_loaded,
        tracks_available: loaded.tracks_available,
    }))
}
