use std::collections::HashSet;

use rand::{Rng, seq::index};
use tracing::info;

use crate::{
    dao::playlist_registry::{PlaylistEntry, RegistryUpdate},
    dto::{playlist::AddPlaylistRequest, validation::normalize_playlist_id},
    error::ServiceError,
    services::notification_service,
    state::{SharedState, commands::LoadPool, game::Track},
};

/// Outcome of [`load_playlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPool {
    /// Playlist the pool comes from.
    pub playlist_id: String,
    /// Tracks placed in the pool.
    pub tracks_loaded: usize,
    /// Distinct playable tracks found in the playlist.
    pub tracks_available: usize,
}

/// Every registry entry.
pub async fn list_playlists(state: &SharedState) -> Result<Vec<PlaylistEntry>, ServiceError> {
    Ok(state.registry().list().await?)
}

/// Remember a playlist, replacing an entry with the same id.
pub async fn add_playlist(
    state: &SharedState,
    request: AddPlaylistRequest,
) -> Result<PlaylistEntry, ServiceError> {
    let entry = PlaylistEntry {
        id: parse_playlist_id(&request.id)?,
        name: request.name.trim().to_string(),
        owner: request.owner.filter(|owner| !owner.trim().is_empty()),
        is_default: request.is_default,
    };
    state.registry().add(entry.clone()).await?;
    info!(playlist_id = %entry.id, is_default = entry.is_default, "playlist added");
    Ok(entry)
}

/// Make `raw_id` the only default playlist.
pub async fn set_default_playlist(state: &SharedState, raw_id: &str) -> Result<String, ServiceError> {
    let id = parse_playlist_id(raw_id)?;
    match state.registry().set_default(&id).await? {
        RegistryUpdate::Updated => {
            info!(playlist_id = %id, "default playlist set");
            Ok(id)
        }
        RegistryUpdate::Missing => Err(unknown_playlist(&id)),
    }
}

/// Forget a registry entry.
pub async fn remove_playlist(state: &SharedState, raw_id: &str) -> Result<String, ServiceError> {
    let id = parse_playlist_id(raw_id)?;
    match state.registry().remove(&id).await? {
        RegistryUpdate::Updated => {
            info!(playlist_id = %id, "playlist removed");
            Ok(id)
        }
        RegistryUpdate::Missing => Err(unknown_playlist(&id)),
    }
}

/// Fetch a playlist and make a sample of it the draw pool of a new round.
///
/// Without an explicit id the registry default is loaded.
pub async fn load_playlist(
    state: &SharedState,
    raw_id: Option<&str>,
) -> Result<LoadedPool, ServiceError> {
    let token = state.require_music_session().await?;
    let playlist_id = match raw_id {
        Some(raw) => parse_playlist_id(raw)?,
        None => state
            .registry()
            .default_playlist()
            .await?
            .map(|entry| entry.id)
            .ok_or_else(|| {
                ServiceError::InvalidInput(
                    "no playlist id provided and no default playlist set".into(),
                )
            })?,
    };

    let fetched = state
        .music()
        .playlist_tracks(&token, &playlist_id)
        .await?;
    let distinct = dedupe(fetched);
    if distinct.is_empty() {
        return Err(ServiceError::InvalidInput(format!(
            "no playable tracks found in playlist `{playlist_id}`"
        )));
    }

    let tracks_available = distinct.len();
    let pool = sample_pool(distinct, state.config().max_pool_size(), &mut rand::rng());
    let (tracks_loaded, _) = state
        .store()
        .apply(LoadPool {
            playlist_id: playlist_id.clone(),
            tracks: pool,
        })
        .await?;

    info!(%playlist_id, tracks_loaded, tracks_available, "playlist loaded");
    notification_service::broadcast_pool_loaded(state, &playlist_id, tracks_loaded);

    Ok(LoadedPool {
        playlist_id,
        tracks_loaded,
        tracks_available,
    })
}

fn parse_playlist_id(raw: &str) -> Result<String, ServiceError> {
    normalize_playlist_id(raw)
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid playlist id `{raw}`")))
}

fn unknown_playlist(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("playlist `{id}` not found"))
}

/// Drop repeated tracks, keeping the first occurrence.
fn dedupe(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.id.clone()))
        .collect()
}

/// Uniform sample of at most `max` tracks.
fn sample_pool<R>(tracks: Vec<Track>, max: usize, rng: &mut R) -> Vec<Track>
where
    R: Rng + ?Sized,
{
    if tracks.len() <= max {
        return tracks;
    }
    let mut picked: Vec<usize> = index::sample(rng, tracks.len(), max).into_vec();
    picked.sort_unstable();
    let mut slots: Vec<Option<Track>> = tracks.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
