use tracing::info;

use crate::{
    dao::music::Device,
    error::ServiceError,
    services::draw_sequencer::{self, DrawOutcome},
    state::{SharedState, game::Track, selector::RandomTrack},
};

/// Play history of the current round with its counters.
#[derive(Debug, Clone)]
pub struct PlayedTracks {
    /// Tracks in draw order.
    pub tracks: Vec<Track>,
    /// Tracks left in the pool.
    pub remaining: usize,
}

/// Draw a random track from the pool and play it.
pub async fn play_random(state: &SharedState) -> Result<DrawOutcome, ServiceError> {
    draw_sequencer::draw_and_play(state, RandomTrack).await
}

/// Pause playback on the active device.
pub async fn pause(state: &SharedState) -> Result<(), ServiceError> {
    let token = state.require_music_session().await?;
    state.music().pause_playback(&token).await?;
    info!("playback paused");
    Ok(())
}

/// Playback devices of the logged-in account.
pub async fn devices(state: &SharedState) -> Result<Vec<Device>, ServiceError> {
    let token = state.require_music_session().await?;
    Ok(state.music().devices(&token).await?)
}

/// Move the playback session to `device_id` without starting a track.
pub async fn select_device(state: &SharedState, device_id: &str) -> Result<(), ServiceError> {
    let token = state.require_music_session().await?;
    state
        .music()
        .transfer_playback(&token, device_id.trim())
        .await?;
    info!(device_id, "playback transferred");
    Ok(())
}

/// Tracks drawn so far.
pub async fn played_tracks(state: &SharedState) -> PlayedTracks {
    state
        .store()
        .read(|game| PlayedTracks {
            tracks: game.played_tracks.clone(),
            remaining: game.remaining(),
        })
        .await
}
