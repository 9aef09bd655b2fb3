//! Draw a track from the pool and start it on the active playback device.
//!
//! The pool mutation is committed through the state store before the music
//! service is asked to play, and no lock is held across that network call.
//! A playback failure leaves the track marked as played; the host retries
//! with a fresh draw.

use tracing::{info, warn};

use crate::{
    dao::music::Device,
    error::ServiceError,
    services::notification_service,
    state::{
        SharedState,
        commands::DrawTrack,
        game::{GameState, Track},
        selector::TrackSelector,
    },
};

/// Result of a successful draw.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    /// Track moved to the play history.
    pub track: Track,
    /// Device the track was started on.
    pub device: Device,
    /// State right after the draw committed.
    pub snapshot: GameState,
}

/// Draw the track picked by `selector` and play it.
pub async fn draw_and_play<S>(state: &SharedState, selector: S) -> Result<DrawOutcome, ServiceError>
where
    S: TrackSelector + 'static,
{
    let token = state.require_music_session().await?;

    if state
        .store()
        .read(|game| game.unplayed_tracks.is_empty())
        .await
    {
        return Err(ServiceError::EmptyPool);
    }

    let device = state
        .music()
        .devices(&token)
        .await?
        .into_iter()
        .find(|device| device.is_active)
        .ok_or(ServiceError::NoActiveDevice)?;

    let (track, snapshot) = state.store().apply(DrawTrack::new(selector)).await?;
    info!(
        track_id = %track.id,
        device = %device.name,
        remaining = snapshot.remaining(),
        "track drawn"
    );
    notification_service::broadcast_new_track(state, &track, &snapshot);

    if let Err(err) = state
        .music()
        .start_playback(&token, &device.id, &track.id)
        .await
    {
        warn!(track_id = %track.id, error = %err, "playback failed, track stays played");
        return Err(err.into());
    }

    Ok(DrawOutcome {
        track,
        device,
        snapshot,
    })
}
