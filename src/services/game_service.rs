use time::OffsetDateTime;
use tracing::info;

use crate::{
    dao::saved_games::{SavedGameInfo, is_valid_filename},
    dto::game::DashboardResponse,
    error::ServiceError,
    services::notification_service,
    state::{
        SharedState,
        card_engine,
        commands::{RestoreSnapshot, SetBingoMode},
        game::{BingoMode, GameState},
    },
};

/// Discard the pool, history and cards and start from the default state.
pub async fn new_round(state: &SharedState) -> Result<GameState, ServiceError> {
    let fresh = state.store().reset_to_default().await?;
    notification_service::broadcast_round_reset(state, "new round started");
    Ok(fresh)
}

/// Switch the win rule used by card checks and the dashboard.
pub async fn set_bingo_mode(state: &SharedState, mode: BingoMode) -> Result<BingoMode, ServiceError> {
    state.store().apply(SetBingoMode { mode }).await?;
    info!(?mode, "bingo mode changed");
    Ok(mode)
}

/// Snapshot the live game into the saved games directory.
pub async fn save_game(
    state: &SharedState,
    name: &str,
    description: Option<&str>,
) -> Result<String, ServiceError> {
    let snapshot = state.store().snapshot().await;
    let filename = state
        .saved_games()
        .save(
            name.trim(),
            description.unwrap_or_default().trim(),
            snapshot,
            OffsetDateTime::now_utc(),
        )
        .await?;
    info!(%filename, "game saved");
    Ok(filename)
}

/// Saved games, newest first.
pub async fn list_saved_games(state: &SharedState) -> Result<Vec<SavedGameInfo>, ServiceError> {
    Ok(state.saved_games().list().await?)
}

/// Replace the live game with a saved snapshot.
pub async fn load_game(state: &SharedState, filename: &str) -> Result<GameState, ServiceError> {
    if !is_valid_filename(filename) {
        return Err(ServiceError::InvalidInput(format!(
            "invalid saved game file name `{filename}`"
        )));
    }
    let saved = state
        .saved_games()
        .load(filename)
        .await
        .map_err(|err| {
            if err.is_corrupt() {
                ServiceError::InvalidInput(format!("saved game `{filename}` is unreadable: {err}"))
            } else {
                err.into()
            }
        })?
        .ok_or_else(|| ServiceError::NotFound(format!("saved game `{filename}` not found")))?;

    let (_, snapshot) = state
        .store()
        .apply(RestoreSnapshot {
            snapshot: saved.game_state,
        })
        .await?;
    info!(%filename, name = %saved.name, "saved game restored");
    notification_service::broadcast_round_reset(state, &format!("game `{}` loaded", saved.name));
    Ok(snapshot)
}

/// Full snapshot of the live game.
pub async fn game_state(state: &SharedState) -> GameState {
    state.store().snapshot().await
}

/// Counters plus the pattern each card reached.
pub async fn dashboard(state: &SharedState) -> DashboardResponse {
    state
        .store()
        .read(|game| DashboardResponse {
            num_tracks: game.num_tracks,
            total_played: game.played_tracks.len(),
            total_remaining: game.remaining(),
            bingo_mode: game.bingo_mode,
            current_playlist: game.current_playlist.clone(),
            card_summaries: card_engine::summarize(
                &game.cards,
                &game.played_tracks,
                game.bingo_mode,
            ),
        })
        .await
}
