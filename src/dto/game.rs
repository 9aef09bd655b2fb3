//! DTO definitions for round management, saved games and the dashboard.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::saved_games::SavedGameInfo,
    dto::validation::validate_not_blank,
    state::{
        card_engine::CardSummary,
        game::{BingoMode, CardId},
    },
};

/// Request to change the win rule.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BingoModeRequest {
    /// `rowcol` or `rowcoldiag`.
    pub bingo_mode: BingoMode,
}

/// Win rule now in force.
#[derive(Debug, Serialize, ToSchema)]
pub struct BingoModeResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Active rule.
    pub bingo_mode: BingoMode,
}

/// Request to snapshot the current game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveGameRequest {
    /// Name of the save.
    #[serde(default)]
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Outcome of a save.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveGameResponse {
    /// Human-readable outcome.
    pub message: String,
    /// File the snapshot was stored in; pass it to `load_game`.
    pub filename: String,
}

/// Listing entry of a saved game.
#[derive(Debug, Serialize, ToSchema)]
pub struct SavedGameDto {
    /// File name to pass to `load_game`.
    pub filename: String,
    /// Name chosen by the host.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// RFC 3339 timestamp of the save.
    pub timestamp: String,
}

impl From<SavedGameInfo> for SavedGameDto {
    fn from(info: SavedGameInfo) -> Self {
        Self {
            filename: info.filename,
            name: info.name,
            description: info.description,
            timestamp: info.timestamp,
        }
    }
}

/// Saved games, newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct SavedGamesResponse {
    /// Every readable save.
    pub saved_games: Vec<SavedGameDto>,
}

/// Host dashboard overview.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Pool size when the playlist was loaded.
    pub num_tracks: usize,
    /// Tracks played so far.
    pub total_played: usize,
    /// Tracks left in the pool.
    pub total_remaining: usize,
    /// Active win rule.
    pub bingo_mode: BingoMode,
    /// Playlist the pool comes from.
    pub current_playlist: Option<String>,
    /// Pattern reached by each card.
    pub card_summaries: IndexMap<CardId, CardSummary>,
}
