use std::{collections::BTreeSet, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of cells on a Bingo card (5×5 grid, row-major).
pub const CARD_CELLS: usize = 25;
/// Width (and height) of the card grid.
pub const GRID_SIZE: u8 = 5;

/// Identifier of a card inside the current `cards` mapping.
pub type CardId = String;

/// A track drawn from the external music service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Track {
    /// Music-service identifier, used as the track identity.
    pub id: String,
    /// Track title.
    pub name: String,
    /// Comma separated artist names.
    pub artist: String,
}

/// Win rule applied when evaluating cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum BingoMode {
    /// Any full row or column wins.
    #[serde(rename = "rowcol")]
    RowColumn,
    /// Rows, columns and both diagonals win.
    #[default]
    #[serde(rename = "rowcoldiag")]
    RowColumnDiagonal,
}

impl BingoMode {
    /// Whether diagonal lines count as a win under this mode.
    pub fn includes_diagonals(self) -> bool {
        matches!(self, BingoMode::RowColumnDiagonal)
    }
}

/// Result of the last explicit check performed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BingoStatus {
    /// The card was never checked since it was generated.
    #[default]
    NotChecked,
    /// Last check found no winning line.
    NoBingo,
    /// Last check found at least one winning line.
    Bingo,
}

impl fmt::Display for BingoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BingoStatus::NotChecked => "Not checked",
            BingoStatus::NoBingo => "No bingo yet",
            BingoStatus::Bingo => "BINGO!",
        };
        f.write_str(label)
    }
}

/// A 5×5 Bingo card handed to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Card {
    /// Exactly [`CARD_CELLS`] tracks laid out row by row.
    pub tracks: Vec<Track>,
    /// Grid positions whose track has been played, as of the last check.
    #[serde(default)]
    pub matches: BTreeSet<u8>,
    /// Outcome of the last check.
    #[serde(default)]
    pub bingo_status: BingoStatus,
}

impl Card {
    /// Build a fresh, unchecked card from its 25 tracks.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            matches: BTreeSet::new(),
            bingo_status: BingoStatus::NotChecked,
        }
    }
}

/// Whole game state, persisted as a single JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct GameState {
    /// Draw pool for the current round.
    pub unplayed_tracks: Vec<Track>,
    /// Chronological play history of the current round.
    pub played_tracks: Vec<Track>,
    /// Cards of the current round, in generation order.
    pub cards: IndexMap<CardId, Card>,
    /// Active win rule.
    pub bingo_mode: BingoMode,
    /// Music-service playlist the pool was loaded from.
    pub current_playlist: Option<String>,
    /// Size of the pool when it was loaded.
    pub num_tracks: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            unplayed_tracks: Vec::new(),
            played_tracks: Vec::new(),
            cards: IndexMap::new(),
            bingo_mode: BingoMode::default(),
            current_playlist: None,
            num_tracks: 0,
        }
    }
}

impl GameState {
    /// Check the structural invariants of a state read back from disk or
    /// from a saved game.
    ///
    /// A stale `num_tracks` counter is repaired in place; every other
    /// violation is reported so the caller can reject the document.
    pub fn validate(&mut self) -> Result<(), String> {
        for (card_id, card) in &self.cards {
            if card.tracks.len() != CARD_CELLS {
                return Err(format!(
                    "card `{card_id}` has {} tracks (expected {CARD_CELLS})",
                    card.tracks.len()
                ));
            }
            if let Some(position) = card.matches.iter().find(|p| usize::from(**p) >= CARD_CELLS) {
                return Err(format!(
                    "card `{card_id}` references out-of-grid position {position}"
                ));
            }
        }

        if let Some(track) = self
            .played_tracks
            .iter()
            .find(|played| self.unplayed_tracks.iter().any(|t| t.id == played.id))
        {
            return Err(format!(
                "track `{}` is both played and unplayed",
                track.id
            ));
        }

        let pool = self.unplayed_tracks.len() + self.played_tracks.len();
        if self.num_tracks != pool {
            self.num_tracks = pool;
        }

        Ok(())
    }

    /// Number of tracks still waiting to be drawn.
    pub fn remaining(&self) -> usize {
        self.unplayed_tracks.len()
    }
}
