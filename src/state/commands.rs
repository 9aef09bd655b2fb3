//! Typed mutations accepted by [`GameStateStore::apply`](super::store::GameStateStore::apply).
//!
//! A command either succeeds and leaves the state in its new shape, or fails
//! without touching it.

use indexmap::IndexMap;
use thiserror::Error;

use crate::state::{
    card_engine::{self, CardEngineError, Evaluation},
    game::{BingoMode, BingoStatus, Card, CardId, GameState, Track},
    selector::TrackSelector,
};

/// Reasons a command refuses to run against the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// No unplayed tracks are left.
    #[error("no unplayed tracks available")]
    EmptyPool,
    /// The selector did not match any unplayed track.
    #[error("requested track is not in the unplayed pool")]
    NoTrackSelected,
    /// Too few tracks to fill a card.
    #[error("not enough unplayed tracks: need {required}, have {available}")]
    InsufficientTracks {
        /// Tracks needed per card.
        required: usize,
        /// Tracks available in the pool.
        available: usize,
    },
    /// The card identifier is not part of the current round.
    #[error("card `{0}` not found")]
    UnknownCard(CardId),
    /// A snapshot handed to the store breaks the state invariants.
    #[error("invalid game snapshot: {0}")]
    InvalidSnapshot(String),
}

impl From<CardEngineError> for CommandError {
    fn from(err: CardEngineError) -> Self {
        match err {
            CardEngineError::InsufficientTracks {
                required,
                available,
            } => CommandError::InsufficientTracks {
                required,
                available,
            },
        }
    }
}

/// A single atomic mutation of the game state.
pub trait Command: Send {
    /// Value handed back to the caller once the command committed.
    type Output: Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Mutate `state`. Implementations must leave `state` untouched on error.
    fn apply(self, state: &mut GameState) -> Result<Self::Output, CommandError>;
}

/// Replace the draw pool with freshly loaded tracks, starting a new round.
pub struct LoadPool {
    /// Playlist the tracks come from.
    pub playlist_id: String,
    /// Tracks forming the new pool.
    pub tracks: Vec<Track>,
}

impl Command for LoadPool {
    type Output = usize;

    fn name(&self) -> &'static str {
        "load_pool"
    }

    fn apply(self, state: &mut GameState) -> Result<usize, CommandError> {
        let loaded = self.tracks.len();
        state.unplayed_tracks = self.tracks;
        state.played_tracks.clear();
        state.cards.clear();
        state.current_playlist = Some(self.playlist_id);
        state.num_tracks = loaded;
        Ok(loaded)
    }
}

/// Generate a new batch of cards from the unplayed pool, replacing all cards.
pub struct GenerateCards {
    /// Number of cards to create.
    pub count: usize,
}

impl Command for GenerateCards {
    type Output = IndexMap<CardId, Card>;

    fn name(&self) -> &'static str {
        "generate_cards"
    }

    fn apply(self, state: &mut GameState) -> Result<Self::Output, CommandError> {
        let cards = card_engine::generate(&state.unplayed_tracks, self.count, &mut rand::rng())?;
        state.cards = cards.clone();
        Ok(cards)
    }
}

/// Move one track from the unplayed pool to the play history.
pub struct DrawTrack {
    selector: Box<dyn TrackSelector>,
}

impl DrawTrack {
    /// Draw the track chosen by `selector`.
    pub fn new(selector: impl TrackSelector + 'static) -> Self {
        Self {
            selector: Box::new(selector),
        }
    }
}

impl Command for DrawTrack {
    type Output = Track;

    fn name(&self) -> &'static str {
        "draw_track"
    }

    fn apply(self, state: &mut GameState) -> Result<Track, CommandError> {
        if state.unplayed_tracks.is_empty() {
            return Err(CommandError::EmptyPool);
        }
        let index = self
            .selector
            .select(&state.unplayed_tracks)
            .filter(|index| *index < state.unplayed_tracks.len())
            .ok_or(CommandError::NoTrackSelected)?;

        let track = state.unplayed_tracks.remove(index);
        state.played_tracks.push(track.clone());
        Ok(track)
    }
}

/// Result of [`CheckCard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCheck {
    /// Fresh evaluation of the card.
    pub evaluation: Evaluation,
    /// Status stored before this check.
    pub previous: BingoStatus,
}

impl CardCheck {
    /// Whether this check is the first one to observe a win.
    pub fn is_new_bingo(&self) -> bool {
        self.evaluation.has_bingo && self.previous != BingoStatus::Bingo
    }
}

/// Recompute a card against the play history and record the result.
pub struct CheckCard {
    /// Card to evaluate.
    pub card_id: CardId,
}

impl Command for CheckCard {
    type Output = CardCheck;

    fn name(&self) -> &'static str {
        "check_card"
    }

    fn apply(self, state: &mut GameState) -> Result<CardCheck, CommandError> {
        let mode = state.bingo_mode;
        let card = state
            .cards
            .get_mut(&self.card_id)
            .ok_or_else(|| CommandError::UnknownCard(self.card_id.clone()))?;

        let evaluation = card_engine::evaluate(card, &state.played_tracks, mode);
        let previous = card.bingo_status;
        card.matches = evaluation.matches.clone();
        card.bingo_status = if evaluation.has_bingo {
            BingoStatus::Bingo
        } else {
            BingoStatus::NoBingo
        };

        Ok(CardCheck {
            evaluation,
            previous,
        })
    }
}

/// Switch the win rule.
pub struct SetBingoMode {
    /// New rule.
    pub mode: BingoMode,
}

impl Command for SetBingoMode {
    type Output = ();

    fn name(&self) -> &'static str {
        "set_bingo_mode"
    }

    fn apply(self, state: &mut GameState) -> Result<(), CommandError> {
        state.bingo_mode = self.mode;
        Ok(())
    }
}

/// Replace the whole state with a previously saved snapshot.
pub struct RestoreSnapshot {
    /// Snapshot to install.
    pub snapshot: GameState,
}

impl Command for RestoreSnapshot {
    type Output = ();

    fn name(&self) -> &'static str {
        "restore_snapshot"
    }

    fn apply(self, state: &mut GameState) -> Result<(), CommandError> {
        let mut snapshot = self.snapshot;
        snapshot.validate().map_err(CommandError::InvalidSnapshot)?;
        *state = snapshot;
        Ok(())
    }
}
