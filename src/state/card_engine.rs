//! Bingo card generation and win detection.
//!
//! Everything here is pure: no I/O, no locking. The state store calls into it
//! from inside its critical section.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use rand::{Rng, seq::index};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::game::{BingoMode, CARD_CELLS, Card, CardId, GRID_SIZE, Track};

const ROWS: [[u8; 5]; 5] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [15, 16, 17, 18, 19],
    [20, 21, 22, 23, 24],
];
const COLUMNS: [[u8; 5]; 5] = [
    [0, 5, 10, 15, 20],
    [1, 6, 11, 16, 21],
    [2, 7, 12, 17, 22],
    [3, 8, 13, 18, 23],
    [4, 9, 14, 19, 24],
];
const DIAGONALS: [[u8; 5]; 2] = [[0, 6, 12, 18, 24], [4, 8, 12, 16, 20]];

/// Failure to build a batch of cards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardEngineError {
    /// The pool holds fewer distinct tracks than a card needs.
    #[error("not enough tracks to generate cards: need {required}, have {available}")]
    InsufficientTracks {
        /// Tracks needed per card.
        required: usize,
        /// Tracks available in the pool.
        available: usize,
    },
}

/// Outcome of evaluating one card against the play history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Grid positions whose track was played.
    pub matches: BTreeSet<u8>,
    /// Whether a winning line is complete under the active mode.
    pub has_bingo: bool,
}

/// Dashboard label for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum CardSummary {
    /// No winning pattern yet.
    #[serde(rename = "no results")]
    NoResults,
    /// At least one full row.
    #[serde(rename = "row bingo")]
    RowBingo,
    /// At least one full column.
    #[serde(rename = "column bingo")]
    ColumnBingo,
    /// A full diagonal (only reported when diagonals count).
    #[serde(rename = "diagonal bingo")]
    DiagonalBingo,
    /// Every cell matched.
    #[serde(rename = "full card bingo")]
    FullCardBingo,
}

/// Generate `count` cards from `pool`.
///
/// Each card samples 25 distinct tracks without replacement; samples are
/// independent between cards so a track may appear on several cards.
/// Identifiers are 8 hex characters, unique within the batch.
pub fn generate<R>(
    pool: &[Track],
    count: usize,
    rng: &mut R,
) -> Result<IndexMap<CardId, Card>, CardEngineError>
where
    R: Rng + ?Sized,
{
    if pool.len() < CARD_CELLS {
        return Err(CardEngineError::InsufficientTracks {
            required: CARD_CELLS,
            available: pool.len(),
        });
    }

    let mut cards = IndexMap::with_capacity(count);
    for _ in 0..count {
        let card_id = loop {
            let candidate = format!("{:08x}", rng.random::<u32>());
            if !cards.contains_key(&candidate) {
                break candidate;
            }
        };

        let tracks = index::sample(rng, pool.len(), CARD_CELLS)
            .into_iter()
            .map(|i| pool[i].clone())
            .collect();
        cards.insert(card_id, Card::new(tracks));
    }

    Ok(cards)
}

/// Recompute the matches of `card` from scratch and decide whether it wins.
pub fn evaluate(card: &Card, played: &[Track], mode: BingoMode) -> Evaluation {
    let matches = matched_positions(card, played);
    let has_bingo = is_full_card(&matches)
        || any_line_complete(&ROWS, &matches)
        || any_line_complete(&COLUMNS, &matches)
        || (mode.includes_diagonals() && any_line_complete(&DIAGONALS, &matches));

    Evaluation { matches, has_bingo }
}

/// Classify every card for the dashboard.
///
/// Precedence when several patterns hold: full card, row, column, diagonal.
pub fn summarize(
    cards: &IndexMap<CardId, Card>,
    played: &[Track],
    mode: BingoMode,
) -> IndexMap<CardId, CardSummary> {
    cards
        .iter()
        .map(|(card_id, card)| {
            let matches = matched_positions(card, played);
            let summary = if is_full_card(&matches) {
                CardSummary::FullCardBingo
            } else if any_line_complete(&ROWS, &matches) {
                CardSummary::RowBingo
            } else if any_line_complete(&COLUMNS, &matches) {
                CardSummary::ColumnBingo
            } else if mode.includes_diagonals() && any_line_complete(&DIAGONALS, &matches) {
                CardSummary::DiagonalBingo
            } else {
                CardSummary::NoResults
            };
            (card_id.clone(), summary)
        })
        .collect()
}

/// Row and column of a grid position.
pub fn grid_coordinates(position: u8) -> (u8, u8) {
    (position / GRID_SIZE, position % GRID_SIZE)
}

fn matched_positions(card: &Card, played: &[Track]) -> BTreeSet<u8> {
    let played_ids: HashSet<&str> = played.iter().map(|t| t.id.as_str()).collect();
    card.tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| played_ids.contains(track.id.as_str()))
        .filter_map(|(position, _)| u8::try_from(position).ok())
        .collect()
}

fn is_full_card(matches: &BTreeSet<u8>) -> bool {
    matches.len() >= CARD_CELLS
}

fn any_line_complete(lines: &[[u8; 5]], matches: &BTreeSet<u8>) -> bool {
    lines
        .iter()
        .any(|line| line.iter().all(|position| matches.contains(position)))
}
