//! DTO definitions used by the card endpoints.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::{
    card_engine::Evaluation,
    game::{BingoStatus, Card, CardId, Track},
};

/// Upper bound on cards generated in one batch.
pub const MAX_CARDS_PER_BATCH: usize = 200;

/// Request to generate a new batch of cards.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GenerateCardsRequest {
    /// Number of cards to create.
    #[serde(default)]
    #[validate(range(min = 1, max = MAX_CARDS_PER_BATCH))]
    pub num_cards: usize,
}

/// A card as shown to the host.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CardDto {
    /// The 25 tracks, row by row.
    pub tracks: Vec<Track>,
    /// Matched grid positions as of the last check.
    pub matches: Vec<u8>,
    /// Outcome of the last check.
    pub bingo_status: BingoStatus,
}

impl From<&Card> for CardDto {
    fn from(card: &Card) -> Self {
        Self {
            tracks: card.tracks.clone(),
            matches: card.matches.iter().copied().collect(),
            bingo_status: card.bingo_status,
        }
    }
}

/// Map every card id to its card, in generation order.
pub fn cards_to_dto(cards: &IndexMap<CardId, Card>) -> IndexMap<CardId, CardDto> {
    cards
        .iter()
        .map(|(id, card)| (id.clone(), CardDto::from(card)))
        .collect()
}

/// Cards of the current round.
#[derive(Debug, Serialize, ToSchema)]
pub struct CardsResponse {
    /// Cards keyed by identifier.
    pub cards: IndexMap<CardId, CardDto>,
}

/// Outcome of a card generation.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateCardsResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The freshly generated cards.
    pub cards: IndexMap<CardId, CardDto>,
}

/// Result of checking one card.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckCardResponse {
    /// Card checked.
    pub card_id: CardId,
    /// Display label (`BINGO!`, `No bingo yet`).
    pub status: String,
    /// Matched grid positions.
    pub matches: Vec<u8>,
    /// Whether a winning line is complete.
    pub has_bingo: bool,
}

impl CheckCardResponse {
    /// Build the response from a fresh evaluation.
    pub fn new(card_id: CardId, evaluation: &Evaluation) -> Self {
        let status = if evaluation.has_bingo {
            BingoStatus::Bingo
        } else {
            BingoStatus::NoBingo
        };
        Self {
            card_id,
            status: status.to_string(),
            matches: evaluation.matches.iter().copied().collect(),
            has_bingo: evaluation.has_bingo,
        }
    }
}
