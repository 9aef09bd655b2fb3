use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::game::{BingoStatus, CardId, Track};

#[derive(Clone, Debug, Serialize, ToSchema)]
/// Envelope pushed to real-time clients, on WebSocket text frames and SSE.
pub struct ServerEvent {
    /// Event name (`new_track`, `bingo_winner`, ...).
    pub event: String,
    /// Event payload.
    pub data: Value,
}

impl ServerEvent {
    /// Serialise `payload` into an event named `event`.
    pub fn json<T>(event: &str, payload: &T) -> serde_json::Result<Self>
    where
        T: Serialize,
    {
        Ok(Self {
            event: event.to_string(),
            data: serde_json::to_value(payload)?,
        })
    }

    /// Full envelope as a JSON string, as sent on WebSocket frames.
    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Sent to a client right after its connection was accepted.
pub struct ConnectionStatusEvent {
    /// Always `connected`.
    pub status: String,
    /// Identifier assigned to the connection.
    pub client_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a track was drawn.
pub struct NewTrackEvent {
    /// Track now playing.
    pub track: Track,
    /// Tracks played so far in this round.
    pub total_played: usize,
    /// Tracks left in the pool.
    pub total_remaining: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast the first time a card is found to have a winning line.
pub struct BingoWinnerEvent {
    /// Winning card.
    pub card_id: CardId,
}

#[derive(Debug, Serialize, ToSchema)]
/// Stored check result of a card.
pub struct CardStatusEvent {
    /// Card concerned.
    pub card_id: CardId,
    /// Last recorded status.
    pub status: BingoStatus,
    /// Matched grid positions.
    pub matches: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Reply to a `check_bingo` message.
pub struct BingoResultEvent {
    /// Card concerned.
    pub card_id: CardId,
    /// Whether a winning line is complete.
    pub has_bingo: bool,
    /// Matched grid positions.
    pub matches: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Sent to room members when a client joins or leaves.
pub struct RoomEvent {
    /// Room name.
    pub room: String,
    /// Client that joined or left.
    pub client_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after a new batch of cards was generated.
pub struct CardsGeneratedEvent {
    /// Number of cards in the batch.
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after a playlist was loaded into the pool.
pub struct PoolLoadedEvent {
    /// Playlist the pool comes from.
    pub playlist_id: String,
    /// Tracks in the new pool.
    pub tracks_loaded: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the round was reset or replaced by a saved game.
pub struct RoundResetEvent {
    /// Human-readable reason.
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Sent to a single client whose message could not be handled.
pub struct ErrorEvent {
    /// Human-readable message.
    pub error: String,
}
