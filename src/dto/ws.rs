use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::game::CardId;

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
/// Messages accepted from real-time clients.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to room-scoped events.
    Join {
        /// Room name.
        room: String,
    },
    /// Unsubscribe from a room.
    Leave {
        /// Room name.
        room: String,
    },
    /// Ask for a full snapshot of the game.
    RequestGameState,
    /// Ask for the stored status of a card.
    CardValidated {
        /// Card concerned.
        card_id: CardId,
    },
    /// Evaluate a card against the play history.
    CheckBingo {
        /// Card concerned.
        card_id: CardId,
    },
    /// Draw a specific track and play it.
    PlayTrack {
        /// Track to draw from the pool.
        track_id: String,
    },
}

impl ClientMessage {
    /// Parse a text frame.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
