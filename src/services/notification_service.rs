use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::events::{
        BingoResultEvent, BingoWinnerEvent, CardStatusEvent, CardsGeneratedEvent,
        ConnectionStatusEvent, ErrorEvent, NewTrackEvent, PoolLoadedEvent, RoomEvent,
        RoundResetEvent, ServerEvent,
    },
    state::{
        SharedState,
        card_engine::Evaluation,
        game::{Card, CardId, GameState, Track},
    },
};

const EVENT_CONNECTION_STATUS: &str = "connection_status";
const EVENT_GAME_STATE: &str = "game_state";
const EVENT_NEW_TRACK: &str = "new_track";
const EVENT_BINGO_WINNER: &str = "bingo_winner";
const EVENT_CARD_STATUS_UPDATE: &str = "card_status_update";
const EVENT_BINGO_RESULT: &str = "bingo_result";
const EVENT_ROOM_JOINED: &str = "room_joined";
const EVENT_ROOM_LEFT: &str = "room_left";
const EVENT_ROUND_RESET: &str = "round_reset";
const EVENT_CARDS_GENERATED: &str = "cards_generated";
const EVENT_POOL_LOADED: &str = "pool_loaded";
const EVENT_ERROR: &str = "error";

/// Broadcast the track that was just drawn.
pub fn broadcast_new_track(state: &SharedState, track: &Track, snapshot: &GameState) {
    let payload = NewTrackEvent {
        track: track.clone(),
        total_played: snapshot.played_tracks.len(),
        total_remaining: snapshot.remaining(),
    };
    broadcast(state, EVENT_NEW_TRACK, &payload);
}

/// Broadcast that `card_id` has a winning line.
pub fn broadcast_bingo_winner(state: &SharedState, card_id: &CardId) {
    let payload = BingoWinnerEvent {
        card_id: card_id.clone(),
    };
    broadcast(state, EVENT_BINGO_WINNER, &payload);
}

/// Broadcast the stored status of a card after it was checked.
pub fn broadcast_card_status(state: &SharedState, card_id: &CardId, card: &Card) {
    broadcast(state, EVENT_CARD_STATUS_UPDATE, &card_status(card_id, card));
}

/// Broadcast that a new batch of cards replaced the previous one.
pub fn broadcast_cards_generated(state: &SharedState, count: usize) {
    broadcast(state, EVENT_CARDS_GENERATED, &CardsGeneratedEvent { count });
}

/// Broadcast that a playlist was loaded into the pool.
pub fn broadcast_pool_loaded(state: &SharedState, playlist_id: &str, tracks_loaded: usize) {
    let payload = PoolLoadedEvent {
        playlist_id: playlist_id.to_string(),
        tracks_loaded,
    };
    broadcast(state, EVENT_POOL_LOADED, &payload);
}

/// Broadcast that the round was reset or replaced.
pub fn broadcast_round_reset(state: &SharedState, message: &str) {
    let payload = RoundResetEvent {
        message: message.to_string(),
    };
    broadcast(state, EVENT_ROUND_RESET, &payload);
}

/// Greet a freshly connected client.
pub fn send_connection_status(state: &SharedState, client_id: Uuid) {
    let payload = ConnectionStatusEvent {
        status: "connected".into(),
        client_id,
    };
    send_to_client(state, client_id, EVENT_CONNECTION_STATUS, &payload);
}

/// Send a full snapshot of the game to one client.
pub fn send_game_state(state: &SharedState, client_id: Uuid, snapshot: &GameState) {
    send_to_client(state, client_id, EVENT_GAME_STATE, snapshot);
}

/// Send the stored status of a card to one client.
pub fn send_card_status(state: &SharedState, client_id: Uuid, card_id: &CardId, card: &Card) {
    send_to_client(
        state,
        client_id,
        EVENT_CARD_STATUS_UPDATE,
        &card_status(card_id, card),
    );
}

/// Send the result of a `check_bingo` request to one client.
pub fn send_bingo_result(
    state: &SharedState,
    client_id: Uuid,
    card_id: &CardId,
    evaluation: &Evaluation,
) {
    let payload = BingoResultEvent {
        card_id: card_id.clone(),
        has_bingo: evaluation.has_bingo,
        matches: evaluation.matches.iter().copied().collect(),
    };
    send_to_client(state, client_id, EVENT_BINGO_RESULT, &payload);
}

/// Report a failed request to the client that sent it.
pub fn send_error(state: &SharedState, client_id: Uuid, message: &str) {
    let payload = ErrorEvent {
        error: message.to_string(),
    };
    send_to_client(state, client_id, EVENT_ERROR, &payload);
}

/// Tell the members of `room` that `client_id` joined it.
pub fn emit_room_joined(state: &SharedState, room: &str, client_id: Uuid) {
    emit_room_event(state, room, EVENT_ROOM_JOINED, client_id);
}

/// Tell the current members of `room` that `client_id` left it.
pub fn emit_room_left(state: &SharedState, room: &str, client_id: Uuid) {
    emit_room_event(state, room, EVENT_ROOM_LEFT, client_id);
}

fn emit_room_event(state: &SharedState, room: &str, name: &str, client_id: Uuid) {
    let payload = RoomEvent {
        room: room.to_string(),
        client_id,
    };
    if let Some(event) = build(name, &payload) {
        state.hub().emit_to_room(room, &event);
    }
}

fn card_status(card_id: &CardId, card: &Card) -> CardStatusEvent {
    CardStatusEvent {
        card_id: card_id.clone(),
        status: card.bingo_status,
        matches: card.matches.iter().copied().collect(),
    }
}

fn broadcast<T>(state: &SharedState, name: &str, payload: &T)
where
    T: Serialize,
{
    if let Some(event) = build(name, payload) {
        state.hub().broadcast(event);
    }
}

fn send_to_client<T>(state: &SharedState, client_id: Uuid, name: &str, payload: &T)
where
    T: Serialize,
{
    if let Some(event) = build(name, payload) {
        state.hub().send_to(client_id, &event);
    }
}

fn build<T>(name: &str, payload: &T) -> Option<ServerEvent>
where
    T: Serialize,
{
    match ServerEvent::json(name, payload) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(event = name, error = %err, "failed to serialize event payload");
            None
        }
    }
}
