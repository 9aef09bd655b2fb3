use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::ClientMessage,
    services::{card_service, draw_sequencer, notification_service},
    state::{SharedState, selector::TrackById, send_event},
};

/// Handle the full lifecycle of a real-time client connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let client_id = Uuid::new_v4();
    state.hub().register(client_id, outbound_tx.clone());
    info!(%client_id, "real-time client connected");
    notification_service::send_connection_status(&state, client_id);

    let forwarder_task = spawn_broadcast_forwarder(&state, outbound_tx.clone());

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(%client_id, payload = %text, "received client message");
                handle_client_message(&state, client_id, text.as_str()).await;
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(%client_id, "client closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {
                notification_service::send_error(&state, client_id, "binary frames are not supported");
            }
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%client_id, error = %err, "websocket error");
                break;
            }
        }
    }

    for room in state.hub().disconnect(client_id) {
        notification_service::emit_room_left(&state, &room, client_id);
    }
    info!(%client_id, "real-time client disconnected");

    forwarder_task.abort();
    let _ = forwarder_task.await;
    finalize(writer_task, outbound_tx).await;
}

/// Dispatch one inbound text frame. Failures are reported to the sender only.
pub async fn handle_client_message(state: &SharedState, client_id: Uuid, text: &str) {
    let message = match ClientMessage::from_json_str(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(%client_id, error = %err, "failed to parse client message");
            notification_service::send_error(state, client_id, &format!("invalid message: {err}"));
            return;
        }
    };

    match message {
        ClientMessage::Join { room } => {
            let room = room.trim();
            if room.is_empty() {
                notification_service::send_error(state, client_id, "room name must not be empty");
                return;
            }
            state.hub().join(room, client_id);
            notification_service::emit_room_joined(state, room, client_id);
        }
        ClientMessage::Leave { room } => {
            let room = room.trim();
            notification_service::emit_room_left(state, room, client_id);
            state.hub().leave(room, client_id);
        }
        ClientMessage::RequestGameState => {
            let snapshot = state.store().snapshot().await;
            notification_service::send_game_state(state, client_id, &snapshot);
        }
        ClientMessage::CardValidated { card_id } => {
            match card_service::get_card(state, &card_id).await {
                Ok(card) => notification_service::send_card_status(state, client_id, &card_id, &card),
                Err(err) => notification_service::send_error(state, client_id, &err.to_string()),
            }
        }
        ClientMessage::CheckBingo { card_id } => {
            match card_service::check_card(state, &card_id).await {
                Ok(evaluation) => {
                    notification_service::send_bingo_result(state, client_id, &card_id, &evaluation)
                }
                Err(err) => notification_service::send_error(state, client_id, &err.to_string()),
            }
        }
        ClientMessage::PlayTrack { track_id } => {
            if let Err(err) = draw_sequencer::draw_and_play(state, TrackById(track_id)).await {
                warn!(%client_id, error = %err, "requested track could not be played");
                notification_service::send_error(state, client_id, &err.to_string());
            }
        }
    }
}

/// Forward global events into the client's outbound queue until it closes.
fn spawn_broadcast_forwarder(
    state: &SharedState,
    outbound_tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    let mut receiver = state.hub().subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = outbound_tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(event) => {
                            if !send_event(&outbound_tx, &event) {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "real-time client lagged behind broadcast");
                            continue;
                        }
                    }
                }
            }
        }
    })
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
