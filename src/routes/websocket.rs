use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
};

use crate::{services::websocket_service, state::SharedState};

const MAX_CLIENT_MESSAGE_BYTES: usize = 16 * 1024;

/// Real-time channel for player and host screens.
pub fn router() -> Router<SharedState> {
    Router::new().route("/ws", get(ws_handler))
}

/// Upgrade to a WebSocket carrying game events and client requests.
#[utoipa::path(
    get,
    path = "/ws",
    tag = "realtime",
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
pub async fn ws_handler(State(state): State<SharedState>, ws: WebSocketUpgrade) -> Response {
    ws.max_message_size(MAX_CLIENT_MESSAGE_BYTES)
        .on_upgrade(move |socket| websocket_service::handle_socket(state, socket))
}
