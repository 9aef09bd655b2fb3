use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod cards;
pub mod docs;
pub mod game;
pub mod health;
pub mod playback;
pub mod playlist;
pub mod sse;
pub mod websocket;

/// Compose all route trees and bind the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(websocket::router())
        .merge(auth::router())
        .merge(playlist::router())
        .merge(cards::router())
        .merge(playback::router(state.clone()))
        .merge(game::router());

    api_router.merge(docs::router()).with_state(state)
}
