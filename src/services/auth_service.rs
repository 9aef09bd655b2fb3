use crate::state::SharedState;

/// Install the music service access token obtained by the host.
pub async fn install_token(state: &SharedState, token: &str) {
    state.set_music_session(token.trim().to_string()).await;
}

/// Drop the current music service session.
pub async fn logout(state: &SharedState) {
    state.clear_music_session().await;
}

/// Whether the host is logged in to the music service.
pub async fn is_authenticated(state: &SharedState) -> bool {
    state.has_music_session().await
}
