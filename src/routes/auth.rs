use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use validator::Validate;

use crate::{
    dto::{
        auth::{AuthStatusResponse, SessionTokenRequest},
        common::MessageResponse,
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Music service session endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/token", put(install_token).delete(logout))
        .route("/auth/status", get(status))
}

/// Install the access token the host obtained from the music service.
#[utoipa::path(
    put,
    path = "/auth/token",
    tag = "auth",
    request_body = SessionTokenRequest,
    responses(
        (status = 200, description = "Session installed", body = MessageResponse),
        (status = 400, description = "Empty token")
    )
)]
pub async fn install_token(
    State(state): State<SharedState>,
    Json(payload): Json<SessionTokenRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    auth_service::install_token(&state, &payload.access_token).await;
    Ok(Json(MessageResponse::new("music service session installed")))
}

/// Forget the current session.
#[utoipa::path(
    delete,
    path = "/auth/token",
    tag = "auth",
    responses((status = 200, description = "Session cleared", body = MessageResponse))
)]
pub async fn logout(State(state): State<SharedState>) -> Json<MessageResponse> {
    auth_service::logout(&state).await;
    Json(MessageResponse::new("logged out"))
}

/// Whether a session is installed.
#[utoipa::path(
    get,
    path = "/auth/status",
    tag = "auth",
    responses((status = 200, description = "Session state", body = AuthStatusResponse))
)]
pub async fn status(State(state): State<SharedState>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        authenticated: auth_service::is_authenticated(&state).await,
    })
}
