use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{
        common::MessageResponse,
        game::{
            BingoModeRequest, BingoModeResponse, DashboardResponse, SaveGameRequest,
            SaveGameResponse, SavedGameDto, SavedGamesResponse,
        },
    },
    error::AppError,
    services::game_service,
    state::{SharedState, game::GameState},
};

/// Round lifecycle, saved games and dashboard endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/new_round", post(new_round))
        .route("/api/bingo_mode", post(set_bingo_mode))
        .route("/api/save_game", post(save_game))
        .route("/api/list_saved_games", get(list_saved_games))
        .route("/api/load_game/{filename}", post(load_game))
        .route("/api/game_state", get(game_state))
        .route("/api/dashboard", get(dashboard))
}

/// Reset the pool, history and cards.
#[utoipa::path(
    post,
    path = "/api/new_round",
    tag = "game",
    responses((status = 200, description = "Round reset", body = MessageResponse))
)]
pub async fn new_round(State(state): State<SharedState>) -> Result<Json<MessageResponse>, AppError> {
    game_service::new_round(&state).await?;
    Ok(Json(MessageResponse::new("new round started")))
}

/// Change the win rule.
#[utoipa::path(
    post,
    path = "/api/bingo_mode",
    tag = "game",
    request_body = BingoModeRequest,
    responses(
        (status = 200, description = "Rule changed", body = BingoModeResponse),
        (status = 400, description = "Unknown rule")
    )
)]
pub async fn set_bingo_mode(
    State(state): State<SharedState>,
    Json(payload): Json<BingoModeRequest>,
) -> Result<Json<BingoModeResponse>, AppError> {
    let bingo_mode = game_service::set_bingo_mode(&state, payload.bingo_mode).await?;
    Ok(Json(BingoModeResponse {
        message: "bingo mode updated".into(),
        bingo_mode,
    }))
}

/// Snapshot the current game to disk.
#[utoipa::path(
    post,
    path = "/api/save_game",
    tag = "game",
    request_body = SaveGameRequest,
    responses(
        (status = 200, description = "Game saved", body = SaveGameResponse),
        (status = 400, description = "Missing name")
    )
)]
pub async fn save_game(
    State(state): State<SharedState>,
    Json(payload): Json<SaveGameRequest>,
) -> Result<Json<SaveGameResponse>, AppError> {
    payload.validate()?;
    let filename =
        game_service::save_game(&state, &payload.name, payload.description.as_deref()).await?;
    Ok(Json(SaveGameResponse {
        message: format!("game `{}` saved", payload.name.trim()),
        filename,
    }))
}

/// Saved games, newest first.
#[utoipa::path(
    get,
    path = "/api/list_saved_games",
    tag = "game",
    responses((status = 200, description = "Saved games", body = SavedGamesResponse))
)]
pub async fn list_saved_games(
    State(state): State<SharedState>,
) -> Result<Json<SavedGamesResponse>, AppError> {
    let saved_games = game_service::list_saved_games(&state)
        .await?
        .into_iter()
        .map(SavedGameDto::from)
        .collect();
    Ok(Json(SavedGamesResponse { saved_games }))
}

/// Restore a saved game.
#[utoipa::path(
    post,
    path = "/api/load_game/{filename}",
    tag = "game",
    params(("filename" = String, Path, description = "File name returned by save_game")),
    responses(
        (status = 200, description = "Game restored", body = MessageResponse),
        (status = 400, description = "Malformed file name or invalid snapshot"),
        (status = 404, description = "Unknown saved game")
    )
)]
pub async fn load_game(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    game_service::load_game(&state, &filename).await?;
    Ok(Json(MessageResponse::new(format!(
        "game `{filename}` loaded"
    ))))
}

/// Full snapshot of the live game.
#[utoipa::path(
    get,
    path = "/api/game_state",
    tag = "game",
    responses((status = 200, description = "Current game", body = GameState))
)]
pub async fn game_state(State(state): State<SharedState>) -> Json<GameState> {
    Json(game_service::game_state(&state).await)
}

/// Counters and the pattern reached by each card.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "game",
    responses((status = 200, description = "Dashboard overview", body = DashboardResponse))
)]
pub async fn dashboard(State(state): State<SharedState>) -> Json<DashboardResponse> {
    Json(game_service::dashboard(&state).await)
}
