use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::cards::{
        CardsResponse, CheckCardResponse, GenerateCardsRequest, GenerateCardsResponse,
        cards_to_dto,
    },
    error::AppError,
    services::card_service,
    state::SharedState,
};

const DOCUMENT_FILENAME: &str = "bingo_cards.pdf";

/// Card generation, checking and printing endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/generate_cards", post(generate_cards))
        .route("/api/get_cards", get(get_cards))
        .route("/api/check_card/{card_id}", get(check_card))
        .route("/api/download_cards_pdf", get(download_cards_pdf))
}

/// Replace the cards of the round with a fresh batch drawn from the pool.
#[utoipa::path(
    post,
    path = "/api/generate_cards",
    tag = "cards",
    request_body = GenerateCardsRequest,
    responses(
        (status = 200, description = "Cards generated", body = GenerateCardsResponse),
        (status = 400, description = "Invalid count or not enough tracks in the pool")
    )
)]
pub async fn generate_cards(
    State(state): State<SharedState>,
    Json(payload): Json<GenerateCardsRequest>,
) -> Result<Json<GenerateCardsResponse>, AppError> {
    payload.validate()?;
    let cards = card_service::generate_cards(&state, payload.num_cards).await?;
    Ok(Json(GenerateCardsResponse {
        message: format!("generated {} cards", cards.len()),
        cards: cards_to_dto(&cards),
    }))
}

/// Cards of the current round.
#[utoipa::path(
    get,
    path = "/api/get_cards",
    tag = "cards",
    responses((status = 200, description = "Current cards", body = CardsResponse))
)]
pub async fn get_cards(State(state): State<SharedState>) -> Json<CardsResponse> {
    let cards = card_service::get_cards(&state).await;
    Json(CardsResponse {
        cards: cards_to_dto(&cards),
    })
}

/// Evaluate a card against the tracks played so far.
#[utoipa::path(
    get,
    path = "/api/check_card/{card_id}",
    tag = "cards",
    params(("card_id" = String, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Card evaluated", body = CheckCardResponse),
        (status = 404, description = "Unknown card")
    )
)]
pub async fn check_card(
    State(state): State<SharedState>,
    Path(card_id): Path<String>,
) -> Result<Json<CheckCardResponse>, AppError> {
    let evaluation = card_service::check_card(&state, &card_id).await?;
    Ok(Json(CheckCardResponse::new(card_id, &evaluation)))
}

/// Download every card as a printable PDF, one page per card.
#[utoipa::path(
    get,
    path = "/api/download_cards_pdf",
    tag = "cards",
    responses(
        (status = 200, description = "Printable cards", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "No cards generated yet")
    )
)]
pub async fn download_cards_pdf(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let document = card_service::cards_document(&state).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOCUMENT_FILENAME}\""),
            ),
        ],
        document,
    ))
}
