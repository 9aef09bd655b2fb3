use indexmap::IndexMap;
use tracing::info;

use crate::{
    error::ServiceError,
    services::{card_document, notification_service},
    state::{
        SharedState,
        card_engine::Evaluation,
        commands::{CheckCard, GenerateCards},
        game::{Card, CardId},
    },
};

/// Replace every card of the round with `count` fresh ones.
pub async fn generate_cards(
    state: &SharedState,
    count: usize,
) -> Result<IndexMap<CardId, Card>, ServiceError> {
    let (cards, snapshot) = state.store().apply(GenerateCards { count }).await?;
    info!(
        count = cards.len(),
        pool = snapshot.unplayed_tracks.len(),
        "cards generated"
    );
    notification_service::broadcast_cards_generated(state, cards.len());
    Ok(cards)
}

/// Cards of the current round.
pub async fn get_cards(state: &SharedState) -> IndexMap<CardId, Card> {
    state.store().read(|game| game.cards.clone()).await
}

/// Stored state of one card, without re-evaluating it.
pub async fn get_card(state: &SharedState, card_id: &str) -> Result<Card, ServiceError> {
    state
        .store()
        .read(|game| game.cards.get(card_id).cloned())
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("card `{card_id}` not found")))
}

/// Evaluate a card against the play history, record the result and announce
/// the first win of that card.
pub async fn check_card(state: &SharedState, card_id: &str) -> Result<Evaluation, ServiceError> {
    let card_id: CardId = card_id.to_string();
    let (check, snapshot) = state
        .store()
        .apply(CheckCard {
            card_id: card_id.clone(),
        })
        .await?;

    if let Some(card) = snapshot.cards.get(&card_id) {
        notification_service::broadcast_card_status(state, &card_id, card);
    }
    if check.is_new_bingo() {
        info!(%card_id, "bingo");
        notification_service::broadcast_bingo_winner(state, &card_id);
    }

    Ok(check.evaluation)
}

/// Render every card of the round as a printable document.
pub async fn cards_document(state: &SharedState) -> Result<Vec<u8>, ServiceError> {
    let cards = get_cards(state).await;
    if cards.is_empty() {
        return Err(ServiceError::NotFound(
            "no cards generated yet; generate cards first".into(),
        ));
    }
    Ok(card_document::render(&cards))
}
