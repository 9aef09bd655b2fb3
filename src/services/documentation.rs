use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the music bingo backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::events_stream,
        crate::routes::websocket::ws_handler,
        crate::routes::auth::install_token,
        crate::routes::auth::logout,
        crate::routes::auth::status,
        crate::routes::playlist::get_playlists,
        crate::routes::playlist::add_playlist,
        crate::routes::playlist::set_default_playlist,
        crate::routes::playlist::remove_playlist,
        crate::routes::playlist::load_playlist,
        crate::routes::cards::generate_cards,
        crate::routes::cards::get_cards,
        crate::routes::cards::check_card,
        crate::routes::cards::download_cards_pdf,
        crate::routes::playback::play,
        crate::routes::playback::pause,
        crate::routes::playback::played_tracks,
        crate::routes::playback::get_devices,
        crate::routes::playback::select_device,
        crate::routes::game::new_round,
        crate::routes::game::set_bingo_mode,
        crate::routes::game::save_game,
        crate::routes::game::list_saved_games,
        crate::routes::game::load_game,
        crate::routes::game::game_state,
        crate::routes::game::dashboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::MessageResponse,
            crate::dto::auth::SessionTokenRequest,
            crate::dto::auth::AuthStatusResponse,
            crate::dto::playlist::PlaylistDto,
            crate::dto::playlist::PlaylistsResponse,
            crate::dto::playlist::AddPlaylistRequest,
            crate::dto::playlist::SetDefaultPlaylistRequest,
            crate::dto::playlist::LoadPlaylistRequest,
            crate::dto::playlist::LoadPlaylistResponse,
            crate::dto::cards::GenerateCardsRequest,
            crate::dto::cards::GenerateCardsResponse,
            crate::dto::cards::CardDto,
            crate::dto::cards::CardsResponse,
            crate::dto::cards::CheckCardResponse,
            crate::dto::playback::PlayResponse,
            crate::dto::playback::PlayedTracksResponse,
            crate::dto::playback::DeviceDto,
            crate::dto::playback::DevicesResponse,
            crate::dto::playback::SelectDeviceRequest,
            crate::dto::game::BingoModeRequest,
            crate::dto::game::BingoModeResponse,
            crate::dto::game::SaveGameRequest,
            crate::dto::game::SaveGameResponse,
            crate::dto::game::SavedGameDto,
            crate::dto::game::SavedGamesResponse,
            crate::dto::game::DashboardResponse,
            crate::dto::ws::ClientMessage,
            crate::dto::events::ServerEvent,
            crate::state::game::GameState,
            crate::state::game::Card,
            crate::state::game::Track,
            crate::state::game::BingoMode,
            crate::state::game::BingoStatus,
            crate::state::card_engine::CardSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Music service session"),
        (name = "playlists", description = "Playlist registry and pool loading"),
        (name = "cards", description = "Card generation, checking and printing"),
        (name = "playback", description = "Drawing tracks and controlling playback"),
        (name = "game", description = "Round lifecycle, saved games and dashboard"),
        (name = "realtime", description = "WebSocket and server-sent event channels"),
    )
)]
pub struct ApiDoc;
