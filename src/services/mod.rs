/// Music service session management.
pub mod auth_service;
/// Printable card document rendering.
pub mod card_document;
/// Card generation and checking.
pub mod card_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Draw-then-play sequencing.
pub mod draw_sequencer;
/// Round lifecycle, saved games and dashboard.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Real-time event construction and delivery.
pub mod notification_service;
/// Pause, devices and play history.
pub mod playback_service;
/// Playlist registry and pool loading.
pub mod playlist_service;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
