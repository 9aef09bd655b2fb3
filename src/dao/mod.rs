/// Durable home of the game state document.
pub mod game_state_file;
/// Atomic whole-file JSON documents.
pub mod json_file;
/// External music service abstraction.
pub mod music;
/// Playlist registry persisted as a JSON array.
pub mod playlist_registry;
/// Saved game snapshots.
pub mod saved_games;
/// Spotify Web API client.
pub mod spotify;
/// Storage error types shared by the on-disk documents.
pub mod storage;
