//! DTO definitions used by the playlist endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::playlist_registry::PlaylistEntry,
    dto::validation::{validate_not_blank, validate_playlist_id},
};

/// Playlist remembered in the registry.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistDto {
    /// Music-service playlist identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owner display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Whether this playlist is preselected.
    pub is_default: bool,
}

impl From<PlaylistEntry> for PlaylistDto {
    fn from(entry: PlaylistEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            owner: entry.owner,
            is_default: entry.is_default,
        }
    }
}

/// Every playlist of the registry.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistsResponse {
    /// Registry entries in insertion order.
    pub playlists: Vec<PlaylistDto>,
}

/// Request to remember a playlist.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddPlaylistRequest {
    /// Raw id, `spotify:playlist:` URI or `open.spotify.com` link.
    #[serde(default)]
    #[validate(custom(function = "validate_playlist_id"))]
    pub id: String,
    /// Display name.
    #[serde(default)]
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    /// Owner display name.
    #[serde(default)]
    pub owner: Option<String>,
    /// Make this the only default playlist.
    #[serde(default)]
    pub is_default: bool,
}

/// Request to preselect a playlist.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetDefaultPlaylistRequest {
    /// Registry entry to preselect.
    #[serde(default)]
    #[validate(custom(function = "validate_playlist_id"))]
    pub playlist_id: String,
}

/// Request to load a playlist into the draw pool.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct LoadPlaylistRequest {
    /// Playlist to load; the registry default is used when omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_playlist_id"))]
    pub playlist_id: Option<String>,
}

/// Outcome of loading a playlist.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoadPlaylistResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Tracks placed in the pool.
    pub tracks_loaded: usize,
    /// Playable tracks found in the playlist.
    pub tracks_available: usize,
}
