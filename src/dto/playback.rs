//! DTO definitions used by the playback endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::music::Device,
    dto::validation::validate_not_blank,
    state::game::Track,
};

/// Outcome of a draw.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Track drawn and now playing.
    pub track: Track,
    /// Name of the device playing it.
    pub device: String,
}

/// Play history of the current round.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayedTracksResponse {
    /// Tracks in the order they were drawn.
    pub played_tracks: Vec<Track>,
    /// Number of tracks played.
    pub total_played: usize,
    /// Number of tracks left in the pool.
    pub total_remaining: usize,
}

/// Playback target of the music service.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceDto {
    /// Device identifier.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Device category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether it currently holds the playback session.
    pub is_active: bool,
    /// Current volume, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_percent: Option<u8>,
}

impl From<Device> for DeviceDto {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            name: device.name,
            kind: device.kind,
            is_active: device.is_active,
            volume_percent: device.volume_percent,
        }
    }
}

/// Devices available to the logged-in account.
#[derive(Debug, Serialize, ToSchema)]
pub struct DevicesResponse {
    /// Every addressable device.
    pub devices: Vec<DeviceDto>,
}

/// Request to move playback to another device.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SelectDeviceRequest {
    /// Target device identifier.
    #[validate(custom(function = "validate_not_blank"))]
    pub device_id: String,
}
