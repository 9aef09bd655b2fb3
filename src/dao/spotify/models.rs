use serde::{Deserialize, Serialize};

use crate::{dao::music::Device, state::game::Track};

#[derive(Debug, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<DeviceObject>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceObject {
    pub id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub volume_percent: Option<u8>,
}

impl DeviceObject {
    /// Restricted devices come without an id and cannot be addressed.
    pub fn into_device(self) -> Option<Device> {
        Some(Device {
            id: self.id?,
            name: self.name,
            kind: self.kind,
            is_active: self.is_active,
            volume_percent: self.volume_percent,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemsPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Deserialize)]
pub struct ArtistObject {
    pub name: String,
}

impl TrackObject {
    /// Local files have no catalogue id and cannot be played remotely.
    pub fn into_track(self) -> Option<Track> {
        if self.is_local {
            return None;
        }
        Some(Track {
            id: self.id?,
            name: self.name,
            artist: self
                .artists
                .into_iter()
                .map(|artist| artist.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StartPlaybackBody {
    pub uris: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TransferPlaybackBody {
    pub device_ids: Vec<String>,
    pub play: bool,
}

/// URI addressing a catalogue track.
pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}
