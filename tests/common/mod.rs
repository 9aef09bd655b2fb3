#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use futures::future::BoxFuture;
use music_bingo_back::{
    config::AppConfig,
    dao::music::{Device, MusicResult, MusicService, MusicServiceError},
    routes,
    state::{AppState, SharedState, game::Track},
};
use serde_json::Value;
use tower::ServiceExt;

pub const PLAYLIST_ID: &str = "37i9dQZF1DXcBWIGoYBM5M";
pub const TOKEN: &str = "test-token";

pub fn track(n: usize) -> Track {
    Track {
        id: format!("track{n:03}"),
        name: format!("Song {n}"),
        artist: format!("Artist {n}"),
    }
}

pub fn tracks(count: usize) -> Vec<Track> {
    (0..count).map(track).collect()
}

pub fn speaker(active: bool) -> Device {
    Device {
        id: "device-1".into(),
        name: "Living Room".into(),
        kind: "Speaker".into(),
        is_active: active,
        volume_percent: Some(40),
    }
}

/// Scripted music service recording every playback request.
#[derive(Default)]
pub struct FakeMusic {
    playlists: HashMap<String, Vec<Track>>,
    devices: Vec<Device>,
    fail_playback: bool,
    started: Mutex<Vec<String>>,
    paused: Mutex<usize>,
}

impl FakeMusic {
    pub fn new() -> Self {
        Self {
            devices: vec![speaker(true)],
            ..Self::default()
        }
    }

    pub fn with_playlist(mut self, id: &str, tracks: Vec<Track>) -> Self {
        self.playlists.insert(id.to_string(), tracks);
        self
    }

    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    pub fn failing_playback(mut self) -> Self {
        self.fail_playback = true;
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn pauses(&self) -> usize {
        *self.paused.lock().unwrap()
    }
}

impl MusicService for FakeMusic {
    fn playlist_tracks(
        &self,
        _token: &str,
        playlist_id: &str,
    ) -> BoxFuture<'static, MusicResult<Vec<Track>>> {
        let result = self
            .playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| MusicServiceError::NotFound {
                path: format!("playlists/{playlist_id}/tracks"),
            });
        Box::pin(async move { result })
    }

    fn devices(&self, _token: &str) -> BoxFuture<'static, MusicResult<Vec<Device>>> {
        let devices = self.devices.clone();
        Box::pin(async move { Ok(devices) })
    }

    fn start_playback(
        &self,
        _token: &str,
        _device_id: &str,
        track_id: &str,
    ) -> BoxFuture<'static, MusicResult<()>> {
        let result = if self.fail_playback {
            Err(MusicServiceError::Timeout {
                path: "me/player/play".into(),
            })
        } else {
            self.started.lock().unwrap().push(track_id.to_string());
            Ok(())
        };
        Box::pin(async move { result })
    }

    fn pause_playback(&self, _token: &str) -> BoxFuture<'static, MusicResult<()>> {
        *self.paused.lock().unwrap() += 1;
        Box::pin(async { Ok(()) })
    }

    fn transfer_playback(
        &self,
        _token: &str,
        device_id: &str,
    ) -> BoxFuture<'static, MusicResult<()>> {
        let known = self.devices.iter().any(|device| device.id == device_id);
        let path = format!("me/player?device_id={device_id}");
        Box::pin(async move {
            if known {
                Ok(())
            } else {
                Err(MusicServiceError::NotFound { path })
            }
        })
    }
}

pub async fn app_state(dir: &Path, music: Arc<FakeMusic>, token: Option<&str>) -> SharedState {
    AppState::initialise(
        AppConfig::with_data_dir(dir),
        music,
        token.map(str::to_string),
    )
    .await
    .unwrap()
}

pub fn app(state: SharedState) -> Router {
    routes::router(state)
}

pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = call_raw(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn call_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}
