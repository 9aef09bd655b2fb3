use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header::CONTENT_LENGTH};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    dao::music::{Device, MusicResult, MusicService, MusicServiceError},
    state::game::Track,
};

use super::{
    config::SpotifyConfig,
    models::{
        DeviceObject, DevicesResponse, PlaylistItemsPage, StartPlaybackBody, TrackObject,
        TransferPlaybackBody, track_uri,
    },
};

const PAGE_LIMIT: &str = "100";

/// [`MusicService`] backed by the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    base_url: Arc<str>,
}

impl SpotifyClient {
    /// Build a client honouring the configured request timeout.
    pub fn new(config: &SpotifyConfig) -> MusicResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| MusicServiceError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.api_base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url).bearer_auth(token)
    }

    async fn send(builder: RequestBuilder, path: &str) -> MusicResult<Response> {
        let response = builder.send().await.map_err(|source| {
            if source.is_timeout() {
                MusicServiceError::Timeout {
                    path: path.to_string(),
                }
            } else {
                MusicServiceError::RequestSend {
                    path: path.to_string(),
                    source,
                }
            }
        })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(MusicServiceError::Unauthorized),
            StatusCode::NOT_FOUND => Err(MusicServiceError::NotFound {
                path: path.to_string(),
            }),
            other => Err(MusicServiceError::RequestStatus {
                path: path.to_string(),
                status: other,
            }),
        }
    }

    async fn decode<T>(response: Response, path: &str) -> MusicResult<T>
    where
        T: DeserializeOwned,
    {
        response.json::<T>().await.map_err(|source| {
            if source.is_timeout() {
                MusicServiceError::Timeout {
                    path: path.to_string(),
                }
            } else {
                MusicServiceError::DecodeResponse {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }

    async fn fetch_playlist(&self, token: &str, playlist_id: &str) -> MusicResult<Vec<Track>> {
        let path = format!("playlists/{playlist_id}/tracks");
        let first = self
            .request(Method::GET, &path, token)
            .query(&[("limit", PAGE_LIMIT)]);
        let mut page: PlaylistItemsPage =
            Self::decode(Self::send(first, &path).await?, &path).await?;

        let mut tracks = Vec::new();
        loop {
            tracks.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track.and_then(TrackObject::into_track)),
            );
            let Some(next) = page.next else {
                break;
            };
            debug!(playlist_id, fetched = tracks.len(), "fetching next playlist page");
            let builder = self.client.get(&next).bearer_auth(token);
            page = Self::decode(Self::send(builder, &path).await?, &path).await?;
        }

        Ok(tracks)
    }

    async fn fetch_devices(&self, token: &str) -> MusicResult<Vec<Device>> {
        const PATH: &str = "me/player/devices";
        let response = Self::send(self.request(Method::GET, PATH, token), PATH).await?;
        let payload: DevicesResponse = Self::decode(response, PATH).await?;
        Ok(payload
            .devices
            .into_iter()
            .filter_map(DeviceObject::into_device)
            .collect())
    }

    async fn play(&self, token: &str, device_id: &str, track_id: &str) -> MusicResult<()> {
        const PATH: &str = "me/player/play";
        let builder = self
            .request(Method::PUT, PATH, token)
            .query(&[("device_id", device_id)])
            .json(&StartPlaybackBody {
                uris: vec![track_uri(track_id)],
            });
        Self::send(builder, PATH).await.map(drop)
    }

    async fn pause(&self, token: &str) -> MusicResult<()> {
        const PATH: &str = "me/player/pause";
        let builder = self
            .request(Method::PUT, PATH, token)
            .header(CONTENT_LENGTH, "0");
        Self::send(builder, PATH).await.map(drop)
    }

    async fn transfer(&self, token: &str, device_id: &str) -> MusicResult<()> {
        const PATH: &str = "me/player";
        let builder = self
            .request(Method::PUT, PATH, token)
            .json(&TransferPlaybackBody {
                device_ids: vec![device_id.to_string()],
                play: false,
            });
        Self::send(builder, PATH).await.map(drop)
    }
}

impl MusicService for SpotifyClient {
    fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> BoxFuture<'static, MusicResult<Vec<Track>>> {
        let client = self.clone();
        let token = token.to_string();
        let playlist_id = playlist_id.to_string();
        Box::pin(async move { client.fetch_playlist(&token, &playlist_id).await })
    }

    fn devices(&self, token: &str) -> BoxFuture<'static, MusicResult<Vec<Device>>> {
        let client = self.clone();
        let token = token.to_string();
        Box::pin(async move { client.fetch_devices(&token).await })
    }

    fn start_playback(
        &self,
        token: &str,
        device_id: &str,
        track_id: &str,
    ) -> BoxFuture<'static, MusicResult<()>> {
        let client = self.clone();
        let token = token.to_string();
        let device_id = device_id.to_string();
        let track_id = track_id.to_string();
        Box::pin(async move { client.play(&token, &device_id, &track_id).await })
    }

    fn pause_playback(&self, token: &str) -> BoxFuture<'static, MusicResult<()>> {
        let client = self.clone();
        let token = token.to_string();
        Box::pin(async move { client.pause(&token).await })
    }

    fn transfer_playback(
        &self,
        token: &str,
        device_id: &str,
    ) -> BoxFuture<'static, MusicResult<()>> {
        let client = self.clone();
        let token = token.to_string();
        let device_id = device_id.to_string();
        Box::pin(async move { client.transfer(&token, &device_id).await })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode as ServerStatus, header::AUTHORIZATION},
        response::{IntoResponse, Response as ServerResponse},
        routing::{get, put},
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;

    const TOKEN: &str = "session-token";

    async fn playlist_page(
        State(base): State<String>,
        Path(id): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> ServerResponse {
        let authorized = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == format!("Bearer {TOKEN}"));
        if !authorized {
            return ServerStatus::UNAUTHORIZED.into_response();
        }

        match (id.as_str(), query.get("offset").map(String::as_str)) {
            ("mixed", None) => Json(json!({
                "items": [
                    {"track": {"id": "t1", "name": "One", "artists": [{"name": "A"}, {"name": "B"}]}},
                    {"track": null},
                    {"track": {"id": null, "name": "Home recording", "is_local": true}},
                    {"track": {"id": "t2", "name": "Two", "artists": [{"name": "C"}]}}
                ],
                "next": format!("{base}/playlists/mixed/tracks?offset=100&limit=100")
            }))
            .into_response(),
            ("mixed", Some("100")) => Json(json!({
                "items": [{"track": {"id": "t3", "name": "Three", "artists": []}}],
                "next": null
            }))
            .into_response(),
            ("slow", _) => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                ServerStatus::OK.into_response()
            }
            _ => ServerStatus::NOT_FOUND.into_response(),
        }
    }

    /// Serve a fake Web API on an ephemeral port and return its root URL.
    async fn spawn_api() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let app = Router::new()
            .route("/playlists/{id}/tracks", get(playlist_page))
            .route("/me/player/pause", put(|| async { ServerStatus::FORBIDDEN }))
            .with_state(base.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    async fn client() -> SpotifyClient {
        let base = spawn_api().await;
        SpotifyClient::new(&SpotifyConfig::new(base, Duration::from_millis(300))).unwrap()
    }

    #[tokio::test]
    async fn playlist_pages_are_followed_and_unplayable_items_skipped() {
        let client = client().await;
        let tracks = client.fetch_playlist(TOKEN, "mixed").await.unwrap();

        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
        assert_eq!(tracks[0].artist, "A, B");
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let client = client().await;
        let err = client.fetch_playlist("stale", "mixed").await.unwrap_err();
        assert!(matches!(err, MusicServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_playlist_is_not_found() {
        let client = client().await;
        let err = client.fetch_playlist(TOKEN, "missing").await.unwrap_err();
        assert!(
            matches!(err, MusicServiceError::NotFound { ref path } if path == "playlists/missing/tracks")
        );
    }

    #[tokio::test]
    async fn slow_answers_time_out() {
        let client = client().await;
        let err = client.fetch_playlist(TOKEN, "slow").await.unwrap_err();
        assert!(matches!(err, MusicServiceError::Timeout { .. }));
    }

    #[tokio::test]
    async fn refused_commands_keep_their_status() {
        let client = client().await;
        let err = client.pause(TOKEN).await.unwrap_err();
        assert!(matches!(
            err,
            MusicServiceError::RequestStatus { status, .. } if status == StatusCode::FORBIDDEN
        ));
        assert!(err.is_refusal());
    }
}
