mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode, header};
use serde_json::json;
use tempfile::tempdir;

use common::{FakeMusic, PLAYLIST_ID, TOKEN, app, app_state, call, call_raw, speaker, tracks};

#[tokio::test]
async fn full_round_from_playlist_to_bingo_check() {
    let dir = tempdir().unwrap();
    let music = Arc::new(FakeMusic::new().with_playlist(PLAYLIST_ID, tracks(40)));
    let state = app_state(dir.path(), music.clone(), None).await;
    let app = app(state);

    let (status, body) = call(&app, Method::PUT, "/auth/token", Some(json!({"access_token": TOKEN}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/add_playlist",
        Some(json!({
            "id": format!("https://open.spotify.com/playlist/{PLAYLIST_ID}?si=abc"),
            "name": "Party Hits",
            "is_default": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/api/get_playlists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playlists"][0]["id"], PLAYLIST_ID);
    assert_eq!(body["playlists"][0]["is_default"], true);

    let (status, body) = call(&app, Method::POST, "/api/load_playlist", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["tracks_loaded"], 40);
    assert_eq!(body["tracks_available"], 40);

    let (status, body) = call(&app, Method::POST, "/api/generate_cards", Some(json!({"num_cards": 2}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let cards = body["cards"].as_object().unwrap();
    assert_eq!(cards.len(), 2);
    let card_id = cards.keys().next().unwrap().clone();
    assert_eq!(cards[&card_id]["tracks"].as_array().unwrap().len(), 25);

    for _ in 0..3 {
        let (status, body) = call(&app, Method::POST, "/api/play", None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["device"], "Living Room");
    }
    assert_eq!(music.started().len(), 3);

    let (status, body) = call(&app, Method::GET, "/api/played_tracks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_played"], 3);
    assert_eq!(body["total_remaining"], 37);
    let played: Vec<String> = body["played_tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|track| track["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(played, music.started());

    let (status, body) = call(&app, Method::GET, &format!("/api/check_card/{card_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card_id"], card_id.as_str());
    assert_eq!(body["has_bingo"], false);

    let (status, body) = call(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_tracks"], 40);
    assert_eq!(body["total_played"], 3);
    assert_eq!(body["current_playlist"], PLAYLIST_ID);
    assert_eq!(body["card_summaries"][&card_id], "no results");

    let (status, headers, document) = call_raw(&app, Method::GET, "/api/download_cards_pdf", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert!(
        headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("bingo_cards.pdf")
    );
    assert!(document.starts_with(b"%PDF"));

    let (status, _) = call(&app, Method::POST, "/api/new_round", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, Method::GET, "/api/game_state", None).await;
    assert_eq!(body["num_tracks"], 0);
    assert!(body["cards"].as_object().unwrap().is_empty());
    assert!(body["played_tracks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let music = Arc::new(FakeMusic::new().with_playlist(PLAYLIST_ID, tracks(30)));
    {
        let app = app(app_state(dir.path(), music.clone(), Some(TOKEN)).await);
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/load_playlist",
            Some(json!({"playlist_id": format!("spotify:playlist:{PLAYLIST_ID}")})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::POST, "/api/play", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let app = app(app_state(dir.path(), music, Some(TOKEN)).await);
    let (_, body) = call(&app, Method::GET, "/api/played_tracks", None).await;
    assert_eq!(body["total_played"], 1);
    assert_eq!(body["total_remaining"], 29);
}

#[tokio::test]
async fn playback_requires_a_session() {
    let dir = tempdir().unwrap();
    let app = app(app_state(dir.path(), Arc::new(FakeMusic::new()), None).await);

    for (method, uri) in [
        (Method::POST, "/api/play"),
        (Method::POST, "/api/pause"),
        (Method::GET, "/api/get_devices"),
        (Method::POST, "/api/load_playlist"),
    ] {
        let (status, body) = call(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert!(body["error"].is_string());
    }

    let (status, body) = call(&app, Method::GET, "/auth/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn drawing_from_an_empty_pool_is_rejected() {
    let dir = tempdir().unwrap();
    let app = app(app_state(dir.path(), Arc::new(FakeMusic::new()), Some(TOKEN)).await);

    let (status, body) = call(&app, Method::POST, "/api/play", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no more tracks to play");
}

#[tokio::test]
async fn play_without_active_device_leaves_pool_untouched() {
    let dir = tempdir().unwrap();
    let music = Arc::new(
        FakeMusic::new()
            .with_playlist(PLAYLIST_ID, tracks(30))
            .with_devices(vec![speaker(false)]),
    );
    let app = app(app_state(dir.path(), music, Some(TOKEN)).await);
    call(&app, Method::POST, "/api/load_playlist", Some(json!({"playlist_id": PLAYLIST_ID}))).await;

    let (status, _) = call(&app, Method::POST, "/api/play", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = call(&app, Method::GET, "/api/played_tracks", None).await;
    assert_eq!(body["total_played"], 0);
}

#[tokio::test]
async fn playback_timeout_keeps_the_track_played() {
    let dir = tempdir().unwrap();
    let music = Arc::new(
        FakeMusic::new()
            .with_playlist(PLAYLIST_ID, tracks(30))
            .failing_playback(),
    );
    let app = app(app_state(dir.path(), music, Some(TOKEN)).await);
    call(&app, Method::POST, "/api/load_playlist", Some(json!({"playlist_id": PLAYLIST_ID}))).await;

    let (status, _) = call(&app, Method::POST, "/api/play", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (_, body) = call(&app, Method::GET, "/api/played_tracks", None).await;
    assert_eq!(body["total_played"], 1);
}

#[tokio::test]
async fn load_playlist_errors() {
    let dir = tempdir().unwrap();
    let music = Arc::new(FakeMusic::new().with_playlist(PLAYLIST_ID, Vec::new()));
    let app = app(app_state(dir.path(), music, Some(TOKEN)).await);

    let (status, body) = call(&app, Method::POST, "/api/load_playlist", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("default playlist"));

    let (status, _) = call(&app, Method::POST, "/api/load_playlist", Some(json!({"playlist_id": PLAYLIST_ID}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/api/load_playlist", Some(json!({"playlist_id": "not a playlist"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn card_errors() {
    let dir = tempdir().unwrap();
    let music = Arc::new(FakeMusic::new().with_playlist(PLAYLIST_ID, tracks(10)));
    let app = app(app_state(dir.path(), music, Some(TOKEN)).await);
    call(&app, Method::POST, "/api/load_playlist", Some(json!({"playlist_id": PLAYLIST_ID}))).await;

    let (status, body) = call(&app, Method::POST, "/api/generate_cards", Some(json!({"num_cards": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("need 25"));

    let (status, _) = call(&app, Method::POST, "/api/generate_cards", Some(json!({"num_cards": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::GET, "/api/check_card/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, "/api/download_cards_pdf", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("generate cards first"));
}

#[tokio::test]
async fn registry_default_is_exclusive() {
    let dir = tempdir().unwrap();
    let app = app(app_state(dir.path(), Arc::new(FakeMusic::new()), None).await);
    let second = "0JQ5DAqbMKFQ00XGBls6ym";

    call(&app, Method::POST, "/api/add_playlist", Some(json!({"id": PLAYLIST_ID, "name": "One", "is_default": true}))).await;
    call(&app, Method::POST, "/api/add_playlist", Some(json!({"id": second, "name": "Two"}))).await;

    let (status, _) = call(&app, Method::POST, "/api/set_default_playlist", Some(json!({"playlist_id": second}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, Method::GET, "/api/get_playlists", None).await;
    let defaults: Vec<&str> = body["playlists"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["is_default"] == true)
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(defaults, vec![second]);

    let (status, _) = call(&app, Method::POST, "/api/set_default_playlist", Some(json!({"playlist_id": "abc123"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/playlists/{PLAYLIST_ID}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &format!("/api/playlists/{PLAYLIST_ID}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::POST, "/api/add_playlist", Some(json!({"id": PLAYLIST_ID, "name": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Method::POST, "/api/add_playlist", Some(json!({"name": "No id"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saved_games_round_trip() {
    let dir = tempdir().unwrap();
    let music = Arc::new(FakeMusic::new().with_playlist(PLAYLIST_ID, tracks(30)));
    let app = app(app_state(dir.path(), music, Some(TOKEN)).await);
    call(&app, Method::POST, "/api/load_playlist", Some(json!({"playlist_id": PLAYLIST_ID}))).await;
    call(&app, Method::POST, "/api/generate_cards", Some(json!({"num_cards": 3}))).await;
    call(&app, Method::POST, "/api/play", None).await;
    let (_, before) = call(&app, Method::GET, "/api/game_state", None).await;

    let (status, body) = call(&app, Method::POST, "/api/save_game", Some(json!({"name": "Friday night", "description": "office party"}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let filename = body["filename"].as_str().unwrap().to_string();

    call(&app, Method::POST, "/api/new_round", None).await;

    let (_, body) = call(&app, Method::GET, "/api/list_saved_games", None).await;
    assert_eq!(body["saved_games"][0]["filename"], filename.as_str());
    assert_eq!(body["saved_games"][0]["name"], "Friday night");

    let (status, _) = call(&app, Method::POST, &format!("/api/load_game/{filename}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, after) = call(&app, Method::GET, "/api/game_state", None).await;
    assert_eq!(before, after);

    let (status, _) = call(&app, Method::POST, "/api/load_game/notes.txt", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::POST, "/api/load_game/unknown_20240101_000000.json", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let broken = dir.path().join("saved_games").join("broken_20240101_000000.json");
    tokio::fs::write(&broken, br#"{"name": "broken", "game_state": {"surprise": 1}}"#).await.unwrap();
    let (status, body) = call(&app, Method::POST, "/api/load_game/broken_20240101_000000.json", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let (_, unchanged) = call(&app, Method::GET, "/api/game_state", None).await;
    assert_eq!(unchanged, before);
}

#[tokio::test]
async fn bingo_mode_and_devices() {
    let dir = tempdir().unwrap();
    let music = Arc::new(FakeMusic::new());
    let app = app(app_state(dir.path(), music.clone(), Some(TOKEN)).await);

    let (status, body) = call(&app, Method::POST, "/api/bingo_mode", Some(json!({"bingo_mode": "rowcol"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bingo_mode"], "rowcol");
    let (_, body) = call(&app, Method::GET, "/api/game_state", None).await;
    assert_eq!(body["bingo_mode"], "rowcol");

    let (status, _) = call(&app, Method::POST, "/api/bingo_mode", Some(json!({"bingo_mode": "corners"}))).await;
    assert!(status.is_client_error());

    let (status, body) = call(&app, Method::GET, "/api/get_devices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"][0]["type"], "Speaker");

    let (status, _) = call(&app, Method::POST, "/api/select_device", Some(json!({"device_id": "device-1"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::POST, "/api/select_device", Some(json!({"device_id": "nope"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::POST, "/api/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(music.pauses(), 1);

    let (status, _) = call(&app, Method::DELETE, "/auth/token", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::POST, "/api/pause", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn healthcheck_reports_ok() {
    let dir = tempdir().unwrap();
    let app = app(app_state(dir.path(), Arc::new(FakeMusic::new()), Some(TOKEN)).await);

    let (status, body) = call(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["music_session"], true);
    assert_eq!(body["realtime_clients"], 0);
}
