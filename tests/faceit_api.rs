//! FACEIT proxy routes exercised against a local stand-in for the Data API.

mod common;

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use common::{body_json, send, sign_in, test_config, test_state};
use serde_json::json;
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer test-key")
}

async fn players(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match query.get("nickname").map(String::as_str) {
        Some("s1mple") => Json(json!({
            "player_id": "p-1",
            "nickname": "s1mple",
            "avatar": "https://cdn.example.com/s1mple.png",
            "country": "ua",
            "games": {"cs2": {"skill_level": 10, "faceit_elo": 3200}}
        }))
        .into_response(),
        Some("flaky") => Json(json!({"player_id": "p-500", "nickname": "flaky"})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn lifetime(Path(id): Path<String>) -> Response {
    if id == "p-500" {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!({"player_id": id, "lifetime": {"Matches": "1200", "Average K/D Ratio": "1.31"}}))
        .into_response()
}

async fn history(Path(id): Path<String>, Query(query): Query<HashMap<String, String>>) -> Response {
    assert_eq!(query.get("limit").map(String::as_str), Some("30"));
    if id != "p-1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"items": [
        {"match_id": "m-2", "stats": {"Kills": "30", "Deaths": "10", "Assists": "3", "Headshots %": "60", "Result": "1", "Elo": "3200"}},
        {"match_id": "m-1", "stats": {"Kills": "10", "Deaths": "20", "Assists": "5", "Headshots %": "40", "Result": "0", "Elo": "3175"}}
    ]}))
    .into_response()
}

/// Spawn the stand-in API and return its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/players", get(players))
        .route("/players/{id}/stats/cs2", get(lifetime))
        .route("/players/{id}/games/cs2/stats", get(history));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

async fn app_with_upstream(api_key: Option<&str>) -> Router {
    let mut config = test_config();
    config.faceit.base_url = spawn_upstream().await;
    config.faceit.api_key = api_key.map(Into::into);
    overlay_hub_back::build_router(test_state(config).await)
}

#[tokio::test]
async fn player_lookup_flattens_profile() {
    let app = app_with_upstream(Some(API_KEY)).await;

    let response = send(&app, Method::GET, "/faceit?nickname=s1mple", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let player = body_json(response).await;
    assert_eq!(player["playerId"], "p-1");
    assert_eq!(player["faceitLevel"], 10);
    assert_eq!(player["faceitElo"], 3200);

    let missing = send(&app, Method::GET, "/faceit?nickname=ghost", None, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let no_nickname = send(&app, Method::GET, "/faceit", None, None).await;
    assert_eq!(no_nickname.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_api_key_is_an_internal_error() {
    let app = app_with_upstream(None).await;
    let response = send(&app, Method::GET, "/faceit?nickname=s1mple", None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn lifetime_stats_pass_through_and_upstream_errors_are_bad_gateway() {
    let app = app_with_upstream(Some(API_KEY)).await;

    let stats = body_json(send(&app, Method::GET, "/faceit/stats?username=s1mple", None, None).await).await;
    assert_eq!(stats["lifetime"]["Matches"], "1200");

    let failing = send(&app, Method::GET, "/faceit/stats?username=flaky", None, None).await;
    assert_eq!(failing.status(), StatusCode::BAD_GATEWAY);
    assert!(body_json(failing).await["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn recent_matches_fall_back_to_linked_nickname() {
    let app = app_with_upstream(Some(API_KEY)).await;

    let anonymous = send(&app, Method::GET, "/faceit/matches", None, None).await;
    assert_eq!(anonymous.status(), StatusCode::BAD_REQUEST);

    let (token, _) = sign_in(&app, "player@example.com").await;
    let unlinked = send(&app, Method::GET, "/faceit/matches", Some(&token), None).await;
    assert_eq!(unlinked.status(), StatusCode::BAD_REQUEST);

    send(&app, Method::PATCH, "/me", Some(&token), Some(json!({"faceit": "s1mple"}))).await;
    let response = send(&app, Method::GET, "/faceit/matches", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let summary = body_json(response).await;
    assert_eq!(summary["kills"], 40);
    assert_eq!(summary["deaths"], 30);
    assert_eq!(summary["wins"], 1);
    assert_eq!(summary["loses"], 1);
    assert_eq!(summary["matchCount"], 2);
    assert_eq!(summary["kd"], 1.33);
    assert_eq!(summary["hsPercent"], 50.0);
    assert_eq!(summary["winRate"], 50.0);
    assert_eq!(summary["elo"], 3200);
    assert_eq!(summary["lastGameStats"]["Kills"], "30");
}
