//! HTTP-level tests for sessions, the profile and the widget registry.

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use common::{PUBLIC_BASE_URL, body_json, build_test_app, send, sign_in};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn session_requires_bridge_secret() {
    let app = build_test_app().await;

    for secret in [None, Some("wrong")] {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/auth/sessions")
            .header(CONTENT_TYPE, "application/json");
        if let Some(secret) = secret {
            builder = builder.header("x-auth-secret", secret);
        }
        let request = builder
            .body(Body::from(json!({"email": "a@example.com"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn repeated_sign_in_keeps_the_same_user() {
    let app = build_test_app().await;
    let (first_token, first) = sign_in(&app, "Player@Example.com").await;
    let (second_token, second) = sign_in(&app, "player@example.com").await;

    assert_ne!(first_token, second_token);
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["email"], "player@example.com");
}

#[tokio::test]
async fn revoked_session_is_rejected() {
    let app = build_test_app().await;
    let (token, _) = sign_in(&app, "player@example.com").await;

    let revoked = send(&app, Method::DELETE, "/auth/sessions", Some(&token), None).await;
    assert_eq!(revoked.status(), StatusCode::NO_CONTENT);

    let me = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_links_and_unlinks_accounts() {
    let app = build_test_app().await;
    let (token, _) = sign_in(&app, "player@example.com").await;

    let linked = send(
        &app,
        Method::PATCH,
        "/me",
        Some(&token),
        Some(json!({"faceit": "s1mple", "twitch": "s1mple_tv"})),
    )
    .await;
    assert_eq!(linked.status(), StatusCode::OK);
    let body = body_json(linked).await;
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["faceit"], "s1mple");

    let cleared = body_json(
        send(&app, Method::PATCH, "/me", Some(&token), Some(json!({"twitch": null}))).await,
    )
    .await;
    assert!(cleared["user"]["twitch"].is_null());
    assert_eq!(cleared["user"]["faceit"], "s1mple");

    let me = body_json(send(&app, Method::GET, "/me", Some(&token), None).await).await;
    assert_eq!(me["user"]["faceit"], "s1mple");
    assert!(me["user"]["twitch"].is_null());

    let empty = send(&app, Method::PATCH, "/me", Some(&token), Some(json!({}))).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(empty).await["error"], "At least one field must be provided");
}

#[tokio::test]
async fn widget_lifecycle() {
    let app = build_test_app().await;
    let (token, user) = sign_in(&app, "player@example.com").await;

    let created = send(
        &app,
        Method::POST,
        "/widgets",
        Some(&token),
        Some(json!({
            "name": "  Main overlay ",
            "compact": true,
            "colorTheme": "green",
            "showProfile": false,
            "faceitUsername": "s1mple"
        })),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    let widget = body_json(created).await["widget"].clone();
    let id = widget["id"].as_str().unwrap().to_owned();
    assert_eq!(widget["name"], "Main overlay");
    assert_eq!(widget["type"], "faceit-stats");
    assert_eq!(widget["ownerId"], user["id"]);
    assert_eq!(
        widget["widgetUrl"],
        format!(
            "{PUBLIC_BASE_URL}/widget/faceit-stats?username=s1mple&compact=true&theme=green&showProfile=false"
        )
    );

    let renamed = body_json(
        send(&app, Method::PATCH, &format!("/widgets/{id}"), Some(&token), Some(json!({"name": "Alt"}))).await,
    )
    .await;
    assert_eq!(renamed["widget"]["name"], "Alt");
    assert_eq!(renamed["widget"]["widgetUrl"], widget["widgetUrl"]);

    let restyled = body_json(
        send(
            &app,
            Method::PATCH,
            &format!("/widgets/{id}"),
            Some(&token),
            Some(json!({"colorTheme": "red", "faceitUsername": null})),
        )
        .await,
    )
    .await;
    assert_eq!(
        restyled["widget"]["widgetUrl"],
        format!("{PUBLIC_BASE_URL}/widget/faceit-stats?username=&compact=true&theme=red&showProfile=false")
    );
    assert_eq!(restyled["message"], "Widget updated successfully");

    let listed = body_json(send(&app, Method::GET, "/widgets", Some(&token), None).await).await;
    assert_eq!(listed["widgets"].as_array().unwrap().len(), 1);

    let deleted = send(&app, Method::DELETE, &format!("/widgets/{id}"), Some(&token), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let again = send(&app, Method::DELETE, &format!("/widgets/{id}"), Some(&token), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn widgets_are_private_and_validated() {
    let app = build_test_app().await;
    let (owner, _) = sign_in(&app, "owner@example.com").await;
    let (other, _) = sign_in(&app, "other@example.com").await;

    let invalid = send(&app, Method::POST, "/widgets", Some(&owner), Some(json!({"name": "   "}))).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let too_long = send(
        &app,
        Method::POST,
        "/widgets",
        Some(&owner),
        Some(json!({"name": "x".repeat(51)})),
    )
    .await;
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);

    let created = body_json(
        send(&app, Method::POST, "/widgets", Some(&owner), Some(json!({"name": "Mine"}))).await,
    )
    .await;
    let id = created["widget"]["id"].as_str().unwrap().to_owned();

    let foreign = send(
        &app,
        Method::PATCH,
        &format!("/widgets/{id}"),
        Some(&other),
        Some(json!({"compact": true})),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(foreign).await["error"], "Widget not found");

    let listed = body_json(send(&app, Method::GET, "/widgets", Some(&other), None).await).await;
    assert!(listed["widgets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn healthcheck_reports_ok_with_store() {
    let app = build_test_app().await;
    let response = send(&app, Method::GET, "/healthcheck", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["faceitConfigured"], false);
    assert_eq!(health["activeSessions"], 0);
}

#[tokio::test]
async fn openapi_document_points_at_public_base_url() {
    let app = build_test_app().await;
    let response = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    assert_eq!(doc["servers"][0]["url"], common::PUBLIC_BASE_URL);
    assert!(doc["paths"]["/challenges/{id}/lose"].is_object());
}

#[tokio::test]
async fn degraded_mode_answers_503() {
    let state = common::test_state(common::test_config()).await;
    let app = overlay_hub_back::build_router(state.clone());
    let (token, _) = sign_in(&app, "player@example.com").await;

    state.clear_record_store().await;

    let health = body_json(send(&app, Method::GET, "/healthcheck", None, None).await).await;
    assert_eq!(health["status"], "degraded");

    let response = send(
        &app,
        Method::POST,
        &format!("/challenges/{}/win", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let me = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(me.status(), StatusCode::SERVICE_UNAVAILABLE);
}
