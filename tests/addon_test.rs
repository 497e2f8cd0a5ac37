//! Addon host integration tests
//!
//! Drives the catalog and stream routes through the router with scripted
//! resolvers standing in for yt-dlp.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{addon_app, body_to_json, body_to_string, episode, ScriptedResolver};
use serde_json::json;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manifest_declares_channel_catalog() {
    let app = addon_app(Vec::new(), Arc::new(ScriptedResolver::new()));

    let response = app.oneshot(get("/manifest.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], "com.dakids.Stremio");
    assert_eq!(json["version"], "3.0.0");
    assert_eq!(json["resources"], json!(["catalog", "stream"]));
    assert_eq!(json["types"], json!(["channel"]));
    assert_eq!(json["idPrefixes"], json!(["dk"]));
    assert_eq!(json["catalogs"][0]["type"], "channel");
    assert_eq!(json["catalogs"][0]["id"], "dakids");
    assert_eq!(json["catalogs"][0]["extra"][0]["name"], "search");
    assert_eq!(json["catalogs"][0]["extra"][0]["isRequired"], false);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_lists_single_channel_entry() {
    let app = addon_app(
        vec![
            episode("e1", "Bluey", "abc").with_poster("https://img/bluey.jpg"),
            episode("e2", "Peppa", "def").with_poster("https://img/peppa.jpg"),
        ],
        Arc::new(ScriptedResolver::new()),
    );

    let response = app
        .oneshot(get("/catalog/channel/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let metas = json["metas"].as_array().unwrap();
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0]["id"], "dakids");
    assert_eq!(metas[0]["type"], "channel");
    assert_eq!(metas[0]["name"], "Cartoni per Bambini");
    assert_eq!(metas[0]["poster"], "https://img/bluey.jpg");
}

#[tokio::test]
async fn catalog_with_no_episodes_has_empty_poster() {
    let app = addon_app(Vec::new(), Arc::new(ScriptedResolver::new()));

    let response = app
        .oneshot(get("/catalog/channel/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metas"].as_array().unwrap().len(), 1);
    assert_eq!(json["metas"][0]["poster"], "");
}

#[tokio::test]
async fn unknown_catalog_is_empty() {
    let app = addon_app(
        vec![episode("e1", "Bluey", "abc")],
        Arc::new(ScriptedResolver::new()),
    );

    let response = app
        .oneshot(get("/catalog/movie/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({ "metas": [] }));
}

#[tokio::test]
async fn catalog_search_matches_titles() {
    let mut peppa = episode("e2", "Peppa Pig - Pozzanghere", "def");
    peppa.runtime = Some("5:30".to_string());
    peppa.released = Some("20240301".to_string());
    let app = addon_app(
        vec![episode("e1", "Bluey", "abc"), peppa],
        Arc::new(ScriptedResolver::new()),
    );

    let response = app
        .oneshot(get("/catalog/channel/dakids/search=peppa.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let metas = json["metas"].as_array().unwrap();
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0]["id"], "e2");
    assert_eq!(metas[0]["runtime"], "5 min");
    assert_eq!(metas[0]["released"], "2024-03-01");
    assert_eq!(metas[0]["poster"], "https://i.ytimg.com/vi/def/hqdefault.jpg");
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_resolved_entry_shape() {
    let resolver = ScriptedResolver::new().ok("abc", "https://cdn/v.mp4");
    let app = addon_app(vec![episode("e1", "Ep1", "abc")], Arc::new(resolver));

    let response = app
        .oneshot(get("/stream/channel/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(
        json,
        json!({
            "streams": [{
                "title": "Ep1",
                "url": "https://cdn/v.mp4",
                "behaviorHints": { "notWebReady": false, "bingeGroup": "abc" }
            }]
        })
    );
}

#[tokio::test]
async fn stream_failure_falls_back_to_watch_page() {
    let resolver = ScriptedResolver::new().fail("abc");
    let app = addon_app(vec![episode("e1", "Ep1", "abc")], Arc::new(resolver));

    let response = app
        .oneshot(get("/stream/channel/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(
        json,
        json!({
            "streams": [{
                "title": "Ep1 (Apri su YouTube)",
                "externalUrl": "https://www.youtube.com/watch?v=abc",
                "behaviorHints": { "notWebReady": true }
            }]
        })
    );
}

#[tokio::test]
async fn stream_mixes_results_in_episode_order() {
    let resolver = Arc::new(
        ScriptedResolver::new()
            .ok("a1", "https://cdn/a1.mp4")
            .fail("b2")
            .ok("c3", "https://cdn/c3.mp4"),
    );
    let app = addon_app(
        vec![
            episode("e1", "Uno", "a1"),
            episode("e2", "Due", "b2"),
            episode("e3", "Tre", "c3"),
            episode("e4", "Quattro", "d4"),
        ],
        resolver.clone(),
    );

    let response = app
        .oneshot(get("/stream/channel/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let streams = json["streams"].as_array().unwrap();
    let titles: Vec<&str> = streams.iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(
        titles,
        vec![
            "Uno",
            "Due (Apri su YouTube)",
            "Tre",
            "Quattro (Apri su YouTube)"
        ]
    );
    assert_eq!(streams[0]["url"], "https://cdn/a1.mp4");
    assert_eq!(streams[2]["url"], "https://cdn/c3.mp4");
    assert_eq!(
        streams[3]["externalUrl"],
        "https://www.youtube.com/watch?v=d4"
    );
    assert_eq!(resolver.call_count(), 4);
}

#[tokio::test]
async fn stream_with_no_episodes_is_empty() {
    let app = addon_app(Vec::new(), Arc::new(ScriptedResolver::new()));

    let response = app
        .oneshot(get("/stream/channel/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({ "streams": [] }));
}

#[tokio::test]
async fn stream_for_single_episode() {
    let resolver = Arc::new(
        ScriptedResolver::new()
            .ok("a1", "https://cdn/a1.mp4")
            .ok("b2", "https://cdn/b2.mp4"),
    );
    let app = addon_app(
        vec![episode("", "Uno", "a1"), episode("", "Due", "b2")],
        resolver.clone(),
    );

    let response = app
        .oneshot(get("/stream/channel/dkb2.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let streams = json["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0]["title"], "Due");
    assert_eq!(streams[0]["url"], "https://cdn/b2.mp4");
    assert_eq!(resolver.call_count(), 1);
}

#[tokio::test]
async fn stream_unknown_id_is_not_found() {
    let resolver = Arc::new(ScriptedResolver::new());
    let app = addon_app(vec![episode("e1", "Uno", "a1")], resolver.clone());

    let response = app
        .oneshot(get("/stream/channel/nope.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({ "streams": [] }));
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn stream_wrong_type_is_not_found() {
    let app = addon_app(
        vec![episode("e1", "Uno", "a1")],
        Arc::new(ScriptedResolver::new()),
    );

    let response = app
        .oneshot(get("/stream/movie/dakids.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_allow_any_origin() {
    let app = addon_app(Vec::new(), Arc::new(ScriptedResolver::new()));

    let request = Request::builder()
        .uri("/manifest.json")
        .header(header::ORIGIN, "https://web.stremio.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn health_check() {
    let app = addon_app(Vec::new(), Arc::new(ScriptedResolver::new()));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "ok");
}

#[tokio::test]
async fn landing_page_links_manifest() {
    let app = addon_app(
        vec![episode("e1", "Bluey & Bingo", "abc")],
        Arc::new(ScriptedResolver::new()),
    );

    let request = Request::builder()
        .uri("/")
        .header(header::HOST, "kids.example:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("http://kids.example:3000/manifest.json"));
    assert!(body.contains("Bluey &amp; Bingo"));
    assert!(body.contains("https://i.ytimg.com/vi/abc/hqdefault.jpg"));
}
