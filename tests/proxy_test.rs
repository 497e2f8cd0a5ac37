//! Embed proxy integration tests

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_to_string, EmbedOutcome, ScriptedEmbed};
use dakids::proxy::{create_router, ProxyContext, INTERNAL_ERROR, NOT_EMBEDDABLE};
use tower::ServiceExt;

fn play(video_id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/play/{video_id}"))
        .body(Body::empty())
        .unwrap()
}

fn proxy_app(embed: Arc<ScriptedEmbed>) -> axum::Router {
    create_router(ProxyContext::new(embed))
}

#[tokio::test]
async fn play_redirects_to_embed_url() {
    let embed = Arc::new(ScriptedEmbed::new(EmbedOutcome::Found(
        "https://www.youtube.com/embed/abc?autoplay=1".to_string(),
    )));

    let response = proxy_app(embed.clone())
        .oneshot(play("abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://www.youtube.com/embed/abc?autoplay=1"
    );
    assert_eq!(embed.call_count(), 1);
}

#[tokio::test]
async fn play_without_frame_is_not_found() {
    let embed = Arc::new(ScriptedEmbed::new(EmbedOutcome::Missing));

    let response = proxy_app(embed).oneshot(play("abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_to_string(response.into_body()).await, NOT_EMBEDDABLE);
}

#[tokio::test]
async fn play_automation_failure_hides_cause() {
    let embed = Arc::new(ScriptedEmbed::new(EmbedOutcome::Crash(
        "chrome exited with signal 9".to_string(),
    )));

    let response = proxy_app(embed).oneshot(play("abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_string(response.into_body()).await;
    assert_eq!(body, INTERNAL_ERROR);
    assert!(!body.contains("signal"));
}

#[tokio::test]
async fn play_unusable_location_is_internal_error() {
    let embed = Arc::new(ScriptedEmbed::new(EmbedOutcome::Found(
        "https://bad\nurl".to_string(),
    )));

    let response = proxy_app(embed).oneshot(play("abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_to_string(response.into_body()).await, INTERNAL_ERROR);
}

#[tokio::test]
async fn play_malformed_id_skips_browser() {
    let embed = Arc::new(ScriptedEmbed::new(EmbedOutcome::Found(
        "https://www.youtube.com/embed/x".to_string(),
    )));

    let response = proxy_app(embed.clone())
        .oneshot(play("bad%20id"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(embed.call_count(), 0);
}

#[tokio::test]
async fn proxy_health_check() {
    let embed = Arc::new(ScriptedEmbed::new(EmbedOutcome::Missing));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = proxy_app(embed.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(embed.call_count(), 0);
}
