//! Shared helpers for integration tests.
//!
//! Provides scripted resolvers standing in for yt-dlp and the headless
//! browser, plus a router builder over an in-memory episode list.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;

use dakids::config::AddonConfig;
use dakids::library::Library;
use dakids::server::{create_router, AppContext};
use dakids_common::Episode;
use dakids_resolve::{DirectUrlResolver, EmbedError, EmbedResolver, Error, Result, Stage};

/// Direct-URL resolver answering from a fixed table.
///
/// Ids mapped to `None` fail like a yt-dlp error; ids absent from the table
/// produce empty output.
#[derive(Default)]
pub struct ScriptedResolver {
    answers: HashMap<String, Option<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, id: &str, url: &str) -> Self {
        self.answers.insert(id.to_string(), Some(url.to_string()));
        self
    }

    pub fn fail(mut self, id: &str) -> Self {
        self.answers.insert(id.to_string(), None);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectUrlResolver for ScriptedResolver {
    async fn resolve_direct_url(&self, source_id: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(source_id) {
            Some(Some(url)) => Ok(url.clone()),
            Some(None) => Err(Error::tool_failed("yt-dlp", "ERROR: Video unavailable")),
            None => Ok(String::new()),
        }
    }
}

/// What a [`ScriptedEmbed`] answers for every lookup.
#[derive(Clone)]
pub enum EmbedOutcome {
    Found(String),
    Missing,
    Crash(String),
}

pub struct ScriptedEmbed {
    outcome: EmbedOutcome,
    pub calls: AtomicUsize,
}

impl ScriptedEmbed {
    pub fn new(outcome: EmbedOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbedResolver for ScriptedEmbed {
    async fn resolve_embed_url(&self, video_id: &str) -> std::result::Result<String, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            EmbedOutcome::Found(url) => Ok(url.clone()),
            EmbedOutcome::Missing => Err(EmbedError::NotFound(video_id.to_string())),
            EmbedOutcome::Crash(message) => Err(EmbedError::automation(Stage::Launch, message)),
        }
    }
}

pub fn episode(id: &str, title: &str, source: &str) -> Episode {
    Episode::new(id, title, source)
}

pub fn library(episodes: Vec<Episode>) -> Library {
    Library::new(episodes, AddonConfig::default())
}

/// Router over `episodes`, resolving through `resolver`.
pub fn addon_app(episodes: Vec<Episode>, resolver: Arc<dyn DirectUrlResolver>) -> Router {
    create_router(AppContext::new(library(episodes), resolver))
}

/// Helper to get response body as string
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
