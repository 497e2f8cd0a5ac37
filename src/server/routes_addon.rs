//! Addon protocol routes: manifest, catalog and streams.
//!
//! Resource paths end in `.json` inside the last segment, so handlers take
//! the whole segment and strip the suffix themselves.

use crate::library::CHANNEL_TYPE;
use crate::server::AppContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dakids_common::{CatalogResponse, Manifest, StreamResponse};

pub fn addon_routes() -> Router<AppContext> {
    Router::new()
        .route("/manifest.json", get(manifest))
        .route("/catalog/:kind/:id", get(catalog))
        .route("/catalog/:kind/:id/:extra", get(catalog_with_extra))
        .route("/stream/:kind/:id", get(stream))
}

fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// Value of `key` in an extra segment such as `search=peppa&skip=0`.
fn extra_value<'a>(extra: &'a str, key: &str) -> Option<&'a str> {
    extra.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

async fn manifest(State(ctx): State<AppContext>) -> Json<Manifest> {
    Json(ctx.library.manifest())
}

async fn catalog(
    State(ctx): State<AppContext>,
    Path((kind, id)): Path<(String, String)>,
) -> Json<CatalogResponse> {
    let id = strip_json(&id);

    let metas = if kind == CHANNEL_TYPE && ctx.library.is_channel(id) {
        ctx.library.catalog()
    } else {
        tracing::debug!("Unknown catalog {}/{}", kind, id);
        Vec::new()
    };

    Json(CatalogResponse { metas })
}

async fn catalog_with_extra(
    State(ctx): State<AppContext>,
    Path((kind, id, extra)): Path<(String, String, String)>,
) -> Json<CatalogResponse> {
    let extra = strip_json(&extra);

    if kind != CHANNEL_TYPE || !ctx.library.is_channel(&id) {
        return Json(CatalogResponse { metas: Vec::new() });
    }

    let metas = match extra_value(extra, "search") {
        Some(query) => ctx.library.search(query),
        None => ctx.library.catalog(),
    };

    Json(CatalogResponse { metas })
}

async fn stream(
    State(ctx): State<AppContext>,
    Path((kind, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let id = strip_json(&id);

    if kind != CHANNEL_TYPE {
        return (StatusCode::NOT_FOUND, Json(StreamResponse { streams: Vec::new() }));
    }

    let streams = if ctx.library.is_channel(id) {
        ctx.streams.resolve_streams(ctx.library.episodes()).await
    } else if let Some(episode) = ctx.library.find_episode(id) {
        vec![ctx.streams.resolve_one(episode).await]
    } else {
        tracing::debug!("No stream source for {}", id);
        return (StatusCode::NOT_FOUND, Json(StreamResponse { streams: Vec::new() }));
    };

    (StatusCode::OK, Json(StreamResponse { streams }))
}
