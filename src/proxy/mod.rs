//! Embed proxy host.
//!
//! `GET /play/{videoId}` asks the [`EmbedResolver`] for the video's player
//! frame and redirects there. Each request gets its own browser session.

use crate::config::ProxyConfig;
use crate::server::{health_check, shutdown_signal};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use dakids_common::youtube;
use dakids_resolve::{EmbedError, EmbedResolver};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Body sent when a video has no embeddable frame.
pub const NOT_EMBEDDABLE: &str = "Video non embeddabile";

/// Body sent for any automation failure.
pub const INTERNAL_ERROR: &str = "Errore interno";

/// Shared proxy context
#[derive(Clone)]
pub struct ProxyContext {
    pub embed: Arc<dyn EmbedResolver>,
}

impl ProxyContext {
    pub fn new(embed: Arc<dyn EmbedResolver>) -> Self {
        Self { embed }
    }
}

/// Failure of a play request, rendered as a plain-text status.
#[derive(Debug)]
pub enum PlayError {
    NotFound,
    Internal(String),
}

impl From<EmbedError> for PlayError {
    fn from(e: EmbedError) -> Self {
        match e {
            EmbedError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for PlayError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, NOT_EMBEDDABLE).into_response(),
            Self::Internal(cause) => {
                tracing::error!(error = %cause, "Embed lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
            }
        }
    }
}

pub fn create_router(ctx: ProxyContext) -> Router {
    Router::new()
        .route("/play/:video_id", get(play))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn play(
    State(ctx): State<ProxyContext>,
    Path(video_id): Path<String>,
) -> Result<Response, PlayError> {
    if !youtube::is_valid_video_id(&video_id) {
        tracing::debug!("Rejected malformed video id {:?}", video_id);
        return Err(PlayError::NotFound);
    }

    let embed_url = ctx.embed.resolve_embed_url(&video_id).await?;

    let location = HeaderValue::from_str(&embed_url)
        .map_err(|e| PlayError::Internal(format!("unusable embed URL {embed_url:?}: {e}")))?;

    tracing::info!(video_id = %video_id, "Redirecting to embed URL");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Start the embed proxy host
pub async fn start_proxy(config: &ProxyConfig, embed: Arc<dyn EmbedResolver>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid proxy address")?;

    let app = create_router(ProxyContext::new(embed));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Embed proxy running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Proxy shutdown complete");
    Ok(())
}
