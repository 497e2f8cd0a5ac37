use crate::config::ServerConfig;
use crate::library::Library;
use crate::streams::StreamResolver;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use dakids_resolve::DirectUrlResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod routes_addon;
pub mod routes_home;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Episode list, loaded once at startup
    pub library: Arc<Library>,
    pub streams: StreamResolver,
}

impl AppContext {
    pub fn new(library: Library, resolver: Arc<dyn DirectUrlResolver>) -> Self {
        Self {
            library: Arc::new(library),
            streams: StreamResolver::new(resolver),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(routes_home::home))
        .route("/health", get(health_check))
        .merge(routes_addon::addon_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

pub(crate) async fn health_check() -> &'static str {
    "ok"
}

/// Start the catalog and stream host
pub async fn start_server(
    config: &ServerConfig,
    library: Library,
    resolver: Arc<dyn DirectUrlResolver>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    let episodes = library.len();
    let app = create_router(AppContext::new(library, resolver));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Dakids addon running on {}", addr);
    tracing::info!("Episodes available: {}", episodes);
    tracing::info!("Manifest: http://localhost:{}/manifest.json", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
