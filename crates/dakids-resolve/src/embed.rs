//! Embeddable player URL resolution through a headless browser.
//!
//! Every lookup runs in its own [`BrowserSession`]: a fresh Chromium
//! process with a throwaway profile directory. The session is closed on
//! every exit path and killed if the lookup future is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, TimeSinceEpoch};
use chromiumoxide::{Browser, BrowserConfig, Page};
use dakids_common::youtube;
use futures::StreamExt;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Default budget for one whole browser session.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(45);

/// Domain assumed for cookies that do not name one.
const DEFAULT_COOKIE_URL: &str = "https://www.youtube.com";

/// Script returning the first frame's `src`, or an empty string.
const FIRST_IFRAME_SRC: &str =
    r#"(() => { const f = document.querySelector("iframe"); return f ? f.src : ""; })()"#;

/// Why an embed lookup produced no URL.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The page loaded but holds no embeddable frame.
    #[error("no embeddable frame for {0}")]
    NotFound(String),

    /// The browser could not be driven to a result.
    #[error("browser automation failed during {stage}: {message}")]
    Automation { stage: Stage, message: String },

    /// The whole session, launch to close, ran past its budget.
    #[error("browser session timed out after {timeout:?}")]
    TimedOut { timeout: Duration },
}

impl EmbedError {
    pub fn automation(stage: Stage, message: impl Into<String>) -> Self {
        Self::Automation {
            stage,
            message: message.into(),
        }
    }
}

/// Step of a browser session, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Launch,
    Cookies,
    Navigate,
    Extract,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Launch => write!(f, "launch"),
            Self::Cookies => write!(f, "cookie injection"),
            Self::Navigate => write!(f, "navigation"),
            Self::Extract => write!(f, "extraction"),
        }
    }
}

/// Capability that finds an embeddable player URL for a video.
#[async_trait]
pub trait EmbedResolver: Send + Sync {
    async fn resolve_embed_url(&self, video_id: &str) -> Result<String, EmbedError>;
}

/// A cookie as exported by browser extensions (`cookies.json`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub http_only: Option<bool>,
    /// Expiry in seconds since the epoch. Session cookies have none.
    #[serde(default, alias = "expirationDate")]
    pub expires: Option<f64>,
}

impl BrowserCookie {
    fn to_param(&self) -> Result<CookieParam, String> {
        let mut builder = CookieParam::builder()
            .name(self.name.clone())
            .value(self.value.clone());
        builder = match self.domain {
            Some(ref domain) => builder.domain(domain.clone()),
            None => builder.url(DEFAULT_COOKIE_URL),
        };
        if let Some(ref path) = self.path {
            builder = builder.path(path.clone());
        }
        if let Some(secure) = self.secure {
            builder = builder.secure(secure);
        }
        if let Some(http_only) = self.http_only {
            builder = builder.http_only(http_only);
        }
        if let Some(expires) = self.expires {
            builder = builder.expires(TimeSinceEpoch::new(expires));
        }
        builder.build()
    }
}

/// Read a JSON cookie export.
pub fn load_cookies(path: &Path) -> crate::Result<Vec<BrowserCookie>> {
    if !path.exists() {
        return Err(crate::Error::file_not_found(path));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// [`EmbedResolver`] driving headless Chromium.
#[derive(Debug, Clone)]
pub struct HeadlessBrowser {
    executable: Option<PathBuf>,
    cookies: Arc<Vec<BrowserCookie>>,
    timeout: Duration,
}

impl HeadlessBrowser {
    pub fn new(cookies: Vec<BrowserCookie>) -> Self {
        Self {
            executable: None,
            cookies: Arc::new(cookies),
            timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }

    /// Use a specific Chromium binary instead of auto-detection.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.len()
    }

    async fn run_session(&self, video_id: &str) -> Result<String, EmbedError> {
        let session = BrowserSession::launch(self.executable.as_deref()).await?;
        let result = self.extract(&session, video_id).await;
        session.close().await;
        result
    }

    async fn extract(&self, session: &BrowserSession, video_id: &str) -> Result<String, EmbedError> {
        let page = session.new_page().await?;

        if !self.cookies.is_empty() {
            let params = self
                .cookies
                .iter()
                .map(BrowserCookie::to_param)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| EmbedError::automation(Stage::Cookies, e))?;
            page.set_cookies(params)
                .await
                .map_err(|e| EmbedError::automation(Stage::Cookies, e.to_string()))?;
        }

        let url = youtube::watch_url(video_id);
        tracing::debug!(video_id, "Navigating to {}", url);
        page.goto(url)
            .await
            .map_err(|e| EmbedError::automation(Stage::Navigate, e.to_string()))?;

        let src: String = page
            .evaluate(FIRST_IFRAME_SRC)
            .await
            .map_err(|e| EmbedError::automation(Stage::Extract, e.to_string()))?
            .into_value()
            .map_err(|e| EmbedError::automation(Stage::Extract, e.to_string()))?;

        embed_src(&src).ok_or_else(|| EmbedError::NotFound(video_id.to_string()))
    }
}

/// Treat an empty or `about:` frame source as no frame at all.
fn embed_src(src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("about:") {
        None
    } else {
        Some(src.to_string())
    }
}

#[async_trait]
impl EmbedResolver for HeadlessBrowser {
    async fn resolve_embed_url(&self, video_id: &str) -> Result<String, EmbedError> {
        // On timeout the session future is dropped, which kills the browser.
        match tokio::time::timeout(self.timeout, self.run_session(video_id)).await {
            Ok(result) => result,
            Err(_) => Err(EmbedError::TimedOut {
                timeout: self.timeout,
            }),
        }
    }
}

/// One Chromium process plus the task pumping its DevTools events.
///
/// Dropping a session without calling [`BrowserSession::close`] still
/// kills the process and deletes the profile directory.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl BrowserSession {
    async fn launch(executable: Option<&Path>) -> Result<Self, EmbedError> {
        let profile = tempfile::Builder::new()
            .prefix("dakids-browser-")
            .tempdir()
            .map_err(|e| EmbedError::automation(Stage::Launch, e.to_string()))?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--mute-audio");
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| EmbedError::automation(Stage::Launch, e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EmbedError::automation(Stage::Launch, e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        tracing::debug!("Browser session started");
        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    async fn new_page(&self) -> Result<Page, EmbedError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| EmbedError::automation(Stage::Launch, e.to_string()))
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Browser wait failed: {}", e);
        }
        tracing::debug!("Browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
