//! Direct playback URL resolution through yt-dlp.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use dakids_common::youtube;

use crate::command::{ToolCommand, DEFAULT_TIMEOUT};
use crate::tools::YT_DLP;
use crate::{Error, Result};

/// Format selector asking for a single progressive MP4 stream.
pub const DEFAULT_FORMAT: &str = "best[ext=mp4]";

/// Capability that turns a source id into a directly playable URL.
#[async_trait]
pub trait DirectUrlResolver: Send + Sync {
    /// Resolve `source_id` to a URL a player can open inline.
    async fn resolve_direct_url(&self, source_id: &str) -> Result<String>;
}

/// [`DirectUrlResolver`] backed by the yt-dlp CLI.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    format: String,
    timeout: Duration,
    cookies: Option<PathBuf>,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            format: DEFAULT_FORMAT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cookies: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pass `--cookies <path>` on every call.
    pub fn with_cookies(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookies = Some(path.into());
        self
    }

    /// Arguments for resolving `source_id`.
    pub fn args_for(&self, source_id: &str) -> Vec<String> {
        let mut args = vec![
            youtube::watch_url(source_id),
            "-f".to_string(),
            self.format.clone(),
            "-g".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];
        if let Some(ref cookies) = self.cookies {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().to_string());
        }
        args
    }

    /// Report the installed yt-dlp version.
    pub async fn version(&self) -> Result<String> {
        let output = ToolCommand::new(self.program.clone())
            .arg("--version")
            .timeout(Duration::from_secs(10))
            .execute()
            .await?;
        Ok(output.stdout.trim().to_string())
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new(YT_DLP)
    }
}

/// First non-empty line of `-g` output.
///
/// Formats that need merging print one URL per stream; the first one is
/// the video track.
fn first_url(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}

#[async_trait]
impl DirectUrlResolver for YtDlp {
    async fn resolve_direct_url(&self, source_id: &str) -> Result<String> {
        let output = ToolCommand::new(self.program.clone())
            .args(self.args_for(source_id))
            .timeout(self.timeout)
            .execute()
            .await?;

        match first_url(&output.stdout) {
            Some(url) => {
                tracing::debug!(source_id, "yt-dlp resolved direct URL");
                Ok(url.to_string())
            }
            None => Err(Error::NoUrl {
                tool: YT_DLP.to_string(),
                id: source_id.to_string(),
            }),
        }
    }
}
