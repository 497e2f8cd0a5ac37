//! External tool detection and management.

use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable name of the direct-URL resolver.
pub const YT_DLP: &str = "yt-dlp";

/// Executable names tried, in order, when no browser path is configured.
pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

impl ToolInfo {
    fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        }
    }
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use dakids_resolve::check_tool;
///
/// let info = check_tool("yt-dlp");
/// if info.available {
///     println!("yt-dlp version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_at(name, Path::new(name))
}

/// Check a tool found at an explicit path.
pub fn check_tool_at(name: &str, program: &Path) -> ToolInfo {
    let result = Command::new(program).arg("--version").output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.trim().to_string());

            let path = which::which(program).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo::missing(name),
    }
}

/// Check yt-dlp and the headless browser.
///
/// Configured paths take precedence over `PATH` lookup.
pub fn check_tools(yt_dlp: Option<&Path>, browser: Option<&Path>) -> Vec<ToolInfo> {
    let yt_dlp_info = match yt_dlp {
        Some(path) => check_tool_at(YT_DLP, path),
        None => check_tool(YT_DLP),
    };

    let browser_info = match find_browser(browser) {
        Ok(path) => check_tool_at("chromium", &path),
        Err(_) => ToolInfo::missing("chromium"),
    };

    vec![yt_dlp_info, browser_info]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!("Configured path for {} does not exist: {:?}", name, path);
    }

    require_tool(name)
}

/// Locate a Chromium-family browser.
pub fn find_browser(config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!("Configured browser path does not exist: {:?}", path);
    }

    BROWSER_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| Error::tool_not_found("chromium"))
}
