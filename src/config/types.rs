use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub addon: AddonConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Catalog and stream host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Episode list, read once at startup
    #[serde(default = "default_library_path")]
    pub library_path: PathBuf,
}

/// Embed proxy host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_proxy_port")]
    pub port: u16,

    /// Browser cookie export, read once at startup
    #[serde(default = "default_cookies_path")]
    pub cookies_path: PathBuf,

    /// Budget for one browser session in seconds (default: 45)
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,
}

impl ProxyConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

/// Identity advertised in the manifest and the channel catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    /// Installed addons are keyed on this id; changing it makes a new addon.
    #[serde(default = "default_addon_id")]
    pub id: String,

    /// Manifest version, independent of the crate version
    #[serde(default = "default_addon_version")]
    pub version: String,

    #[serde(default = "default_addon_name")]
    pub name: String,

    #[serde(default = "default_addon_description")]
    pub description: String,

    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub background: Option<String>,

    /// Id of the single channel catalog
    #[serde(default = "default_catalog_id")]
    pub catalog_id: String,

    #[serde(default = "default_catalog_name")]
    pub catalog_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,

    /// yt-dlp format selector
    #[serde(default = "default_yt_dlp_format")]
    pub yt_dlp_format: String,

    /// Per-call yt-dlp timeout in seconds (default: 60)
    #[serde(default = "default_yt_dlp_timeout")]
    pub yt_dlp_timeout_secs: u64,

    #[serde(default)]
    pub browser_path: Option<PathBuf>,

    /// Netscape cookie blob for yt-dlp. Only taken from the environment.
    #[serde(skip)]
    pub cookies: Option<String>,
}

impl ToolsConfig {
    pub fn yt_dlp_timeout(&self) -> Duration {
        Duration::from_secs(self.yt_dlp_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_server_port() -> u16 {
    3000
}
fn default_proxy_port() -> u16 {
    4000
}
fn default_library_path() -> PathBuf {
    PathBuf::from("./meta.json")
}
fn default_cookies_path() -> PathBuf {
    PathBuf::from("./cookies.json")
}
fn default_session_timeout() -> u64 {
    45
}
fn default_addon_id() -> String {
    "com.dakids.Stremio".to_string()
}
fn default_addon_version() -> String {
    "3.0.0".to_string()
}
fn default_addon_name() -> String {
    "Dakids".to_string()
}
fn default_addon_description() -> String {
    "Video per bambini - riproduzione diretta da YouTube".to_string()
}
fn default_catalog_id() -> String {
    "dakids".to_string()
}
fn default_catalog_name() -> String {
    "Cartoni per Bambini".to_string()
}
fn default_yt_dlp_format() -> String {
    dakids_resolve::direct::DEFAULT_FORMAT.to_string()
}
fn default_yt_dlp_timeout() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_server_port(),
            library_path: default_library_path(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_proxy_port(),
            cookies_path: default_cookies_path(),
            session_timeout_secs: default_session_timeout(),
        }
    }
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: default_addon_id(),
            version: default_addon_version(),
            name: default_addon_name(),
            description: default_addon_description(),
            logo: None,
            background: None,
            catalog_id: default_catalog_id(),
            catalog_name: default_catalog_name(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: None,
            yt_dlp_format: default_yt_dlp_format(),
            yt_dlp_timeout_secs: default_yt_dlp_timeout(),
            browser_path: None,
            cookies: None,
        }
    }
}
