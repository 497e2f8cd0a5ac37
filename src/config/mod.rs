mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables holding the yt-dlp cookie blob, in priority order.
pub const COOKIE_ENV_VARS: &[&str] = &["YTDLPCOOKIES", "YOUTUBECOOKIES"];

/// Which host a process is about to run. `PORT` applies to that one only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Addon,
    Proxy,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./dakids.toml",
        "./config.toml",
        "~/.config/dakids/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply `PORT` and the cookie variables on top of file configuration.
pub fn apply_env_overrides(config: &mut Config, service: Service) -> Result<()> {
    if let Some(port) = non_empty_var("PORT") {
        let port: u16 = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid PORT value: {:?}", port))?;
        match service {
            Service::Addon => config.server.port = port,
            Service::Proxy => config.proxy.port = port,
        }
    }

    if let Some(blob) = COOKIE_ENV_VARS.iter().find_map(|name| non_empty_var(name)) {
        config.tools.cookies = Some(blob);
    }

    validate_config(config)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.proxy.port == 0 {
        anyhow::bail!("Proxy port cannot be 0");
    }

    if config.tools.yt_dlp_timeout_secs == 0 {
        anyhow::bail!("yt-dlp timeout cannot be 0");
    }

    if config.proxy.session_timeout_secs == 0 {
        anyhow::bail!("Browser session timeout cannot be 0");
    }

    if config.addon.catalog_id.trim().is_empty() {
        anyhow::bail!("Catalog id cannot be empty");
    }

    if !config.server.library_path.exists() {
        tracing::warn!(
            "Episode list does not exist: {:?}",
            config.server.library_path
        );
    }

    Ok(())
}
