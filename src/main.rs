mod cli;

use dakids::{
    config::{self, Config, Service},
    library::Library,
    proxy, server,
};
use dakids_resolve::{
    find_browser, get_tool_path, load_cookies, tools::YT_DLP, CredentialFile, HeadlessBrowser,
    YtDlp,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

async fn serve(config: Config) -> Result<()> {
    tracing::info!("Starting Dakids addon");

    let library = Library::load_or_empty(&config.server.library_path, config.addon.clone());

    // Held until shutdown; the file is deleted when this is dropped.
    let credentials = match config.tools.cookies.as_deref() {
        Some(blob) => Some(CredentialFile::write(blob).context("Failed to write yt-dlp cookies")?),
        None => None,
    };

    let program = get_tool_path(YT_DLP, config.tools.yt_dlp_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("{}; streams will fall back to external links", e);
        PathBuf::from(YT_DLP)
    });

    let mut ytdlp = YtDlp::new(program)
        .with_format(config.tools.yt_dlp_format.clone())
        .with_timeout(config.tools.yt_dlp_timeout());
    if let Some(ref creds) = credentials {
        ytdlp = ytdlp.with_cookies(creds.path());
    }

    match ytdlp.version().await {
        Ok(version) => tracing::info!("yt-dlp version detected: {}", version),
        Err(e) => tracing::error!("yt-dlp not found or not executable: {}", e),
    }

    let result = server::start_server(&config.server, library, Arc::new(ytdlp)).await;
    drop(credentials);
    result
}

async fn serve_proxy(config: Config) -> Result<()> {
    tracing::info!("Starting Dakids embed proxy");

    let cookies_path = &config.proxy.cookies_path;
    let cookies = if cookies_path.exists() {
        load_cookies(cookies_path)
            .with_context(|| format!("Failed to load cookies from {:?}", cookies_path))?
    } else {
        tracing::warn!("No cookie file at {:?}, browsing anonymously", cookies_path);
        Vec::new()
    };

    let mut browser = HeadlessBrowser::new(cookies).with_timeout(config.proxy.session_timeout());
    tracing::info!("Loaded {} browser cookies", browser.cookie_count());
    match find_browser(config.tools.browser_path.as_deref()) {
        Ok(path) => {
            tracing::info!("Using browser at {:?}", path);
            browser = browser.with_executable(path);
        }
        Err(e) => tracing::warn!("{}; relying on browser auto-detection", e),
    }

    proxy::start_proxy(&config.proxy, Arc::new(browser)).await
}

fn load_for(service: Service, config_path: Option<&Path>) -> Result<Config> {
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_env_overrides(&mut config, service)?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "dakids=trace,dakids_resolve=debug,dakids_common=debug,tower_http=debug".to_string()
        } else {
            "dakids=info,dakids_resolve=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            library,
        } => {
            let mut config = load_for(Service::Addon, cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(library) = library {
                config.server.library_path = library;
            }
            config::validate_config(&config)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(config))
        }
        Commands::Proxy {
            host,
            port,
            cookies,
        } => {
            let mut config = load_for(Service::Proxy, cli.config.as_deref())?;
            if let Some(host) = host {
                config.proxy.host = host;
            }
            if let Some(port) = port {
                config.proxy.port = port;
            }
            if let Some(cookies) = cookies {
                config.proxy.cookies_path = cookies;
            }
            config::validate_config(&config)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve_proxy(config))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("dakids {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = dakids_resolve::check_tools(
        config.tools.yt_dlp_path.as_deref(),
        config.tools.browser_path.as_deref(),
    );
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Streams fall back to YouTube links without yt-dlp, and /play needs Chromium.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Addon: {}:{}", config.server.host, config.server.port);
    println!("  Proxy: {}:{}", config.proxy.host, config.proxy.port);
    println!("  Catalog: {}", config.addon.catalog_id);

    let library = Library::load(&config.server.library_path, config.addon.clone())
        .with_context(|| "Episode list is not usable")?;
    println!(
        "✓ Episode list {:?}: {} episodes",
        config.server.library_path,
        library.len()
    );

    Ok(())
}
