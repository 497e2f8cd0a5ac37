//! # dakids-resolve
//!
//! Adapters around the two external tools dakids depends on:
//!
//! - **yt-dlp** turns a YouTube id into a direct, inline-playable URL
//!   ([`DirectUrlResolver`], [`YtDlp`])
//! - **headless Chromium** finds an embeddable player frame for a video
//!   ([`EmbedResolver`], [`HeadlessBrowser`])
//!
//! Both are exposed as single-call traits so callers can substitute fakes.
//! Supporting pieces: tool detection, an async command builder with a
//! timeout, and the scoped cookie file handed to yt-dlp.
//!
//! ## Example
//!
//! ```no_run
//! use dakids_resolve::{DirectUrlResolver, YtDlp};
//!
//! # async fn example() -> dakids_resolve::Result<()> {
//! let ytdlp = YtDlp::default();
//! let url = ytdlp.resolve_direct_url("dQw4w9WgXcQ").await?;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod credentials;
pub mod direct;
pub mod embed;
mod error;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use credentials::CredentialFile;
pub use direct::{DirectUrlResolver, YtDlp};
pub use embed::{load_cookies, BrowserCookie, EmbedError, EmbedResolver, HeadlessBrowser, Stage};
pub use error::{Error, Result};
pub use tools::{check_tool, check_tools, find_browser, get_tool_path, require_tool, ToolInfo};
