//! Landing page with the manifest link and a few episode previews.

use crate::server::AppContext;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Html,
};
use std::fmt::Write;

const PREVIEW_COUNT: usize = 6;

pub async fn home(State(ctx): State<AppContext>, headers: HeaderMap) -> Html<String> {
    let manifest_url = format!("{}/manifest.json", base_url(&headers));
    Html(render_home(&ctx, &manifest_url))
}

/// Public origin of the request, honouring a reverse proxy's scheme.
fn base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}")
}

fn render_home(ctx: &AppContext, manifest_url: &str) -> String {
    let addon = ctx.library.addon();
    let mut previews = String::new();
    for ep in ctx.library.episodes().iter().take(PREVIEW_COUNT) {
        let _ = write!(
            previews,
            r#"<div class="video-preview"><img src="{poster}" alt="{title}"><div class="video-title">{title}</div></div>"#,
            poster = escape_html(&ep.poster_or_thumbnail()),
            title = escape_html(&ep.title),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="it">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{name}</title>
  <style>
    body {{ font-family: sans-serif; background: linear-gradient(to bottom, #fffae3, #ffe4e1); color: #333; text-align: center; padding: 2rem; }}
    h1 {{ color: #ff6f61; }}
    code {{ background: #fffacd; padding: 0.3rem 0.6rem; border-radius: 8px; }}
    .video-preview {{ display: inline-block; margin: 1rem; border: 3px solid #ffd700; border-radius: 15px; overflow: hidden; width: 200px; background: white; }}
    .video-preview img {{ width: 100%; display: block; }}
    .video-title {{ padding: 0.5rem; background: #fffacd; }}
  </style>
</head>
<body>
  <h1>{name}</h1>
  <p>{description}</p>
  <p>Manifest: <code>{manifest}</code></p>
  <hr>
  <div>{previews}</div>
</body>
</html>
"#,
        name = escape_html(&addon.name),
        description = escape_html(&addon.description),
        manifest = escape_html(manifest_url),
        previews = previews,
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
