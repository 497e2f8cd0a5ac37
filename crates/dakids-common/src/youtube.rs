//! YouTube URL construction.

/// Public watch page for a video.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// High quality thumbnail used when an episode has no poster of its own.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")
}

/// Whether `id` looks like a video identifier.
///
/// YouTube ids are 11 characters today; anything made of URL-safe base64
/// characters up to 64 long is accepted so older or future formats still
/// pass through.
pub fn is_valid_video_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
