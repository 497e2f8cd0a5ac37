//! Concurrent stream resolution with per-episode fallback.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dakids_common::{Episode, StreamEntry};
use dakids_resolve::DirectUrlResolver;
use futures::future::join_all;
use futures::FutureExt;

/// Resolves episodes into stream entries through a [`DirectUrlResolver`].
#[derive(Clone)]
pub struct StreamResolver {
    resolver: Arc<dyn DirectUrlResolver>,
}

impl StreamResolver {
    pub fn new(resolver: Arc<dyn DirectUrlResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve every episode concurrently.
    ///
    /// The result has one entry per episode, in input order. Lookups are
    /// polled together inside the caller's future, so dropping it cancels
    /// every pending lookup and kills its yt-dlp process. An error or panic
    /// in one lookup only turns that episode into an external link.
    pub async fn resolve_streams(&self, episodes: &[Episode]) -> Vec<StreamEntry> {
        join_all(episodes.iter().map(|ep| self.resolve_one(ep))).await
    }

    /// Resolve a single episode.
    pub async fn resolve_one(&self, episode: &Episode) -> StreamEntry {
        match AssertUnwindSafe(resolve_episode(self.resolver.as_ref(), episode))
            .catch_unwind()
            .await
        {
            Ok(entry) => entry,
            Err(_) => {
                tracing::error!(episode = %episode.id, "Stream resolution panicked");
                StreamEntry::unresolved(&episode.title, &episode.youtube_source_id)
            }
        }
    }
}

async fn resolve_episode(resolver: &dyn DirectUrlResolver, ep: &Episode) -> StreamEntry {
    match resolver.resolve_direct_url(&ep.youtube_source_id).await {
        Ok(url) if !url.trim().is_empty() => {
            StreamEntry::resolved(&ep.title, url.trim(), &ep.youtube_source_id)
        }
        Ok(_) => {
            tracing::warn!(episode = %ep.id, "Resolver returned an empty URL, falling back");
            StreamEntry::unresolved(&ep.title, &ep.youtube_source_id)
        }
        Err(e) => {
            tracing::warn!(episode = %ep.id, "Direct URL unavailable, falling back: {}", e);
            StreamEntry::unresolved(&ep.title, &ep.youtube_source_id)
        }
    }
}
