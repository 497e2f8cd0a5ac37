//! The episode library behind the catalog.
//!
//! A [`Library`] is built once at startup from the episode list and shared
//! read-only by every handler. It answers the manifest, the channel
//! catalog, catalog search and episode lookups.

use std::path::Path;

use chrono::NaiveDate;
use dakids_common::{CatalogDescriptor, CatalogExtra, Episode, Error, Manifest, MetaPreview, Result};

use crate::config::AddonConfig;

/// Content type of every catalog item.
pub const CHANNEL_TYPE: &str = "channel";

/// Prefix of addon-facing episode ids.
pub const ID_PREFIX: &str = "dk";

const DEFAULT_GENRES: [&str; 2] = ["Animation", "Kids"];
const DEFAULT_DESCRIPTION: &str = "Nessuna descrizione";

/// Immutable episode list plus the addon identity.
#[derive(Debug, Clone)]
pub struct Library {
    episodes: Vec<Episode>,
    addon: AddonConfig,
}

impl Library {
    /// Build a library, dropping entries without a source id and filling
    /// missing ids. Order is preserved.
    pub fn new(episodes: Vec<Episode>, addon: AddonConfig) -> Self {
        let episodes = episodes
            .into_iter()
            .filter_map(|mut ep| {
                if ep.youtube_source_id.trim().is_empty() {
                    tracing::warn!("Skipping episode {:?} without a youtubeId", ep.title);
                    return None;
                }
                if ep.id.trim().is_empty() {
                    ep.id = format!("{ID_PREFIX}{}", ep.youtube_source_id);
                }
                Some(ep)
            })
            .collect();

        Self { episodes, addon }
    }

    /// A library with no episodes.
    pub fn empty(addon: AddonConfig) -> Self {
        Self::new(Vec::new(), addon)
    }

    /// Read the episode list from a JSON array on disk.
    pub fn load(path: &Path, addon: AddonConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let episodes: Vec<Episode> =
            serde_json::from_str(&content).map_err(|e| Error::parse(path, e))?;
        Ok(Self::new(episodes, addon))
    }

    /// Like [`Library::load`], but a missing or broken file yields an empty
    /// library instead of an error.
    pub fn load_or_empty(path: &Path, addon: AddonConfig) -> Self {
        match Self::load(path, addon.clone()) {
            Ok(library) => {
                tracing::info!("Loaded {} episodes from {:?}", library.len(), path);
                library
            }
            Err(e) => {
                tracing::error!("Episode list unavailable, serving an empty catalog: {}", e);
                Self::empty(addon)
            }
        }
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn addon(&self) -> &AddonConfig {
        &self.addon
    }

    /// Whether `id` names the channel catalog.
    pub fn is_channel(&self, id: &str) -> bool {
        id == self.addon.catalog_id
    }

    /// Find an episode by id, with or without the `dk` prefix.
    pub fn find_episode(&self, id: &str) -> Option<&Episode> {
        self.episodes.iter().find(|ep| {
            ep.id == id
                || format!("{ID_PREFIX}{}", ep.id) == id
                || id.strip_prefix(ID_PREFIX) == Some(ep.youtube_source_id.as_str())
        })
    }

    pub fn manifest(&self) -> Manifest {
        Manifest {
            id: self.addon.id.clone(),
            version: self.addon.version.clone(),
            name: self.addon.name.clone(),
            description: self.addon.description.clone(),
            logo: self.addon.logo.clone(),
            background: self.addon.background.clone(),
            resources: vec!["catalog".to_string(), "stream".to_string()],
            types: vec![CHANNEL_TYPE.to_string()],
            id_prefixes: vec![ID_PREFIX.to_string()],
            catalogs: vec![CatalogDescriptor {
                content_type: CHANNEL_TYPE.to_string(),
                id: self.addon.catalog_id.clone(),
                name: self.addon.catalog_name.clone(),
                extra: vec![CatalogExtra {
                    name: "search".to_string(),
                    is_required: false,
                }],
            }],
        }
    }

    /// The single channel entry, posted with the first episode's poster.
    pub fn catalog(&self) -> Vec<MetaPreview> {
        let poster = self
            .episodes
            .first()
            .and_then(|ep| ep.poster.clone())
            .unwrap_or_default();

        vec![MetaPreview {
            id: self.addon.catalog_id.clone(),
            content_type: CHANNEL_TYPE.to_string(),
            name: self.addon.catalog_name.clone(),
            poster,
            description: Some(self.addon.description.clone()),
            released: None,
            runtime: None,
            genres: Vec::new(),
        }]
    }

    /// Episodes whose title contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<MetaPreview> {
        let needle = query.trim().to_lowercase();
        self.episodes
            .iter()
            .filter(|ep| needle.is_empty() || ep.title.to_lowercase().contains(&needle))
            .map(episode_meta)
            .collect()
    }
}

fn episode_meta(ep: &Episode) -> MetaPreview {
    MetaPreview {
        id: ep.id.clone(),
        content_type: CHANNEL_TYPE.to_string(),
        name: ep.title.clone(),
        poster: ep.poster_or_thumbnail(),
        description: Some(
            ep.description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        ),
        released: ep.released.as_deref().map(format_release_date),
        runtime: ep
            .runtime
            .as_deref()
            .map(|r| format!("{} min", duration_to_minutes(r).floor() as u64)),
        genres: ep
            .genres
            .clone()
            .unwrap_or_else(|| DEFAULT_GENRES.iter().map(|g| g.to_string()).collect()),
    }
}

/// Convert `H:MM:SS`, `MM:SS` or `M` into minutes. Anything else is 0.
pub fn duration_to_minutes(duration: &str) -> f64 {
    let parts: Option<Vec<f64>> = duration
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect();

    match parts.as_deref() {
        Some([h, m, s]) => h * 60.0 + m + s / 60.0,
        Some([m, s]) => m + s / 60.0,
        Some([m]) => *m,
        _ => 0.0,
    }
}

/// Render `YYYYMMDD` as `YYYY-MM-DD`; other input passes through unchanged.
pub fn format_release_date(date: &str) -> String {
    NaiveDate::parse_from_str(date.trim(), "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| date.to_string())
}
