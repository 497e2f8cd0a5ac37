//! Core type definitions for episodes, streams and the addon protocol.
//!
//! Wire types serialize in camelCase to match what addon clients expect.

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

use crate::youtube;

/// Title shown for episodes that carry none.
pub const DEFAULT_TITLE: &str = "Video";

/// Suffix appended to the title of a stream that only opens externally.
pub const EXTERNAL_HINT: &str = " (Apri su YouTube)";

/// A single playlist entry.
///
/// Episodes are loaded once at startup and never mutated. On disk the
/// title key is `name` (`title` is accepted as well) and the source id
/// key is `youtubeId`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Addon-facing identifier. Filled from the source id when absent.
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_title", alias = "title", rename = "name")]
    pub title: String,
    /// YouTube video id.
    #[serde(default, rename = "youtubeId")]
    pub youtube_source_id: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Duration as `H:MM:SS`, `MM:SS` or plain minutes.
    #[serde(default)]
    pub runtime: Option<String>,
    /// Upload date as `YYYYMMDD`.
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub channel: Option<String>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Episode {
    /// Create an episode with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        youtube_source_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            youtube_source_id: youtube_source_id.into(),
            poster: None,
            description: None,
            runtime: None,
            released: None,
            genres: None,
            channel: None,
        }
    }

    /// Set the poster URL.
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Poster URL, falling back to the video thumbnail.
    pub fn poster_or_thumbnail(&self) -> String {
        match self.poster.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => youtube::thumbnail_url(&self.youtube_source_id),
        }
    }
}

/// One playable-or-external-link record for a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEntry {
    /// A direct URL the client can play inline.
    Resolved {
        title: String,
        url: String,
        binge_group: Option<String>,
    },
    /// Only an external page is available.
    Unresolved { title: String, external_url: String },
}

impl StreamEntry {
    /// Build a resolved entry for `source_id` with the raw title.
    pub fn resolved(title: &str, url: impl Into<String>, source_id: &str) -> Self {
        Self::Resolved {
            title: title.to_string(),
            url: url.into(),
            binge_group: Some(source_id.to_string()),
        }
    }

    /// Build the fallback entry pointing at the public watch page.
    pub fn unresolved(title: &str, source_id: &str) -> Self {
        Self::Unresolved {
            title: format!("{title}{EXTERNAL_HINT}"),
            external_url: youtube::watch_url(source_id),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Resolved { title, .. } | Self::Unresolved { title, .. } => title,
        }
    }

    /// Whether the client can play this entry without leaving the app.
    pub fn playable_inline(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StreamWire<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_url: Option<&'a str>,
    behavior_hints: BehaviorHintsWire<'a>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct BehaviorHintsWire<'a> {
    not_web_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    binge_group: Option<&'a str>,
}

impl Serialize for StreamEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Resolved {
                title,
                url,
                binge_group,
            } => StreamWire {
                title,
                url: Some(url),
                external_url: None,
                behavior_hints: BehaviorHintsWire {
                    not_web_ready: false,
                    binge_group: binge_group.as_deref(),
                },
            },
            Self::Unresolved {
                title,
                external_url,
            } => StreamWire {
                title,
                url: None,
                external_url: Some(external_url),
                behavior_hints: BehaviorHintsWire {
                    not_web_ready: true,
                    binge_group: None,
                },
            },
        };
        wire.serialize(serializer)
    }
}

/// Static descriptor of the addon's identity and capabilities.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub id_prefixes: Vec<String>,
    pub catalogs: Vec<CatalogDescriptor>,
}

/// A browsable collection declared in the manifest.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub content_type: String,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<CatalogExtra>,
}

/// An optional or required catalog query parameter.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExtra {
    pub name: String,
    pub is_required: bool,
}

/// Summary record for one catalog entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

/// Body of a catalog response.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

/// Body of a stream response.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StreamResponse {
    pub streams: Vec<StreamEntry>,
}
