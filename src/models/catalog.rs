//! Canonical episode catalog model.
//!
//! `RawEpisode` is what a metadata provider hands over; `CanonicalEpisode`
//! and `Catalog` are what the engine works with after normalization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A loosely typed provider value (season, episode number, runtime).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v.into())
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Int(v.into())
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Episode row as delivered by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEpisode {
    /// Season number, possibly a string.
    #[serde(default, alias = "season_number")]
    pub season: Option<RawValue>,
    /// Episode number, possibly a string.
    #[serde(default, alias = "episode_number")]
    pub episode: Option<RawValue>,
    /// Episode title.
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    /// Runtime in minutes, possibly a string like "22 min".
    #[serde(default)]
    pub runtime: Option<RawValue>,
}

impl RawEpisode {
    pub fn new(
        season: impl Into<RawValue>,
        episode: impl Into<RawValue>,
        title: &str,
        runtime: Option<RawValue>,
    ) -> Self {
        Self {
            season: Some(season.into()),
            episode: Some(episode.into()),
            title: Some(title.to_string()),
            runtime,
        }
    }
}

/// Authoritative episode record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEpisode {
    pub season: u32,
    pub episode: u32,
    pub title: String,
    /// Runtime in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
}

impl CanonicalEpisode {
    pub fn new(season: u32, episode: u32, title: &str, runtime: Option<u32>) -> Self {
        Self {
            season,
            episode,
            title: title.to_string(),
            runtime,
        }
    }
}

/// The ordered, de-duplicated episode list of one show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub show: String,
    episodes: Vec<CanonicalEpisode>,
}

impl Catalog {
    /// Build a catalog, sorting by (season, episode) and keeping the first
    /// occurrence of every pair.
    pub fn from_episodes(show: &str, episodes: Vec<CanonicalEpisode>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut episodes: Vec<_> = episodes
            .into_iter()
            .filter(|e| seen.insert((e.season, e.episode)))
            .collect();
        episodes.sort_by_key(|e| (e.season, e.episode));
        Self {
            show: show.to_string(),
            episodes,
        }
    }

    /// Add another fetch of the same show (e.g. a further season).
    pub fn merge(&mut self, other: Catalog) {
        let mut all = std::mem::take(&mut self.episodes);
        all.extend(other.episodes);
        *self = Catalog::from_episodes(&self.show, all);
    }

    pub fn episodes(&self) -> &[CanonicalEpisode] {
        &self.episodes
    }

    /// Episodes of one season, in episode order.
    pub fn season(&self, season: u32) -> &[CanonicalEpisode] {
        let start = self.episodes.partition_point(|e| e.season < season);
        let end = self.episodes.partition_point(|e| e.season <= season);
        &self.episodes[start..end]
    }

    pub fn get(&self, season: u32, episode: u32) -> Option<&CanonicalEpisode> {
        self.season(season).iter().find(|e| e.episode == episode)
    }

    pub fn seasons(&self) -> Vec<u32> {
        let mut seasons: Vec<u32> = self.episodes.iter().map(|e| e.season).collect();
        seasons.dedup();
        seasons
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }
}

/// Key used to look shows up regardless of case and punctuation.
pub fn show_key(show: &str) -> String {
    show.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Catalogs for every show in a planning run.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    shows: BTreeMap<String, Catalog>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a catalog, merging with an existing one for the same show.
    pub fn insert(&mut self, catalog: Catalog) {
        match self.shows.get_mut(&show_key(&catalog.show)) {
            Some(existing) => existing.merge(catalog),
            None => {
                self.shows.insert(show_key(&catalog.show), catalog);
            }
        }
    }

    pub fn get(&self, show: &str) -> Option<&Catalog> {
        self.shows.get(&show_key(show))
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }
}

impl From<Catalog> for CatalogSet {
    fn from(catalog: Catalog) -> Self {
        let mut set = CatalogSet::new();
        set.insert(catalog);
        set
    }
}
