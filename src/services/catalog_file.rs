//! JSON file catalog provider.
//!
//! Accepts either a bare list of episode rows or an object carrying the
//! show name:
//!
//! ```json
//! { "show": "Paw Patrol", "episodes": [{ "season": 1, "episode": 1, "title": "Pups Make a Splash", "runtime": 11 }] }
//! ```

use super::provider::CatalogProvider;
use crate::models::catalog::{show_key, RawEpisode};
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<RawEpisode>),
    Show {
        #[serde(default)]
        show: Option<String>,
        episodes: Vec<RawEpisode>,
    },
}

/// Episode rows loaded from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileCatalogProvider {
    path: PathBuf,
    show: Option<String>,
    episodes: Vec<RawEpisode>,
}

impl FileCatalogProvider {
    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut provider = Self::from_json(&content)
            .map_err(|e| crate::Error::MalformedCatalog(format!("{}: {}", path.display(), e)))?;
        provider.path = path.to_path_buf();
        Ok(provider)
    }

    /// Parse catalog JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        let (show, episodes) = match serde_json::from_str(content)? {
            CatalogDocument::List(episodes) => (None, episodes),
            CatalogDocument::Show { show, episodes } => (show, episodes),
        };
        tracing::debug!("Catalog file holds {} rows", episodes.len());
        Ok(Self {
            path: PathBuf::new(),
            show,
            episodes,
        })
    }

    /// Show name recorded in the file, if any.
    pub fn show(&self) -> Option<&str> {
        self.show.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogProvider for FileCatalogProvider {
    fn name(&self) -> &str {
        "catalog file"
    }

    async fn fetch_season(&self, show: &str, _season: u32) -> Result<Vec<RawEpisode>> {
        // A file naming a different show has nothing for this one.
        if let Some(own) = &self.show {
            if show_key(own) != show_key(show) {
                return Err(crate::Error::ShowNotFound(show.to_string()));
            }
        }
        Ok(self.episodes.clone())
    }
}
