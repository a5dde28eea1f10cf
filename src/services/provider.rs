//! Catalog providers and the fallback chain.
//!
//! Providers are tried in order; the first one that yields a non-empty
//! season after normalization wins. Results are cached per show and
//! season for the lifetime of the resolver.

use crate::core::catalog::normalize_catalog;
use crate::models::catalog::{show_key, Catalog, CatalogSet, RawEpisode};
use crate::models::media::ScannedFile;
use crate::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// A source of raw episode listings.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Raw episodes of one season of `show`.
    async fn fetch_season(&self, show: &str, season: u32) -> Result<Vec<RawEpisode>>;
}

/// Walks providers in order and caches the outcome.
pub struct CatalogResolver {
    providers: Vec<Box<dyn CatalogProvider>>,
    cache: HashMap<(String, u32), Option<Catalog>>,
}

impl CatalogResolver {
    pub fn new(providers: Vec<Box<dyn CatalogProvider>>) -> Self {
        Self {
            providers,
            cache: HashMap::new(),
        }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fetch one season, trying each provider until one has data.
    pub async fn fetch_catalog(&mut self, show: &str, season: u32) -> Result<Catalog> {
        let key = (show_key(show), season);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone().ok_or_else(|| crate::Error::NoCanonicalData {
                show: show.to_string(),
                season,
            });
        }

        let mut found = None;
        for provider in &self.providers {
            let raw = match provider.fetch_season(show, season).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("{} has no data for {} season {}: {}", provider.name(), show, season, e);
                    continue;
                }
            };
            match normalize_catalog(show, season, &raw) {
                Ok(catalog) => {
                    tracing::info!(
                        "Loaded {} episodes of {} season {} from {}",
                        catalog.season(season).len(),
                        show,
                        season,
                        provider.name()
                    );
                    found = Some(catalog);
                    break;
                }
                Err(e) => {
                    tracing::debug!("{}: {}", provider.name(), e);
                }
            }
        }

        self.cache.insert(key, found.clone());
        found.ok_or_else(|| crate::Error::NoCanonicalData {
            show: show.to_string(),
            season,
        })
    }

    /// Fetch every (show, season) the scanned files refer to.
    ///
    /// Missing seasons are left out; the planner reports them.
    pub async fn resolve_all(&mut self, files: &[ScannedFile]) -> CatalogSet {
        let wanted: BTreeSet<(String, u32)> = files
            .iter()
            .filter(|f| !f.show.is_empty())
            .map(|f| (f.show.clone(), f.season()))
            .collect();

        let mut catalogs = CatalogSet::new();
        for (show, season) in wanted {
            match self.fetch_catalog(&show, season).await {
                Ok(catalog) => catalogs.insert(catalog),
                Err(e) => tracing::warn!("{}", e),
            }
        }
        catalogs
    }
}
