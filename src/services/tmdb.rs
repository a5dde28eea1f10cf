//! TMDB API client.
//!
//! Used as a catalog provider: searches the show by name, then lists the
//! episodes (with runtimes) of the requested season.

use super::provider::CatalogProvider;
use crate::core::text::normalize;
use crate::models::catalog::{RawEpisode, RawValue};
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API key or Bearer token (JWT)
    pub api_key: String,
    pub language: String,
    /// Whether to use Bearer token authentication (API v4 style)
    pub use_bearer: bool,
}

impl TmdbConfig {
    /// Create config from environment variables.
    /// Supports both API key (v3) and Bearer token (v4) formats.
    ///
    /// - `TMDB_API_KEY`: required
    /// - `TMDB_LANGUAGE`: episode title language (default: en-US)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TMDB_API_KEY")
            .map_err(|_| crate::Error::TmdbApiKeyMissing)?;

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        let language = std::env::var("TMDB_LANGUAGE")
            .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            api_key,
            language,
            use_bearer,
        })
    }

    pub fn with_language(mut self, language: Option<&str>) -> Self {
        if let Some(language) = language {
            self.language = language.to_string();
        }
        self
    }
}

/// TMDB API client.
pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
    show_ids: Mutex<HashMap<String, u64>>,
}

/// TV show search result.
#[derive(Debug, Deserialize)]
pub struct TvSearchResult {
    pub results: Vec<TvSearchItem>,
}

/// TV show search item.
#[derive(Debug, Deserialize)]
pub struct TvSearchItem {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
}

/// Season details.
#[derive(Debug, Deserialize)]
pub struct SeasonDetails {
    pub id: u64,
    pub name: String,
    pub season_number: u16,
    pub episodes: Vec<EpisodeInfo>,
}

/// Episode info within a season.
#[derive(Debug, Deserialize)]
pub struct EpisodeInfo {
    pub id: u64,
    pub name: String,
    pub episode_number: u16,
    pub season_number: u16,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
}

impl From<&EpisodeInfo> for RawEpisode {
    fn from(info: &EpisodeInfo) -> Self {
        RawEpisode {
            season: Some(RawValue::Int(info.season_number.into())),
            episode: Some(RawValue::Int(info.episode_number.into())),
            title: Some(info.name.clone()),
            runtime: info.runtime.map(RawValue::from),
        }
    }
}

/// Pick the search result whose name matches `query`, else the first.
pub fn best_match<'a>(query: &str, results: &'a [TvSearchItem]) -> Option<&'a TvSearchItem> {
    let wanted = normalize(query);
    results
        .iter()
        .find(|item| normalize(&item.name) == wanted || normalize(&item.original_name) == wanted)
        .or_else(|| results.first())
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            config,
            client,
            show_ids: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new TMDB client from environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(TmdbConfig::from_env()?))
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.config.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.config.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.config.use_bearer {
            format!(
                "{}/{}?language={}{}",
                TMDB_BASE_URL,
                path,
                self.config.language,
                extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                TMDB_BASE_URL,
                path,
                self.config.api_key,
                self.config.language,
                extra_params
            )
        }
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.config.use_bearer {
            format!("{}/authentication", TMDB_BASE_URL)
        } else {
            format!(
                "{}/authentication?api_key={}",
                TMDB_BASE_URL, self.config.api_key
            )
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Search for TV shows.
    pub async fn search_tv(&self, query: &str) -> Result<Vec<TvSearchItem>> {
        let url = self.build_url("search/tv", &format!("&query={}", urlencoding::encode(query)));
        let resp: TvSearchResult = self.build_request(&url).send().await?.json().await?;
        Ok(resp.results)
    }

    /// Get season details.
    pub async fn get_season_details(&self, tv_id: u64, season_number: u32) -> Result<SeasonDetails> {
        let url = self.build_url(&format!("tv/{}/season/{}", tv_id, season_number), "");
        let resp = self
            .build_request(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }

    /// TMDB id of a show, searched once per name.
    async fn show_id(&self, show: &str) -> Result<u64> {
        let key = normalize(show);
        if let Some(id) = self.show_ids.lock().ok().and_then(|ids| ids.get(&key).copied()) {
            return Ok(id);
        }

        let results = self.search_tv(show).await?;
        let item = best_match(show, &results).ok_or_else(|| crate::Error::ShowNotFound(show.to_string()))?;
        tracing::debug!("TMDB: {:?} -> {} ({})", show, item.name, item.id);

        if let Ok(mut ids) = self.show_ids.lock() {
            ids.insert(key, item.id);
        }
        Ok(item.id)
    }
}

#[async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "TMDB"
    }

    async fn fetch_season(&self, show: &str, season: u32) -> Result<Vec<RawEpisode>> {
        let id = self.show_id(show).await?;
        let details = self.get_season_details(id, season).await?;
        Ok(details.episodes.iter().map(RawEpisode::from).collect())
    }
}
