//! Configuration model.
//!
//! Loaded from `~/.config/episode_planner/config.toml`; every section is
//! optional and falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matching and confidence thresholds.
    pub thresholds: MatchThresholds,
    /// Planning mode flags.
    pub modes: PlanModes,
    /// Disambiguation assistant settings.
    pub assistant: AssistantSettings,
    /// Ollama overrides.
    pub ollama: OllamaSection,
    /// TMDB overrides.
    pub tmdb: TmdbSection,
    /// Files resolved concurrently.
    pub concurrency: Concurrency,
}

/// Numeric policy of the matcher and the confidence policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Fuzzy score accepted even with near competitors.
    pub fuzzy_strong: f32,
    /// Fuzzy score accepted when no competitor is within the tie window.
    pub fuzzy_accept: f32,
    /// Competitors closer than this to the best score count as ties.
    pub tie_window: f32,
    /// Score given to substring and token-overlap matches.
    pub substring_score: f32,
    /// Share of segment content tokens a title must contain.
    pub token_overlap_ratio: f32,
    /// Score each half of an internal split must clear.
    pub split_threshold: f32,
    /// Score given to rare-noun matches.
    pub rare_noun_score: f32,
    /// Minimum confidence an assistant suggestion needs.
    pub assistant_min: f32,
    /// Confidence at or above which an item is AUTO.
    pub auto_min: f32,
    /// Confidence below which an item is "unsupported/no match".
    pub manual_min: f32,
    /// Duration pairing confidence when the runtime agrees.
    pub duration_match: f32,
    /// Duration pairing confidence otherwise.
    pub duration_mismatch: f32,
    /// Minutes of tolerance between file duration and runtime.
    pub duration_tolerance: u32,
    /// Declared number used for a file with no title at all.
    pub declared_untitled: f32,
    /// Declared number used after the title failed to match.
    pub declared_titled: f32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            fuzzy_strong: 0.85,
            fuzzy_accept: 0.75,
            tie_window: 0.05,
            substring_score: 0.70,
            token_overlap_ratio: 0.5,
            split_threshold: 0.70,
            rare_noun_score: 0.65,
            assistant_min: 0.80,
            auto_min: 0.75,
            manual_min: 0.40,
            duration_match: 0.9,
            duration_mismatch: 0.6,
            duration_tolerance: 1,
            declared_untitled: 0.80,
            declared_titled: 0.50,
        }
    }
}

/// Mode flags normally set from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanModes {
    /// Files may contain several episodes.
    pub anthology: bool,
    /// Ignore titles in file names.
    pub untrusted_titles: bool,
    /// Maximum runtime of one physical file, in minutes.
    pub max_duration: Option<u32>,
}

/// Assistant settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub enabled: bool,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: 30,
        }
    }
}

impl AssistantSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Ollama overrides; unset fields fall back to the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSection {
    pub host: Option<String>,
    pub model: Option<String>,
}

/// TMDB overrides; unset fields fall back to the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbSection {
    pub language: Option<String>,
}

/// Number of files resolved concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Concurrency(pub usize);

impl Default for Concurrency {
    fn default() -> Self {
        Self(4)
    }
}

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("episode_planner")
}

/// Load configuration from file.
pub fn load_config() -> Config {
    let config_path = config_dir().join("config.toml");

    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match parse_config(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring invalid config {:?}: {}", config_path, e),
            },
            Err(e) => tracing::warn!("Cannot read config {:?}: {}", config_path, e),
        }
    }

    Config::default()
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> crate::Result<Config> {
    Ok(toml::from_str(content)?)
}
