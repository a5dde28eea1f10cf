//! Error types for the episode planner.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the episode planner.
#[derive(Error, Debug)]
pub enum Error {
    // Preflight errors
    #[error("ffprobe not found. Install FFmpeg: sudo apt install ffmpeg")]
    FfprobeNotFound,

    #[error("TMDB API key not configured. Set TMDB_API_KEY environment variable")]
    TmdbApiKeyMissing,

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    // Catalog errors
    #[error("No canonical data for {show} season {season}")]
    NoCanonicalData { show: String, season: u32 },

    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    // Provider errors
    #[error("TV show not found: {0}")]
    ShowNotFound(String),

    #[error("Disambiguation assistant failed: {0}")]
    AssistantError(String),

    // Plan errors
    #[error("Invalid plan file: {0}")]
    InvalidPlanFile(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config errors
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error means a provider returned nothing usable,
    /// so the next provider should be tried.
    pub fn is_no_canonical_data(&self) -> bool {
        matches!(self, Error::NoCanonicalData { .. } | Error::ShowNotFound(_))
    }
}
