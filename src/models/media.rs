//! Scanned media file model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Video file extensions recognized by the scanner.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ts", "m2ts",
];

/// A candidate media file produced by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Absolute path.
    pub path: PathBuf,
    /// Show name parsed from the file name or its directories.
    pub show: String,
    /// File name without extension. The show/episode preamble is
    /// removed later by the segment splitter.
    pub stem: String,
    /// Extension without the leading dot.
    pub extension: String,
    /// Duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Season number found in the file name or a season directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_season: Option<u32>,
    /// Episode number found in the file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_episode: Option<u32>,
    /// Last episode of a declared span (`S01E01-E02`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_episode_end: Option<u32>,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl ScannedFile {
    /// Create a file record from a path, deriving stem and extension.
    pub fn new(path: impl Into<PathBuf>, show: &str) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            show: show.to_string(),
            stem,
            extension,
            duration: None,
            declared_season: None,
            declared_episode: None,
            declared_episode_end: None,
            size: 0,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_season(mut self, season: u32) -> Self {
        self.declared_season = Some(season);
        self
    }

    pub fn with_episode(mut self, episode: u32) -> Self {
        self.declared_episode = Some(episode);
        self
    }

    /// Season used for catalog lookup: declared, or 1.
    pub fn season(&self) -> u32 {
        self.declared_season.unwrap_or(1)
    }

    /// Whether the file declares more than one episode.
    pub fn declares_span(&self) -> bool {
        matches!(
            (self.declared_episode, self.declared_episode_end),
            (Some(start), Some(end)) if end > start
        )
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Check if a file extension is a video format.
pub fn is_video_extension(ext: &str) -> bool {
    VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}
