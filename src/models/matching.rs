//! Matching pipeline models: segments and match results.

use super::catalog::CanonicalEpisode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate episode title cut from a file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text as it appeared in the file name, trimmed.
    pub display: String,
    /// Case-folded, punctuation-insensitive copy.
    pub normalized: String,
}

impl Segment {
    pub fn new(display: &str) -> Self {
        Self {
            display: display.trim().to_string(),
            normalized: crate::core::text::normalize(display),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// How a match was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    Exact,
    Fuzzy,
    Substring,
    TokenOverlap,
    RareNoun,
    Duration,
    Assistant,
    /// Episode number declared in the file name, used as a last resort.
    Declared,
    None,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Fuzzy => "fuzzy",
            MatchMethod::Substring => "substring",
            MatchMethod::TokenOverlap => "token-overlap",
            MatchMethod::RareNoun => "rare-noun",
            MatchMethod::Duration => "duration",
            MatchMethod::Assistant => "assistant",
            MatchMethod::Declared => "declared",
            MatchMethod::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of matching one segment (or one file, for duration pairing).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Matched episodes in order; empty for no match.
    pub matched_episodes: Vec<CanonicalEpisode>,
    pub method: MatchMethod,
    pub score: f32,
    /// Set when the match is usable but must not be applied automatically.
    pub ambiguity: Option<String>,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            matched_episodes: Vec::new(),
            method: MatchMethod::None,
            score: 0.0,
            ambiguity: None,
        }
    }

    pub fn single(episode: &CanonicalEpisode, method: MatchMethod, score: f32) -> Self {
        Self::many(vec![episode.clone()], method, score)
    }

    pub fn many(episodes: Vec<CanonicalEpisode>, method: MatchMethod, score: f32) -> Self {
        Self {
            matched_episodes: episodes,
            method,
            score,
            ambiguity: None,
        }
    }

    pub fn flagged(mut self, reason: &str) -> Self {
        self.ambiguity = Some(reason.to_string());
        self
    }

    pub fn is_match(&self) -> bool {
        !self.matched_episodes.is_empty()
    }
}
