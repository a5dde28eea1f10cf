//! Rename plan data model.

use super::matching::MatchMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Current plan format version.
pub const PLAN_VERSION: &str = "1.0";

/// Inclusive range of consecutive episode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSpan {
    pub start: u32,
    pub end: u32,
}

impl EpisodeSpan {
    pub fn single(episode: u32) -> Self {
        Self {
            start: episode,
            end: episode,
        }
    }

    /// Span over `start..=end`; `None` if reversed.
    pub fn range(start: u32, end: u32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, episode: u32) -> bool {
        (self.start..=self.end).contains(&episode)
    }
}

impl fmt::Display for EpisodeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "E{:02}", self.start)
        } else {
            write!(f, "E{:02}-E{:02}", self.start, self.end)
        }
    }
}

/// Review status of a plan item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Safe to apply automatically.
    Auto,
    /// Needs a human decision.
    Manual,
    /// Destination collides with another item.
    Conflict,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Auto => write!(f, "auto"),
            PlanStatus::Manual => write!(f, "manual"),
            PlanStatus::Conflict => write!(f, "conflict"),
        }
    }
}

/// One file's entry in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenamePlanItem {
    pub source: PathBuf,
    /// Equal to `source` when the file could not be resolved.
    pub destination: PathBuf,
    pub show: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_span: Option<EpisodeSpan>,
    /// Canonical titles, joined with " & " for spans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    pub status: PlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub confidence: f32,
    pub method: MatchMethod,
}

impl RenamePlanItem {
    /// Consume the item and return it marked as conflicting.
    pub fn into_conflict(self, reason: String) -> Self {
        Self {
            status: PlanStatus::Conflict,
            reason: Some(reason),
            ..self
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.episode_span.is_some()
    }
}

/// The engine's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub version: String,
    /// Library root destinations are built under.
    pub root: PathBuf,
    /// One item per scanned file, ordered by source path.
    pub items: Vec<RenamePlanItem>,
    /// Problems that affect groups of files, such as missing catalogs.
    pub errors: Vec<String>,
}

impl RenamePlan {
    pub fn new(root: PathBuf) -> Self {
        Self {
            version: PLAN_VERSION.to_string(),
            root,
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            total: self.items.len(),
            ..Default::default()
        };
        for item in &self.items {
            match item.status {
                PlanStatus::Auto => summary.auto += 1,
                PlanStatus::Manual => summary.manual += 1,
                PlanStatus::Conflict => summary.conflict += 1,
            }
        }
        summary
    }

    pub fn items_with_status(&self, status: PlanStatus) -> impl Iterator<Item = &RenamePlanItem> {
        self.items.iter().filter(move |i| i.status == status)
    }
}

/// Item counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub total: usize,
    pub auto: usize,
    pub manual: usize,
    pub conflict: usize,
}
