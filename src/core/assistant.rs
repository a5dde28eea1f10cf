//! Disambiguation assistant contract.
//!
//! The assistant is consulted only after every local strategy failed.
//! Calls are bounded by a caller-supplied timeout; a timeout, an error or
//! a low-confidence answer all count as "no match".

use super::matcher::MatchContext;
use super::text::{normalize, similarity};
use crate::models::catalog::CanonicalEpisode;
use crate::models::matching::{MatchMethod, MatchResult, Segment};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the assistant proposes for a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantSuggestion {
    /// One title, or several for a multi-episode segment.
    pub titles: Vec<String>,
    pub confidence: f32,
}

/// Something that can map a segment to canonical titles.
#[async_trait]
pub trait DisambiguationAssistant: Send + Sync {
    fn name(&self) -> &str;

    /// Suggest canonical titles for `segment`, or `None` when unsure.
    async fn suggest(
        &self,
        segment: &str,
        episodes: &[CanonicalEpisode],
    ) -> Result<Option<AssistantSuggestion>>;
}

/// Find the canonical episode a suggested title names.
fn lookup_title<'a>(title: &str, ctx: &MatchContext<'a>) -> Option<&'a CanonicalEpisode> {
    let wanted = normalize(title);
    let season = ctx.season;
    if let Some(i) = season.titles.iter().position(|t| *t == wanted) {
        return season.episodes.get(i);
    }
    // Tolerate small drift in the assistant's spelling.
    season
        .titles
        .iter()
        .enumerate()
        .map(|(i, t)| (i, similarity(&wanted, t)))
        .filter(|(_, s)| *s >= ctx.thresholds.fuzzy_strong)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .and_then(|(i, _)| season.episodes.get(i))
}

/// Ask the assistant about one segment, with a timeout.
pub async fn consult(
    assistant: &dyn DisambiguationAssistant,
    segment: &Segment,
    ctx: &MatchContext<'_>,
    timeout: Duration,
) -> Option<MatchResult> {
    let call = assistant.suggest(&segment.display, ctx.season.episodes);
    let suggestion = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(Some(suggestion))) => suggestion,
        Ok(Ok(None)) => {
            tracing::debug!("{} had no suggestion for {:?}", assistant.name(), segment.display);
            return None;
        }
        Ok(Err(e)) => {
            tracing::warn!("{} failed for {:?}: {}", assistant.name(), segment.display, e);
            return None;
        }
        Err(_) => {
            tracing::warn!(
                "{} timed out after {:?} for {:?}",
                assistant.name(),
                timeout,
                segment.display
            );
            return None;
        }
    };

    if !suggestion.confidence.is_finite()
        || suggestion.confidence < ctx.thresholds.assistant_min
        || suggestion.titles.is_empty()
    {
        tracing::debug!(
            "Rejected {} suggestion {:?} (confidence {:.2})",
            assistant.name(),
            suggestion.titles,
            suggestion.confidence
        );
        return None;
    }

    let mut episodes = Vec::with_capacity(suggestion.titles.len());
    for title in &suggestion.titles {
        episodes.push(lookup_title(title, ctx)?.clone());
    }

    let consecutive = episodes.windows(2).all(|w| w[1].episode == w[0].episode + 1);
    if !consecutive {
        tracing::debug!("{} suggested non-adjacent episodes", assistant.name());
        return None;
    }

    Some(MatchResult::many(
        episodes,
        MatchMethod::Assistant,
        suggestion.confidence.min(1.0),
    ))
}
