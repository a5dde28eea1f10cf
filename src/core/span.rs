//! Span assigner.
//!
//! Decides which consecutive canonical episodes a file covers, from its
//! title segments or, when titles are absent or untrusted, from runtimes.

use super::matcher::{pair_match, MatchContext, Matcher, SeasonIndex};
use super::splitter::{split_segments, title_of};
use super::text::similarity;
use crate::models::catalog::CanonicalEpisode;
use crate::models::config::{MatchThresholds, PlanModes};
use crate::models::matching::{MatchMethod, MatchResult, Segment};
use crate::models::media::ScannedFile;

/// Share of the max-duration bound at which an episode counts as full length.
const FULL_LENGTH_RATIO: f32 = 0.95;

/// How a file's episodes were (or were not) determined.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Consecutive episodes, with the match that produced them.
    Span(MatchResult),
    /// Titles matched episodes that could not be made consecutive.
    NonAdjacent(Vec<CanonicalEpisode>),
    /// Nothing matched.
    Unmatched,
    /// No usable title; left to the duration walk or the declared number.
    Untitled,
}

impl Resolution {
    pub fn matched(&self) -> Option<&MatchResult> {
        match self {
            Resolution::Span(result) => Some(result),
            _ => None,
        }
    }
}

/// Whether episode numbers form one run without gaps or repeats.
pub fn is_consecutive(episodes: &[CanonicalEpisode]) -> bool {
    let mut numbers: Vec<(u32, u32)> = episodes.iter().map(|e| (e.season, e.episode)).collect();
    numbers.sort_unstable();
    numbers
        .windows(2)
        .all(|w| w[0].0 == w[1].0 && w[1].1 == w[0].1 + 1)
}

/// Combine per-segment results; the weakest segment sets score and method.
fn combine(results: &[MatchResult]) -> MatchResult {
    let episodes: Vec<CanonicalEpisode> = results
        .iter()
        .flat_map(|r| r.matched_episodes.iter().cloned())
        .collect();
    let weakest = results
        .iter()
        .min_by(|a, b| a.score.total_cmp(&b.score));
    let (method, score) = weakest
        .map(|r| (r.method, r.score))
        .unwrap_or((MatchMethod::None, 0.0));
    let mut combined = MatchResult::many(episodes, method, score);
    combined.ambiguity = results.iter().find_map(|r| r.ambiguity.clone());
    combined
}

/// The declared episode number (or declared span), if the catalog has it.
pub fn declared_match(file: &ScannedFile, season: &SeasonIndex<'_>, score: f32) -> Option<MatchResult> {
    let start = file.declared_episode?;
    let end = file.declared_episode_end.filter(|e| *e >= start).unwrap_or(start);
    let episodes = (start..=end)
        .map(|n| season.by_number(n).cloned())
        .collect::<Option<Vec<_>>>()?;
    Some(MatchResult::many(episodes, MatchMethod::Declared, score))
}

/// Greedy duration walk.
///
/// Consecutive episodes are paired while their summed runtime fits the
/// bound; an episode already near full length, or with unknown runtime,
/// stands alone. Each step is one physical file.
pub fn duration_walk(episodes: &[CanonicalEpisode], max_duration: u32) -> Vec<Vec<CanonicalEpisode>> {
    let full_length = max_duration as f32 * FULL_LENGTH_RATIO;
    let mut steps = Vec::new();
    let mut i = 0;

    while i < episodes.len() {
        let current = &episodes[i];
        let pair_with = match (current.runtime, episodes.get(i + 1)) {
            (Some(runtime), Some(next)) if (runtime as f32) < full_length => next
                .runtime
                .filter(|r| runtime + r <= max_duration)
                .filter(|_| next.season == current.season && next.episode == current.episode + 1)
                .map(|_| next),
            _ => None,
        };

        match pair_with {
            Some(next) => {
                steps.push(vec![current.clone(), next.clone()]);
                i += 2;
            }
            None => {
                steps.push(vec![current.clone()]);
                i += 1;
            }
        }
    }

    steps
}

/// Confidence of a duration-based assignment.
pub fn duration_confidence(
    file_duration: Option<u32>,
    episodes: &[CanonicalEpisode],
    thresholds: &MatchThresholds,
) -> f32 {
    let runtime: Option<u32> = episodes.iter().map(|e| e.runtime).sum();
    match (file_duration, runtime) {
        (Some(file), Some(total)) if file.abs_diff(total) <= thresholds.duration_tolerance => {
            thresholds.duration_match
        }
        _ => thresholds.duration_mismatch,
    }
}

/// Resolves one file against one season.
pub struct SpanAssigner<'a> {
    matcher: &'a Matcher,
    thresholds: &'a MatchThresholds,
    modes: &'a PlanModes,
}

impl<'a> SpanAssigner<'a> {
    pub fn new(matcher: &'a Matcher, thresholds: &'a MatchThresholds, modes: &'a PlanModes) -> Self {
        Self {
            matcher,
            thresholds,
            modes,
        }
    }

    /// Resolve a file from its title. `position` is the file's index among
    /// the season's files in directory order.
    pub async fn assign(
        &self,
        file: &ScannedFile,
        season: &SeasonIndex<'_>,
        position: usize,
    ) -> Resolution {
        if self.modes.untrusted_titles {
            return Resolution::Untitled;
        }
        let segments = split_segments(&file.stem, &file.show, self.modes.anthology);
        let whole = match title_of(&file.stem, &file.show) {
            Some(title) if !segments.is_empty() => Segment::new(&title),
            _ => return Resolution::Untitled,
        };

        let ctx = MatchContext {
            season,
            declared_episode: file.declared_episode,
            position,
            thresholds: self.thresholds,
            allow_internal_split: self.modes.anthology,
        };

        if file.declares_span() {
            // Each half of a declared span must clear the fuzzy bar.
            let declared = MatchThresholds {
                split_threshold: self.thresholds.fuzzy_accept,
                ..*self.thresholds
            };
            let declared_ctx = MatchContext {
                thresholds: &declared,
                ..ctx
            };
            if let Some(result) = pair_match(&whole, &declared_ctx) {
                tracing::debug!("{:?} matched its declared span by windowed pairing", file.filename());
                return Resolution::Span(result);
            }
        }

        let resolution = if segments.len() == 1 {
            let result = self.matcher.resolve(&segments[0], &ctx).await;
            if result.is_match() {
                Resolution::Span(result)
            } else {
                Resolution::Unmatched
            }
        } else {
            self.resolve_segments(&segments, &whole, &ctx).await
        };

        match resolution {
            Resolution::Unmatched => declared_match(file, season, self.thresholds.declared_titled)
                .map(Resolution::Span)
                .unwrap_or(Resolution::Unmatched),
            other => other,
        }
    }

    async fn resolve_whole(&self, whole: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
        let result = self.matcher.resolve(whole, ctx).await;
        result.is_match().then_some(result)
    }

    /// Several segments: each must match, and together they must be
    /// consecutive. Otherwise the unsplit title gets a second chance.
    async fn resolve_segments(
        &self,
        segments: &[Segment],
        whole: &Segment,
        ctx: &MatchContext<'_>,
    ) -> Resolution {
        let mut results = Vec::with_capacity(segments.len());
        for segment in segments {
            results.push(self.matcher.resolve(segment, ctx).await);
        }

        if results.iter().all(MatchResult::is_match) {
            let combined = combine(&results);
            if is_consecutive(&combined.matched_episodes) {
                return Resolution::Span(combined);
            }
            if let Some(corrected) = self.correct_adjacency(segments, &results, ctx) {
                return Resolution::Span(corrected);
            }
            if let Some(result) = self.resolve_whole(whole, ctx).await {
                return Resolution::Span(result);
            }
            tracing::debug!(
                "{:?} matched non-adjacent episodes {:?}",
                whole.display,
                combined.matched_episodes.iter().map(|e| e.episode).collect::<Vec<_>>()
            );
            return Resolution::NonAdjacent(combined.matched_episodes);
        }

        if let Some(result) = self.resolve_whole(whole, ctx).await {
            return Resolution::Span(result);
        }

        let matched: Vec<MatchResult> = results.into_iter().filter(MatchResult::is_match).collect();
        if matched.is_empty() {
            return Resolution::Unmatched;
        }
        let partial = combine(&matched);
        if is_consecutive(&partial.matched_episodes) {
            Resolution::Span(partial.flagged("only part of the title matched"))
        } else {
            Resolution::NonAdjacent(partial.matched_episodes)
        }
    }

    /// Two single-episode segments that landed apart: keep one side and
    /// re-score the other against the neighbours of the kept episode.
    fn correct_adjacency(
        &self,
        segments: &[Segment],
        results: &[MatchResult],
        ctx: &MatchContext<'_>,
    ) -> Option<MatchResult> {
        let (first, second) = match (segments, results) {
            ([s1, s2], [r1, r2]) if r1.matched_episodes.len() == 1 && r2.matched_episodes.len() == 1 => {
                ((s1, r1), (s2, r2))
            }
            _ => return None,
        };

        let mut best: Option<(f32, Vec<CanonicalEpisode>)> = None;
        let mut consider = |kept: &MatchResult, other: &Segment, kept_first: bool| {
            let anchor = kept.matched_episodes[0].episode;
            for neighbour in [anchor.checked_sub(1), anchor.checked_add(1)].into_iter().flatten() {
                let Some(candidate) = ctx.season.by_number(neighbour) else {
                    continue;
                };
                let score = similarity(&other.normalized, &super::text::normalize(&candidate.title));
                if score < self.thresholds.split_threshold {
                    continue;
                }
                let combined = score.min(kept.score);
                if best.as_ref().map_or(true, |(s, _)| combined > *s) {
                    let episodes = if kept_first {
                        vec![kept.matched_episodes[0].clone(), candidate.clone()]
                    } else {
                        vec![candidate.clone(), kept.matched_episodes[0].clone()]
                    };
                    best = Some((combined, episodes));
                }
            }
        };
        consider(first.1, second.0, true);
        consider(second.1, first.0, false);

        let (score, episodes) = best?;
        tracing::debug!(
            "Adjacency corrected to {:?}",
            episodes.iter().map(|e| e.episode).collect::<Vec<_>>()
        );
        Some(MatchResult::many(episodes, MatchMethod::Fuzzy, score))
    }
}
