//! Episode matcher.
//!
//! Maps a segment to canonical episodes by running an ordered chain of
//! strategies and stopping at the first that clears its threshold:
//!
//! 1. exact normalized title
//! 2. fuzzy ratio with tie handling
//! 3. substring / token overlap
//! 4. rare-noun uniqueness
//! 5. internal split over consecutive episode windows
//! 6. the disambiguation assistant, if one is configured
//!
//! Strategies 1-5 are pure functions of the segment and the season, so
//! each can be tested on its own. A strategy that finds several equally
//! good candidates refuses, and the chain falls through.

use super::assistant::{consult, DisambiguationAssistant};
use super::pairing::best_window;
use super::text::{contains_words, content_tokens, nouns, normalize, similarity, tokens};
use crate::models::catalog::CanonicalEpisode;
use crate::models::config::MatchThresholds;
use crate::models::matching::{MatchMethod, MatchResult, Segment};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// One season of the catalog with titles pre-normalized.
#[derive(Debug, Clone)]
pub struct SeasonIndex<'a> {
    pub episodes: &'a [CanonicalEpisode],
    /// Normalized titles, parallel to `episodes`.
    pub titles: Vec<String>,
    /// Episode numbers, parallel to `episodes`.
    pub numbers: Vec<u32>,
}

impl<'a> SeasonIndex<'a> {
    pub fn new(episodes: &'a [CanonicalEpisode]) -> Self {
        Self {
            episodes,
            titles: episodes.iter().map(|e| normalize(&e.title)).collect(),
            numbers: episodes.iter().map(|e| e.episode).collect(),
        }
    }

    pub fn by_number(&self, episode: u32) -> Option<&'a CanonicalEpisode> {
        self.numbers
            .iter()
            .position(|n| *n == episode)
            .and_then(|i| self.episodes.get(i))
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Everything a strategy needs to know about the file being matched.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub season: &'a SeasonIndex<'a>,
    /// Episode number declared in the file name.
    pub declared_episode: Option<u32>,
    /// Index of the file among its season's files, in directory order.
    pub position: usize,
    pub thresholds: &'a MatchThresholds,
    /// Whether strategy 5 may split a segment (anthology mode).
    pub allow_internal_split: bool,
}

/// A pure matching strategy.
pub type Strategy = fn(&Segment, &MatchContext<'_>) -> Option<MatchResult>;

/// Local strategies in evaluation order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("exact", exact_match as Strategy),
    ("fuzzy", fuzzy_match as Strategy),
    ("substring", substring_match as Strategy),
    ("rare-noun", rare_noun_match as Strategy),
    ("internal-split", internal_split_match as Strategy),
];

/// Resolve a tie between candidate indices using the declared episode
/// number, then canonical order. Without a declared number the tie stands.
fn break_tie(candidates: &[usize], ctx: &MatchContext<'_>) -> Option<usize> {
    match candidates {
        [] => None,
        [only] => Some(*only),
        _ => {
            let declared = ctx.declared_episode?;
            candidates
                .iter()
                .copied()
                .min_by_key(|&i| (ctx.season.numbers[i].abs_diff(declared), i))
        }
    }
}

/// Strategy 1: segment equals a title after normalization.
pub fn exact_match(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let candidates: Vec<usize> = ctx
        .season
        .titles
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_empty() && **t == segment.normalized)
        .map(|(i, _)| i)
        .collect();
    let index = break_tie(&candidates, ctx)?;
    Some(MatchResult::single(&ctx.season.episodes[index], MatchMethod::Exact, 1.0))
}

/// Strategy 2: fuzzy similarity.
///
/// A single candidate at or above `fuzzy_strong` wins outright. Otherwise
/// the best candidate must reach `fuzzy_accept`, and competitors within
/// `tie_window` of it are settled by proximity to the declared number.
pub fn fuzzy_match(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let t = ctx.thresholds;
    let scores: Vec<f32> = ctx
        .season
        .titles
        .iter()
        .map(|title| similarity(&segment.normalized, title))
        .collect();
    let best = scores.iter().copied().fold(0.0_f32, f32::max);
    if best < t.fuzzy_accept {
        return None;
    }

    let strong: Vec<usize> = (0..scores.len()).filter(|&i| scores[i] >= t.fuzzy_strong).collect();
    let index = if strong.len() == 1 {
        strong[0]
    } else {
        let tied: Vec<usize> = (0..scores.len())
            .filter(|&i| scores[i] >= t.fuzzy_accept && best - scores[i] <= t.tie_window)
            .collect();
        match break_tie(&tied, ctx) {
            Some(i) => i,
            None => {
                tracing::debug!(
                    "Fuzzy match for {:?} is ambiguous between {} candidates",
                    segment.display,
                    tied.len()
                );
                return None;
            }
        }
    };

    Some(MatchResult::single(
        &ctx.season.episodes[index],
        MatchMethod::Fuzzy,
        scores[index],
    ))
}

/// Strategy 3: the segment is contained in one title, or shares enough
/// content tokens with exactly one title.
pub fn substring_match(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let t = ctx.thresholds;
    let seg_tokens: BTreeSet<&str> = content_tokens(&segment.normalized).into_iter().collect();
    if seg_tokens.is_empty() {
        return None;
    }

    let contained: Vec<usize> = (0..ctx.season.len())
        .filter(|&i| contains_words(&ctx.season.titles[i], &segment.normalized))
        .collect();
    match contained.as_slice() {
        [only] => {
            return Some(MatchResult::single(
                &ctx.season.episodes[*only],
                MatchMethod::Substring,
                t.substring_score,
            ))
        }
        [] => {}
        _ => return None,
    }

    let overlapping: Vec<usize> = (0..ctx.season.len())
        .filter(|&i| {
            let title_tokens: BTreeSet<&str> =
                content_tokens(&ctx.season.titles[i]).into_iter().collect();
            let shared = seg_tokens.intersection(&title_tokens).count();
            shared > 0 && shared as f32 / seg_tokens.len() as f32 >= t.token_overlap_ratio
        })
        .collect();
    match overlapping.as_slice() {
        [only] => Some(MatchResult::single(
            &ctx.season.episodes[*only],
            MatchMethod::TokenOverlap,
            t.substring_score,
        )),
        _ => None,
    }
}

/// Strategy 4: a noun of the segment appears in exactly one title.
///
/// Rare nouns pointing at several consecutive episodes mean the segment
/// holds more than one episode, which is left to the internal split.
pub fn rare_noun_match(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    let title_tokens: Vec<BTreeSet<&str>> = ctx
        .season
        .titles
        .iter()
        .map(|t| tokens(t).into_iter().collect())
        .collect();

    let mut hits: BTreeSet<usize> = BTreeSet::new();
    for noun in nouns(&segment.normalized) {
        let owners: Vec<usize> = (0..title_tokens.len())
            .filter(|&i| title_tokens[i].contains(noun))
            .collect();
        if let [only] = owners.as_slice() {
            hits.insert(*only);
        }
    }

    let hits: Vec<usize> = hits.into_iter().collect();
    let index = match hits.as_slice() {
        [] => return None,
        [only] => *only,
        _ => {
            let consecutive = hits
                .windows(2)
                .all(|w| ctx.season.numbers[w[1]] == ctx.season.numbers[w[0]] + 1);
            if consecutive {
                tracing::debug!(
                    "Rare nouns of {:?} span {} consecutive episodes",
                    segment.display,
                    hits.len()
                );
                return None;
            }
            hits.iter()
                .copied()
                .min_by_key(|&i| (i.abs_diff(ctx.position), i))?
        }
    };

    Some(MatchResult::single(
        &ctx.season.episodes[index],
        MatchMethod::RareNoun,
        ctx.thresholds.rare_noun_score,
    ))
}

/// Turn a window search into a match over its episodes.
fn window_result(
    segment: &Segment,
    ctx: &MatchContext<'_>,
    size: usize,
) -> Option<MatchResult> {
    let t = ctx.thresholds;
    let outcome = best_window(
        &segment.normalized,
        &ctx.season.titles,
        &ctx.season.numbers,
        size,
        t.split_threshold,
        t.tie_window,
    )?;
    let episodes: Vec<CanonicalEpisode> = outcome
        .best
        .indices()
        .map(|i| ctx.season.episodes[i].clone())
        .collect();
    let score = outcome.best.min();
    let method = if score >= 1.0 {
        MatchMethod::Exact
    } else {
        MatchMethod::Fuzzy
    };
    let result = MatchResult::many(episodes, method, score);
    if outcome.ambiguous {
        Some(result.flagged(if size == 3 {
            "ambiguous three-episode split"
        } else {
            "ambiguous two-episode split"
        }))
    } else {
        Some(result)
    }
}

/// Score the segment as two consecutive episodes; the best pair wins.
pub fn pair_match(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    window_result(segment, ctx, 2)
}

/// Strategy 5: split the segment into two, then three, consecutive titles.
pub fn internal_split_match(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    if !ctx.allow_internal_split {
        return None;
    }
    pair_match(segment, ctx).or_else(|| window_result(segment, ctx, 3))
}

/// Reason attached to a partial single-title match that may hide a second episode.
pub const REASON_POSSIBLE_SPAN: &str = "possible multi-episode file";

/// In anthology mode a partial single-title match may be one title of
/// several. The window search gets a say: it wins when its weakest piece
/// scores at least as well as the single match, otherwise the single match
/// is kept but flagged.
fn check_window(segment: &Segment, ctx: &MatchContext<'_>, single: MatchResult) -> MatchResult {
    if !ctx.allow_internal_split || single.matched_episodes.len() != 1 || single.score >= 1.0 {
        return single;
    }
    match internal_split_match(segment, ctx) {
        Some(window) if window.score >= single.score => {
            tracing::debug!(
                "{:?} reads better as {} episodes ({:.2} over {:.2})",
                segment.display,
                window.matched_episodes.len(),
                window.score,
                single.score
            );
            window
        }
        Some(_) => single.flagged(REASON_POSSIBLE_SPAN),
        None => single,
    }
}

/// Run the local strategy chain.
pub fn match_local(segment: &Segment, ctx: &MatchContext<'_>) -> Option<MatchResult> {
    if segment.is_empty() || ctx.season.is_empty() {
        return None;
    }
    let (name, result) = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(segment, ctx).map(|result| (*name, result)))?;
    let result = check_window(segment, ctx, result);
    tracing::debug!(
        "{:?} matched by {} -> {:?} ({:.2})",
        segment.display,
        name,
        result
            .matched_episodes
            .iter()
            .map(|e| e.episode)
            .collect::<Vec<_>>(),
        result.score
    );
    Some(result)
}

/// The full matcher: local strategies, then the assistant.
#[derive(Clone, Default)]
pub struct Matcher {
    assistant: Option<Arc<dyn DisambiguationAssistant>>,
    timeout: Duration,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assistant(assistant: Arc<dyn DisambiguationAssistant>, timeout: Duration) -> Self {
        Self {
            assistant: Some(assistant),
            timeout,
        }
    }

    /// Match one segment. Never fails: the worst outcome is `method = none`.
    pub async fn resolve(&self, segment: &Segment, ctx: &MatchContext<'_>) -> MatchResult {
        if let Some(result) = match_local(segment, ctx) {
            return result;
        }
        if let Some(assistant) = &self.assistant {
            if !segment.is_empty() && !ctx.season.is_empty() {
                if let Some(result) = consult(assistant.as_ref(), segment, ctx, self.timeout).await {
                    return result;
                }
            }
        }
        MatchResult::none()
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("assistant", &self.assistant.as_ref().map(|a| a.name().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
