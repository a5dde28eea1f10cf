//! Integration tests for the episode matcher and the assistant contract.

use async_trait::async_trait;
use episode_planner::core::assistant::{AssistantSuggestion, DisambiguationAssistant};
use episode_planner::core::matcher::{
    exact_match, fuzzy_match, match_local, rare_noun_match, MatchContext, Matcher, SeasonIndex,
};
use episode_planner::models::catalog::CanonicalEpisode;
use episode_planner::models::config::MatchThresholds;
use episode_planner::models::matching::{MatchMethod, Segment};
use episode_planner::Result;
use std::sync::Arc;
use std::time::Duration;

fn season(titles: &[&str]) -> Vec<CanonicalEpisode> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| CanonicalEpisode::new(1, i as u32 + 1, t, None))
        .collect()
}

fn ctx<'a>(index: &'a SeasonIndex<'a>, thresholds: &'a MatchThresholds) -> MatchContext<'a> {
    MatchContext {
        season: index,
        declared_episode: None,
        position: 0,
        thresholds,
        allow_internal_split: false,
    }
}

/// Always answers with the same suggestion.
struct Fixed(Option<AssistantSuggestion>);

#[async_trait]
impl DisambiguationAssistant for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn suggest(&self, _segment: &str, _episodes: &[CanonicalEpisode]) -> Result<Option<AssistantSuggestion>> {
        Ok(self.0.clone())
    }
}

/// Never answers in time.
struct Sleepy;

#[async_trait]
impl DisambiguationAssistant for Sleepy {
    fn name(&self) -> &str {
        "sleepy"
    }

    async fn suggest(&self, _segment: &str, _episodes: &[CanonicalEpisode]) -> Result<Option<AssistantSuggestion>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(None)
    }
}

/// Fails every call.
struct Broken;

#[async_trait]
impl DisambiguationAssistant for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    async fn suggest(&self, _segment: &str, _episodes: &[CanonicalEpisode]) -> Result<Option<AssistantSuggestion>> {
        Err(episode_planner::Error::AssistantError("connection refused".to_string()))
    }
}

fn suggestion(titles: &[&str], confidence: f32) -> Option<AssistantSuggestion> {
    Some(AssistantSuggestion {
        titles: titles.iter().map(|t| t.to_string()).collect(),
        confidence,
    })
}

const TITLES: &[&str] = &[
    "Pups Make a Splash",
    "Pups Fall Festival",
    "Pups Save a Train",
    "Pup Pup Boogie",
    "Pups Go Camping",
];

#[test]
fn test_confidence_monotonicity() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let c = ctx(&index, &t);

    let exact = exact_match(&Segment::new("Pups Save a Train"), &c).unwrap();
    let fuzzy = fuzzy_match(&Segment::new("Pups Save the Train"), &c).unwrap();
    let rare = rare_noun_match(&Segment::new("camping trip"), &c).unwrap();

    assert_eq!(exact.matched_episodes[0].episode, 3);
    assert_eq!(fuzzy.matched_episodes[0].episode, 3);
    assert_eq!(rare.matched_episodes[0].episode, 5);
    assert!(exact.score >= fuzzy.score);
    assert!(fuzzy.score >= rare.score);
}

#[test]
fn test_chain_order_prefers_exact() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let result = match_local(&Segment::new("pup pup boogie!"), &ctx(&index, &t)).unwrap();
    assert_eq!(result.method, MatchMethod::Exact);
    assert_eq!(result.matched_episodes[0].episode, 4);
}

#[test]
fn test_nothing_matches() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    assert!(match_local(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).is_none());
    assert!(match_local(&Segment::new(""), &ctx(&index, &t)).is_none());
}

#[test]
fn test_empty_season_matches_nothing() {
    let index = SeasonIndex::new(&[]);
    let t = MatchThresholds::default();
    assert!(match_local(&Segment::new("Pups Save a Train"), &ctx(&index, &t)).is_none());
}

#[test]
fn test_three_episode_split() {
    let eps = season(&["Red Fox", "Blue Whale", "Green Frog", "Yellow Bird"]);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let mut c = ctx(&index, &t);
    c.allow_internal_split = true;

    let result = match_local(&Segment::new("Red Fox Blue Whale Green Frog"), &c).unwrap();
    let numbers: Vec<u32> = result.matched_episodes.iter().map(|e| e.episode).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(result.ambiguity, None);
}

#[tokio::test]
async fn test_assistant_used_after_local_failure() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let matcher = Matcher::with_assistant(
        Arc::new(Fixed(suggestion(&["pups save a train"], 0.9))),
        Duration::from_secs(1),
    );

    let result = matcher.resolve(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).await;
    assert_eq!(result.method, MatchMethod::Assistant);
    assert_eq!(result.matched_episodes[0].episode, 3);
    assert!((result.score - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn test_assistant_not_consulted_when_local_matches() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let matcher = Matcher::with_assistant(
        Arc::new(Fixed(suggestion(&["Pups Go Camping"], 1.0))),
        Duration::from_secs(1),
    );

    let result = matcher.resolve(&Segment::new("Pups Fall Festival"), &ctx(&index, &t)).await;
    assert_eq!(result.method, MatchMethod::Exact);
    assert_eq!(result.matched_episodes[0].episode, 2);
}

#[tokio::test]
async fn test_assistant_two_titles_must_be_adjacent() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let segment = Segment::new("Zebra Quantum Harmonica");

    let adjacent = Matcher::with_assistant(
        Arc::new(Fixed(suggestion(&["Pups Save a Train", "Pup Pup Boogie"], 0.95))),
        Duration::from_secs(1),
    );
    let result = adjacent.resolve(&segment, &ctx(&index, &t)).await;
    let numbers: Vec<u32> = result.matched_episodes.iter().map(|e| e.episode).collect();
    assert_eq!(numbers, vec![3, 4]);

    let apart = Matcher::with_assistant(
        Arc::new(Fixed(suggestion(&["Pups Make a Splash", "Pups Go Camping"], 0.95))),
        Duration::from_secs(1),
    );
    let result = apart.resolve(&segment, &ctx(&index, &t)).await;
    assert_eq!(result.method, MatchMethod::None);
}

#[tokio::test]
async fn test_assistant_low_confidence_rejected() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let matcher = Matcher::with_assistant(
        Arc::new(Fixed(suggestion(&["Pups Save a Train"], 0.5))),
        Duration::from_secs(1),
    );
    let result = matcher.resolve(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).await;
    assert!(!result.is_match());
}

#[tokio::test]
async fn test_assistant_non_finite_confidence_rejected() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    for confidence in [f32::NAN, f32::INFINITY] {
        let matcher = Matcher::with_assistant(
            Arc::new(Fixed(suggestion(&["Pups Save a Train"], confidence))),
            Duration::from_secs(1),
        );
        let result = matcher.resolve(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).await;
        assert!(!result.is_match());
        assert_eq!(result.method, MatchMethod::None);
    }
}

#[tokio::test]
async fn test_assistant_unknown_title_rejected() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let matcher = Matcher::with_assistant(
        Arc::new(Fixed(suggestion(&["Not An Episode"], 0.99))),
        Duration::from_secs(1),
    );
    let result = matcher.resolve(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).await;
    assert!(!result.is_match());
}

#[tokio::test]
async fn test_assistant_timeout_degrades_to_none() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let matcher = Matcher::with_assistant(Arc::new(Sleepy), Duration::from_millis(50));

    let started = std::time::Instant::now();
    let result = matcher.resolve(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).await;
    assert_eq!(result.method, MatchMethod::None);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_assistant_error_degrades_to_none() {
    let eps = season(TITLES);
    let index = SeasonIndex::new(&eps);
    let t = MatchThresholds::default();
    let matcher = Matcher::with_assistant(Arc::new(Broken), Duration::from_secs(1));
    let result = matcher.resolve(&Segment::new("Zebra Quantum Harmonica"), &ctx(&index, &t)).await;
    assert_eq!(result.method, MatchMethod::None);
}
