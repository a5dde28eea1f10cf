//! Integration tests for the span assigner.

use episode_planner::core::confidence::{assess, REASON_NON_ADJACENT};
use episode_planner::core::matcher::{Matcher, SeasonIndex};
use episode_planner::core::span::{duration_walk, Resolution, SpanAssigner};
use episode_planner::models::catalog::CanonicalEpisode;
use episode_planner::models::config::{MatchThresholds, PlanModes};
use episode_planner::models::matching::MatchMethod;
use episode_planner::models::media::ScannedFile;
use episode_planner::models::plan::PlanStatus;

fn zoo() -> Vec<CanonicalEpisode> {
    vec![
        CanonicalEpisode::new(1, 1, "Red Fox", Some(11)),
        CanonicalEpisode::new(1, 2, "Blue Whale Song", Some(11)),
        CanonicalEpisode::new(1, 3, "Green Frog", Some(22)),
        CanonicalEpisode::new(1, 5, "Blue Whale Sing", Some(11)),
    ]
}

fn file(name: &str) -> ScannedFile {
    ScannedFile::new(format!("/tv/Zoo/Season 01/{}.mkv", name), "Zoo").with_season(1)
}

fn anthology() -> PlanModes {
    PlanModes {
        anthology: true,
        ..Default::default()
    }
}

async fn assign(file: &ScannedFile, modes: PlanModes) -> Resolution {
    assign_in(&zoo(), file, modes).await
}

async fn assign_in(episodes: &[CanonicalEpisode], file: &ScannedFile, modes: PlanModes) -> Resolution {
    assign_with(episodes, file, modes, MatchThresholds::default()).await
}

async fn assign_with(
    episodes: &[CanonicalEpisode],
    file: &ScannedFile,
    modes: PlanModes,
    thresholds: MatchThresholds,
) -> Resolution {
    let index = SeasonIndex::new(episodes);
    let matcher = Matcher::new();
    SpanAssigner::new(&matcher, &thresholds, &modes)
        .assign(file, &index, 0)
        .await
}

fn numbers(resolution: &Resolution) -> Vec<u32> {
    resolution
        .matched()
        .map(|r| r.matched_episodes.iter().map(|e| e.episode).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_two_segments_form_a_span() {
    let resolution = assign(&file("Red Fox & Blue Whale Song"), anthology()).await;
    assert_eq!(numbers(&resolution), vec![1, 2]);
    assert_eq!(resolution.matched().map(|r| r.method), Some(MatchMethod::Exact));
}

#[tokio::test]
async fn test_non_adjacent_segments_are_not_forced() {
    let episodes = vec![
        CanonicalEpisode::new(1, 1, "Red Fox", None),
        CanonicalEpisode::new(1, 2, "Sea Cat", None),
        CanonicalEpisode::new(1, 3, "Old Owl", None),
        CanonicalEpisode::new(1, 5, "Big Dog", None),
    ];
    let resolution = assign_in(&episodes, &file("Sea Cat & Big Dog"), anthology()).await;
    match &resolution {
        Resolution::NonAdjacent(episodes) => {
            let found: Vec<u32> = episodes.iter().map(|e| e.episode).collect();
            assert_eq!(found, vec![2, 5]);
        }
        other => panic!("expected non-adjacent, got {:?}", other),
    }

    let verdict = assess(&resolution, &MatchThresholds::default());
    assert_eq!(verdict.status, PlanStatus::Manual);
    assert_eq!(verdict.reason.as_deref(), Some(REASON_NON_ADJACENT));
}

#[tokio::test]
async fn test_adjacency_correction() {
    // "Blue Whale Sing" is E05 but sits next to E01 only as E02.
    let resolution = assign(&file("Red Fox & Blue Whale Sing"), anthology()).await;
    assert_eq!(numbers(&resolution), vec![1, 2]);
    let result = resolution.matched().unwrap();
    assert_eq!(result.method, MatchMethod::Fuzzy);
    assert!(result.score > 0.9 && result.score < 1.0);
}

#[tokio::test]
async fn test_declared_span_uses_windowed_pairing() {
    let mut f = file("Zoo - S01E02-E03 - Blue Whale Song Green Frog").with_episode(2);
    f.declared_episode_end = Some(3);
    let resolution = assign(&f, PlanModes::default()).await;
    assert_eq!(numbers(&resolution), vec![2, 3]);
}

#[tokio::test]
async fn test_declared_span_halves_need_fuzzy_accept() {
    let mut f = file("Zoo - S01E01-E02 - Red Fox Blue Whale Sang").with_episode(1);
    f.declared_episode_end = Some(2);

    let resolution = assign(&f, PlanModes::default()).await;
    assert_eq!(numbers(&resolution), vec![1, 2]);
    assert_eq!(resolution.matched().map(|r| r.method), Some(MatchMethod::Fuzzy));

    // "Blue Whale Sang" scores about 0.93, below this fuzzy bar.
    let strict = MatchThresholds {
        split_threshold: 0.0,
        fuzzy_accept: 0.99,
        ..Default::default()
    };
    let resolution = assign_with(&zoo(), &f, PlanModes::default(), strict).await;
    assert_ne!(resolution.matched().map(|r| r.method), Some(MatchMethod::Fuzzy));
}

#[tokio::test]
async fn test_partial_match_is_flagged() {
    let resolution = assign(&file("Red Fox & Zebra Quantum Harmonica"), anthology()).await;
    assert_eq!(numbers(&resolution), vec![1]);

    let verdict = assess(&resolution, &MatchThresholds::default());
    assert_eq!(verdict.status, PlanStatus::Manual);
    assert_eq!(verdict.reason.as_deref(), Some("only part of the title matched"));
}

#[tokio::test]
async fn test_declared_number_is_last_resort() {
    let f = file("Zoo - S01E03 - Zebra Quantum Harmonica").with_episode(3);
    let resolution = assign(&f, PlanModes::default()).await;
    let result = resolution.matched().unwrap();
    assert_eq!(result.method, MatchMethod::Declared);
    assert_eq!(numbers(&resolution), vec![3]);

    let verdict = assess(&resolution, &MatchThresholds::default());
    assert_eq!(verdict.status, PlanStatus::Manual);
    assert_eq!(verdict.reason.as_deref(), Some("low-confidence match"));
}

#[tokio::test]
async fn test_title_beats_declared_number() {
    let f = file("Zoo - S01E03 - Red Fox").with_episode(3);
    let resolution = assign(&f, PlanModes::default()).await;
    assert_eq!(numbers(&resolution), vec![1]);
}

#[tokio::test]
async fn test_untitled_and_untrusted() {
    let f = file("Zoo - S01E03").with_episode(3);
    assert_eq!(assign(&f, PlanModes::default()).await, Resolution::Untitled);

    let untrusted = PlanModes {
        untrusted_titles: true,
        ..Default::default()
    };
    assert_eq!(assign(&file("Red Fox"), untrusted).await, Resolution::Untitled);
}

#[test]
fn test_duration_walk_scenario() {
    let episodes = vec![
        CanonicalEpisode::new(1, 1, "A", Some(11)),
        CanonicalEpisode::new(1, 2, "B", Some(11)),
        CanonicalEpisode::new(1, 3, "C", Some(22)),
    ];
    let steps: Vec<Vec<u32>> = duration_walk(&episodes, 24)
        .iter()
        .map(|s| s.iter().map(|e| e.episode).collect())
        .collect();
    assert_eq!(steps, vec![vec![1, 2], vec![3]]);
}
