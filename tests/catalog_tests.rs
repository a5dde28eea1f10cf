//! Integration tests for the catalog normalizer.
//!
//! Tests cover:
//! - Coercion of loosely typed provider rows
//! - Dropping and de-duplicating rows
//! - The "no canonical data" condition

use episode_planner::core::catalog::{normalize_catalog, normalize_episodes};
use episode_planner::models::catalog::{Catalog, CatalogSet, RawEpisode};

fn rows(json: &str) -> Vec<RawEpisode> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_messy_rows_are_coerced() {
    let raw = rows(
        r#"[
            {"season": "01", "episode": " 3 ", "title": " Pups Save A Train ", "runtime": "22 min"},
            {"season_number": 1.0, "episode_number": 1, "name": "Pups And The Kitty Tastrophe", "runtime": 11},
            {"season": 1, "episode": 2, "title": "Pups Fall Festival", "runtime": 0}
        ]"#,
    );
    let catalog = normalize_catalog("Paw Patrol", 1, &raw).unwrap();
    let season = catalog.season(1);

    let numbers: Vec<u32> = season.iter().map(|e| e.episode).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(season[2].title, "Pups Save A Train");
    assert_eq!(season[2].runtime, Some(22));
    assert_eq!(season[0].runtime, Some(11));
    assert_eq!(season[1].runtime, None);
}

#[test]
fn test_bad_rows_are_dropped() {
    let raw = rows(
        r#"[
            {"season": 1, "episode": 2.5, "title": "Half"},
            {"season": 1, "episode": 0, "title": "Zero"},
            {"season": -1, "episode": 4, "title": "Negative"},
            {"season": 1, "episode": "pilot", "title": "Text"},
            {"episode": 5, "title": "No season"},
            {"season": 1, "episode": 6, "title": "Kept"}
        ]"#,
    );
    let (episodes, report) = normalize_episodes(&raw);
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title, "Kept");
    assert_eq!(report.kept, 1);
    assert_eq!(report.dropped, 5);
}

#[test]
fn test_duplicates_keep_first() {
    let raw = rows(
        r#"[
            {"season": 1, "episode": 1, "title": "First"},
            {"season": 1, "episode": "1", "title": "Second"}
        ]"#,
    );
    let (episodes, report) = normalize_episodes(&raw);
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title, "First");
    assert_eq!(report.duplicates, 1);
}

#[test]
fn test_missing_title_kept_empty() {
    let raw = rows(r#"[{"season": 1, "episode": 1}]"#);
    let catalog = normalize_catalog("Show", 1, &raw).unwrap();
    assert_eq!(catalog.season(1)[0].title, "");
}

#[test]
fn test_empty_season_is_no_canonical_data() {
    let raw = rows(r#"[{"season": 2, "episode": 1, "title": "Other season"}]"#);
    let err = normalize_catalog("Show", 1, &raw).unwrap_err();
    assert!(err.is_no_canonical_data());
    assert_eq!(err.to_string(), "No canonical data for Show season 1");

    let err = normalize_catalog("Show", 1, &[]).unwrap_err();
    assert!(err.is_no_canonical_data());
}

#[test]
fn test_catalog_set_merges_seasons() {
    let s1 = normalize_catalog("Paw Patrol", 1, &rows(r#"[{"season": 1, "episode": 1, "title": "A"}]"#)).unwrap();
    let s2 = normalize_catalog("Paw Patrol", 2, &rows(r#"[{"season": 2, "episode": 1, "title": "B"}]"#)).unwrap();

    let mut set = CatalogSet::new();
    set.insert(s1);
    set.insert(s2);

    assert_eq!(set.len(), 1);
    let catalog: &Catalog = set.get("PAW PATROL").unwrap();
    assert_eq!(catalog.seasons(), vec![1, 2]);
    assert_eq!(catalog.get(2, 1).map(|e| e.title.as_str()), Some("B"));
}
