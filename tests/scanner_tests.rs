//! Integration tests for the scanner module.
//!
//! Tests cover:
//! - Show and season inference from names and directories
//! - Sample and extras detection
//! - Error handling for non-existent paths

use episode_planner::core::scanner::{scan_directory, ScanOptions};
use episode_planner::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "fake video content").unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let result = scan_directory(temp_dir.path(), &ScanOptions::default()).unwrap();

    assert!(result.files.is_empty());
    assert_eq!(result.skipped, 0);
    assert_eq!(result.total_dirs_scanned, 1);
}

#[test]
fn test_scan_show_tree() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(root, "Paw Patrol/Season 02/Pups Save A Train.mkv");
    touch(root, "Paw Patrol/Season 02/Paw Patrol - S02E03 - Pups Save A Dolphin.mp4");
    touch(root, "Paw Patrol/Season 02/notes.txt");

    let result = scan_directory(root, &ScanOptions::default()).unwrap();
    assert_eq!(result.files.len(), 2);
    assert_eq!(result.total_files_scanned, 3);

    let declared = &result.files[0];
    assert_eq!(declared.filename(), "Paw Patrol - S02E03 - Pups Save A Dolphin.mp4");
    assert_eq!(declared.show, "Paw Patrol");
    assert_eq!(declared.declared_season, Some(2));
    assert_eq!(declared.declared_episode, Some(3));
    assert_eq!(declared.extension, "mp4");

    let bare = &result.files[1];
    assert_eq!(bare.stem, "Pups Save A Train");
    assert_eq!(bare.show, "Paw Patrol");
    assert_eq!(bare.declared_season, Some(2));
    assert_eq!(bare.declared_episode, None);
    assert_eq!(bare.size, "fake video content".len() as u64);
}

#[test]
fn test_scan_skips_samples_and_extras() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(root, "Bluey/Season 01/Bluey - S01E01 - Magic Xylophone.mkv");
    touch(root, "Bluey/Season 01/Bluey - S01E01 - sample.mkv");
    touch(root, "Bluey/Extras/Interview.mkv");
    touch(root, "Bluey/Sample/Bluey - S01E02.mkv");

    let result = scan_directory(root, &ScanOptions::default()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.skipped, 3);
    assert_eq!(result.files[0].stem, "Bluey - S01E01 - Magic Xylophone");
}

#[test]
fn test_scan_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(root, "Downloads/Magic Xylophone.mkv");
    touch(root, "Downloads/Hospital.mkv");

    let options = ScanOptions {
        show: Some("Bluey".to_string()),
        season: Some(3),
    };
    let result = scan_directory(&root.join("Downloads"), &options).unwrap();

    let stems: Vec<&str> = result.files.iter().map(|f| f.stem.as_str()).collect();
    assert_eq!(stems, vec!["Hospital", "Magic Xylophone"]);
    for file in &result.files {
        assert_eq!(file.show, "Bluey");
        assert_eq!(file.declared_season, Some(3));
    }
}

#[test]
fn test_declared_season_beats_default() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(root, "Bluey/Bluey - S02E05 - Hospital.mkv");

    let options = ScanOptions {
        show: None,
        season: Some(7),
    };
    let result = scan_directory(root, &options).unwrap();
    assert_eq!(result.files[0].declared_season, Some(2));
}

#[test]
fn test_scan_nonexistent_directory() {
    let result = scan_directory(Path::new("/nonexistent/path/12345"), &ScanOptions::default());
    assert!(matches!(result, Err(Error::PathNotFound(_))));
}

#[test]
fn test_scan_file_instead_of_directory() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "episode.mkv");

    let result = scan_directory(&temp_dir.path().join("episode.mkv"), &ScanOptions::default());
    assert!(matches!(result, Err(Error::NotADirectory(_))));
}
