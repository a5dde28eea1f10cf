//! Directory scanner module.
//!
//! Scans directories recursively for episode files and fills in the show
//! and declared numbers from file and directory names.

use super::parser::{parse_filename, season_from_dirname};
use crate::models::media::{is_video_extension, ScannedFile};
use crate::Result;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Overrides applied to every scanned file.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Show name to use instead of the parsed one.
    pub show: Option<String>,
    /// Season to use when none is found in names.
    pub season: Option<u32>,
}

/// Result of scanning a directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Episode files, sorted by path.
    pub files: Vec<ScannedFile>,
    /// Samples and extras that were skipped.
    pub skipped: usize,
    /// Total files scanned.
    pub total_files_scanned: usize,
    /// Total directories scanned.
    pub total_dirs_scanned: usize,
}

/// Directory names holding bonus material rather than episodes.
const EXTRAS_NAMES: &[&str] = &[
    "extras",
    "extra",
    "featurettes",
    "featurette",
    "behind the scenes",
    "behindthescenes",
    "deleted scenes",
    "deletedscenes",
    "bonus",
    "sample",
    "samples",
];

/// Check if a path below the scan root is inside an extras or sample directory.
fn is_in_extras_directory(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy().to_lowercase();
            EXTRAS_NAMES.contains(&name.as_str())
                || name.ends_with(".extras")
                || name.ends_with("-extras")
                || name.ends_with("_extras")
        }
        _ => false,
    })
}

/// Check if a filename indicates a sample file.
fn is_sample_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.contains("sample") && !lower.contains("sampler")
}

/// Show and season inferred from the directories above `path`.
///
/// The show is the nearest ancestor that is not a season directory, even
/// when that is above the scan root.
fn infer_from_directories(path: &Path) -> (Option<String>, Option<u32>) {
    let mut season = None;
    let mut show = None;

    for dir in path.ancestors().skip(1) {
        let name = match dir.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => break,
        };
        match season_from_dirname(&name) {
            Some(n) => {
                season.get_or_insert(n);
            }
            None => {
                show = Some(name.replace(['.', '_'], " ").trim().to_string());
                break;
            }
        }
    }

    (show.filter(|s| !s.is_empty()), season)
}

/// Build a scanned file record from a path.
fn scan_file(path: &Path, options: &ScanOptions) -> ScannedFile {
    let mut file = ScannedFile::new(path, "");
    let parsed = parse_filename(&file.stem);
    let (dir_show, dir_season) = infer_from_directories(path);

    file.show = options
        .show
        .clone()
        .or(parsed.show)
        .or(dir_show)
        .unwrap_or_default();
    file.declared_season = parsed.season.or(dir_season).or(options.season);
    file.declared_episode = parsed.episode;
    file.declared_episode_end = parsed.episode_end;
    file.size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    file
}

/// Scan a directory for episode files.
///
/// Samples and anything inside extras directories are skipped. Results
/// are sorted by path.
pub fn scan_directory(path: &Path, options: &ScanOptions) -> Result<ScanResult> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }

    let mut result = ScanResult::default();

    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();

        if entry.file_type().is_dir() {
            result.total_dirs_scanned += 1;
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        result.total_files_scanned += 1;

        let is_video = entry_path
            .extension()
            .map(|ext| is_video_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        let relative = entry_path.strip_prefix(path).unwrap_or(entry_path);
        let filename = entry_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");
        if is_in_extras_directory(relative) || is_sample_filename(filename) {
            tracing::debug!("Skipping sample/extra: {}", entry_path.display());
            result.skipped += 1;
            continue;
        }

        result.files.push(scan_file(entry_path, options));
    }

    result.files.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(
        "Scanned {} files in {} directories: {} episodes, {} skipped",
        result.total_files_scanned,
        result.total_dirs_scanned,
        result.files.len(),
        result.skipped
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_extras_directory() {
        assert!(is_in_extras_directory(Path::new("Show/Extras/clip.mkv")));
        assert!(is_in_extras_directory(Path::new("Show/Sample/ep.mkv")));
        assert!(is_in_extras_directory(Path::new("Show.S01-Extras/ep.mkv")));
        assert!(!is_in_extras_directory(Path::new("Show/Season 01/ep.mkv")));
    }

    #[test]
    fn test_is_sample_filename() {
        assert!(is_sample_filename("sample.mkv"));
        assert!(is_sample_filename("Show-S01E01-sample.mkv"));
        assert!(!is_sample_filename("Show-S01E01.mkv"));
        assert!(!is_sample_filename("sampler.mkv"));
    }

    #[test]
    fn test_infer_from_directories() {
        let (show, season) = infer_from_directories(Path::new("/tv/Paw Patrol/Season 02/x.mkv"));
        assert_eq!(show.as_deref(), Some("Paw Patrol"));
        assert_eq!(season, Some(2));

        let (show, season) = infer_from_directories(Path::new("/tv/Bluey/x.mkv"));
        assert_eq!(show.as_deref(), Some("Bluey"));
        assert_eq!(season, None);

        let (show, _) = infer_from_directories(Path::new("/tv/x.mkv"));
        assert_eq!(show.as_deref(), Some("tv"));
    }

    // Integration tests for scan_directory() live in tests/scanner_tests.rs
}
