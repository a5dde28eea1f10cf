//! Folder name generator.

use super::filename::sanitize_filename;

/// Generate the show folder name.
pub fn show_folder(show: &str) -> String {
    let name = sanitize_filename(show);
    if name.is_empty() {
        "Unknown Show".to_string()
    } else {
        name
    }
}

/// Generate season folder name.
///
/// Format: `Season ${seasonNr2}`
pub fn season_folder(season: u32) -> String {
    format!("Season {:02}", season)
}
