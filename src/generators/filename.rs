//! Episode filename generator.

use crate::models::plan::EpisodeSpan;

/// Characters removed from names: illegal on common filesystems, or
/// decorative punctuation that only adds noise.
const STRIPPED_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|', '!'];

/// Sanitize a string for use in filenames.
///
/// `/` becomes `-`, stripped characters disappear, whitespace collapses
/// and trailing dots are removed.
pub fn sanitize_filename(s: &str) -> String {
    let replaced: String = s
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c) && !c.is_control())
        .map(|c| if c == '/' { '-' } else { c })
        .collect();

    replaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .trim()
        .to_string()
}

/// Episode token: `S01E05` or `S01E01-E02`.
pub fn episode_token(season: u32, span: &EpisodeSpan) -> String {
    if span.is_single() {
        format!("S{:02}E{:02}", season, span.start)
    } else {
        format!("S{:02}E{:02}-E{:02}", season, span.start, span.end)
    }
}

/// Generate TV episode filename.
///
/// Format: `${show} - S${season2}E${episode2}[-E${end2}] - ${title}.${ext}`
pub fn episode_filename(
    show: &str,
    season: u32,
    span: &EpisodeSpan,
    title: &str,
    extension: &str,
) -> String {
    let mut name = format!("{} - {}", sanitize_filename(show), episode_token(season, span));

    let title = sanitize_filename(title);
    if !title.is_empty() {
        name.push_str(" - ");
        name.push_str(&title);
    }

    if extension.is_empty() {
        name
    } else {
        format!("{}.{}", name, extension.to_lowercase())
    }
}
