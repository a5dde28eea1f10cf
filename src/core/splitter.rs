//! Segment splitter.
//!
//! Cuts a file's title into candidate episode-title segments. The
//! show/episode preamble is removed first; delimiters are tried in a fixed
//! order and the first one producing two or more segments wins. A single
//! segment is returned unsplit and the matcher decides whether an internal
//! split is needed.

use super::parser::strip_preamble;
use crate::models::matching::Segment;
use regex::Regex;

/// Delimiters in priority order. ` and ` is matched in lower case only:
/// a capitalized `And` is usually part of a title.
pub const DELIMITERS: &[&str] = &[" and ", " & ", ",", ";", " - "];

const TRIM_CHARS: &[char] = &[' ', '-', '_', '.', ',', ';', '&', ':', '–', '—'];

fn clean(part: &str) -> Option<Segment> {
    let segment = Segment::new(part.trim_matches(|c: char| TRIM_CHARS.contains(&c) || c.is_whitespace()));
    (!segment.is_empty()).then_some(segment)
}

/// Split on the first delimiter that yields two or more non-empty parts.
fn split_on_delimiters(title: &str) -> Option<Vec<Segment>> {
    DELIMITERS.iter().find_map(|delim| {
        let parts: Vec<Segment> = title.split(delim).filter_map(clean).collect();
        (parts.len() >= 2).then_some(parts)
    })
}

/// Split on the show name when it is repeated inside the stem.
fn split_on_show_name(stem: &str, title: &str, show: &str) -> Option<Vec<Segment>> {
    let show = show.trim();
    if show.is_empty() {
        return None;
    }
    let re = Regex::new(&format!("(?i){}", regex::escape(show))).ok()?;
    if re.find_iter(stem).count() < 2 {
        return None;
    }
    let parts: Vec<Segment> = re.split(title).filter_map(clean).collect();
    (parts.len() >= 2).then_some(parts)
}

/// The title part of a stem with its preamble removed, or `None` when
/// the file name carries no title.
pub fn title_of(stem: &str, show: &str) -> Option<String> {
    let title = strip_preamble(stem, show);
    clean(&title).map(|_| title)
}

/// Split a file stem into candidate segments.
///
/// Returns an empty list when the stem has no title. With `anthology`
/// off, the title is always returned as one segment.
pub fn split_segments(stem: &str, show: &str, anthology: bool) -> Vec<Segment> {
    let title = match title_of(stem, show) {
        Some(title) => title,
        None => return Vec::new(),
    };

    if anthology {
        if let Some(parts) = split_on_delimiters(&title) {
            return parts;
        }
        if let Some(parts) = split_on_show_name(stem, &title, show) {
            return parts;
        }
    }

    clean(&title).into_iter().collect()
}
