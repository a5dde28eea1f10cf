//! Filename parser.
//!
//! Extracts the show name, declared season/episode numbers and the title
//! part from an episode file name such as
//! `Paw Patrol-S01E01-E02-Pups Save A Train` or `Show.1x03.Title.720p`.
//! Declared numbers are untrusted hints; the title part is what the
//! matcher works on.

use regex::Regex;

/// Result of parsing a file stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Text before the episode token, cleaned.
    pub show: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Last episode when the token declares a span.
    pub episode_end: Option<u32>,
    /// Text after the episode token, cleaned. Empty when absent.
    pub title: String,
}

/// Position and numbers of an episode token inside a stem.
struct EpisodeToken {
    start: usize,
    end: usize,
    season: u32,
    episode: u32,
    episode_end: Option<u32>,
}

fn parse_num(m: Option<regex::Match<'_>>) -> Option<u32> {
    m.and_then(|m| m.as_str().parse().ok())
}

/// Find the first `S01E01`-style or `1x01`-style token.
fn find_episode_token(stem: &str) -> Option<EpisodeToken> {
    // S01E01, S01E01E02, S01E01-E02, S01E01-02
    if let Ok(re) =
        Regex::new(r"(?i)(?:^|[^a-z0-9])(s(\d{1,2})[ ._-]?e(\d{1,3})(?:[-–]?e(\d{1,3})|[-–](\d{1,3})\b)?)")
    {
        if let Some(caps) = re.captures(stem) {
            if let (Some(token), Some(season), Some(episode)) =
                (caps.get(1), parse_num(caps.get(2)), parse_num(caps.get(3)))
            {
                return Some(EpisodeToken {
                    start: token.start(),
                    end: token.end(),
                    season,
                    episode,
                    episode_end: parse_num(caps.get(4)).or_else(|| parse_num(caps.get(5))),
                });
            }
        }
    }

    // 1x01, 1x01-1x02, 1x01-02
    if let Ok(re) = Regex::new(r"(?i)(?:^|[^a-z0-9])((\d{1,2})x(\d{1,3})(?:[-–](?:\d{1,2}x)?(\d{1,3}))?)(?:[^a-z0-9]|$)") {
        if let Some(caps) = re.captures(stem) {
            if let (Some(token), Some(season), Some(episode)) =
                (caps.get(1), parse_num(caps.get(2)), parse_num(caps.get(3)))
            {
                return Some(EpisodeToken {
                    start: token.start(),
                    end: token.end(),
                    season,
                    episode,
                    episode_end: parse_num(caps.get(4)),
                });
            }
        }
    }

    None
}

const SEPARATORS: &[char] = &[' ', '-', '_', '.', '–', '—', ':'];

/// Turn dotted or underscored release names into spaced text.
fn despace(s: &str) -> String {
    let s = if s.contains(' ') {
        s.replace('_', " ")
    } else {
        s.replace(['.', '_'], " ")
    };
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Release tags, optionally glued to a `-GROUP` suffix (`x264-GRP`).
const RELEASE_TAG: &str = r"(?i)^(?:2160p|1080p|720p|576p|480p|4k|uhd|x264|x265|h264|h265|hevc|web-?dl|webrip|bluray|bdrip|hdtv|dvdrip|aac|ac3|dts|repack)(?:-[a-z0-9]+)?$";

/// Remove bracketed groups and the trailing run of release tags.
///
/// Tag words inside the title (`The 4K Adventure`) are kept; only a run
/// of tags that reaches the end of the name is cut.
pub fn strip_release_noise(title: &str) -> String {
    let mut cleaned = title.to_string();

    if let Ok(re) = Regex::new(r"\[[^\]]*\]|\{[^}]*\}") {
        cleaned = re.replace_all(&cleaned, " ").to_string();
    }
    if let Ok(re) = Regex::new(r"(?i)\bh\.(26[45])\b") {
        cleaned = re.replace_all(&cleaned, "h$1").to_string();
    }

    if let (Ok(words), Ok(tag)) = (Regex::new(r"[^\s._()]+"), Regex::new(RELEASE_TAG)) {
        let mut cut = None;
        for word in words.find_iter(&cleaned).collect::<Vec<_>>().into_iter().rev() {
            let text = word.as_str();
            if tag.is_match(text) {
                cut = Some(word.start());
            } else if !text.chars().all(|c| SEPARATORS.contains(&c)) {
                break;
            }
        }
        if let Some(cut) = cut {
            cleaned.truncate(cut);
        }
    }

    cleaned
        .trim_matches(|c: char| SEPARATORS.contains(&c) || c.is_whitespace())
        .to_string()
}

/// Parse a file stem (file name without extension).
pub fn parse_filename(stem: &str) -> ParsedFilename {
    match find_episode_token(stem) {
        Some(token) => {
            let show = despace(stem[..token.start].trim_matches(|c: char| SEPARATORS.contains(&c)));
            let title = strip_release_noise(&despace(
                stem[token.end..].trim_start_matches(|c: char| SEPARATORS.contains(&c)),
            ));
            ParsedFilename {
                show: (!show.is_empty()).then_some(show),
                season: Some(token.season),
                episode: Some(token.episode),
                episode_end: token.episode_end.filter(|end| *end > token.episode),
                title,
            }
        }
        None => ParsedFilename {
            title: strip_release_noise(&despace(stem)),
            ..Default::default()
        },
    }
}

/// Remove the `Show-S01E01-` style preamble from a stem, leaving the title.
///
/// Without an episode token, a leading show name followed by separators
/// (`Show - Title`, `Show-Title`, `Show_Title`, `Show.Title`) is removed.
pub fn strip_preamble(stem: &str, show: &str) -> String {
    if find_episode_token(stem).is_some() {
        return parse_filename(stem).title;
    }

    let title = strip_release_noise(stem);
    let words: Vec<String> = show.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return title;
    }
    let pattern = format!(r"(?i)^{}[\s._\-–—:]+", words.join(r"[\s._\-]+"));
    match Regex::new(&pattern).ok().and_then(|re| re.find(&title)) {
        Some(m) if !title[m.end()..].trim().is_empty() => title[m.end()..].trim().to_string(),
        _ => title,
    }
}

/// Season number from a directory name like `Season 02`, `S2` or `Specials`.
pub fn season_from_dirname(name: &str) -> Option<u32> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("specials") {
        return Some(0);
    }
    let re = Regex::new(r"(?i)^(?:season|series|staffel|saison)[\s._-]*(\d{1,3})$|^s(\d{1,3})$").ok()?;
    let caps = re.captures(name)?;
    parse_num(caps.get(1)).or_else(|| parse_num(caps.get(2)))
}
