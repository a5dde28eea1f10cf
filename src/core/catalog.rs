//! Canonical catalog normalizer.
//!
//! Turns provider payloads into a `Catalog` with integer season/episode
//! numbers and optional runtimes. An empty result is reported as
//! `Error::NoCanonicalData` so the caller can fall back to another provider.

use crate::models::catalog::{CanonicalEpisode, Catalog, RawEpisode, RawValue};
use crate::{Error, Result};

/// Counts of what normalization kept and discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub kept: usize,
    /// Rows whose season or episode could not be coerced.
    pub dropped: usize,
    /// Rows repeating an earlier (season, episode).
    pub duplicates: usize,
}

/// Coerce a provider number. Fractions and non-numeric text fail.
fn coerce_number(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Int(i) => Some(*i),
        RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
        RawValue::Float(_) => None,
        RawValue::Text(s) => s.trim().parse::<i64>().ok(),
    }
}

/// Coerce a runtime to whole minutes; accepts text like `"22 min"`.
fn coerce_runtime(value: &RawValue) -> Option<u32> {
    let minutes = match value {
        RawValue::Int(i) => *i,
        RawValue::Float(f) if f.is_finite() => f.round() as i64,
        RawValue::Float(_) => return None,
        RawValue::Text(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<i64>().ok()?
        }
    };
    u32::try_from(minutes).ok().filter(|m| *m > 0)
}

fn coerce_row(raw: &RawEpisode) -> Option<CanonicalEpisode> {
    let season = raw.season.as_ref().and_then(coerce_number)?;
    let episode = raw.episode.as_ref().and_then(coerce_number)?;
    let season = u32::try_from(season).ok()?;
    let episode = u32::try_from(episode).ok().filter(|e| *e >= 1)?;

    Some(CanonicalEpisode {
        season,
        episode,
        title: raw.title.as_deref().unwrap_or_default().trim().to_string(),
        runtime: raw.runtime.as_ref().and_then(coerce_runtime),
    })
}

/// Normalize raw rows without judging emptiness.
pub fn normalize_episodes(raw: &[RawEpisode]) -> (Vec<CanonicalEpisode>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut seen = std::collections::HashSet::new();
    let mut episodes = Vec::with_capacity(raw.len());

    for row in raw {
        match coerce_row(row) {
            Some(ep) => {
                if seen.insert((ep.season, ep.episode)) {
                    episodes.push(ep);
                } else {
                    report.duplicates += 1;
                }
            }
            None => report.dropped += 1,
        }
    }

    episodes.sort_by_key(|e| (e.season, e.episode));
    report.kept = episodes.len();
    (episodes, report)
}

/// Normalize a provider's answer for one show and season.
///
/// Fails with `NoCanonicalData` when no usable episode of `season` remains.
pub fn normalize_catalog(show: &str, season: u32, raw: &[RawEpisode]) -> Result<Catalog> {
    let (episodes, report) = normalize_episodes(raw);

    if report.dropped > 0 || report.duplicates > 0 {
        tracing::debug!(
            "Catalog for {} S{:02}: kept {}, dropped {}, duplicates {}",
            show,
            season,
            report.kept,
            report.dropped,
            report.duplicates
        );
    }

    let catalog = Catalog::from_episodes(show, episodes);
    if catalog.season(season).is_empty() {
        return Err(Error::NoCanonicalData {
            show: show.to_string(),
            season,
        });
    }
    Ok(catalog)
}
