//! Windowed span pairing.
//!
//! Scores every way of cutting a title into consecutive pieces against
//! every window of consecutive canonical episodes, and keeps the best
//! window whose pieces all clear the threshold. Used for the internal
//! split fallback and for files that declare a span.

use super::text::{similarity, tokens};

/// A window of consecutive episodes matched piece by piece.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMatch {
    /// Index of the first episode of the window in the season list.
    pub start: usize,
    /// Score of each piece against its episode title.
    pub scores: Vec<f32>,
}

impl WindowMatch {
    pub fn size(&self) -> usize {
        self.scores.len()
    }

    pub fn total(&self) -> f32 {
        self.scores.iter().sum()
    }

    pub fn min(&self) -> f32 {
        self.scores.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Indices of the matched episodes.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.size()
    }
}

/// Outcome of a window search.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingOutcome {
    pub best: WindowMatch,
    /// Another window scored within the tie window of the best one.
    pub ambiguous: bool,
}

/// Every way to cut `n` tokens into `parts` non-empty consecutive pieces,
/// as lists of cut positions.
fn cut_points(n: usize, parts: usize) -> Vec<Vec<usize>> {
    match parts {
        0 | 1 => vec![Vec::new()],
        2 => (1..n).map(|k| vec![k]).collect(),
        3 => (1..n)
            .flat_map(|a| (a + 1..n).map(move |b| vec![a, b]))
            .collect(),
        _ => Vec::new(),
    }
}

fn pieces(words: &[&str], cuts: &[usize]) -> Vec<String> {
    let mut out = Vec::with_capacity(cuts.len() + 1);
    let mut from = 0;
    for &cut in cuts.iter().chain(std::iter::once(&words.len())) {
        out.push(words[from..cut].join(" "));
        from = cut;
    }
    out
}

/// Best cut of `normalized` for one window of titles.
fn best_cut(words: &[&str], titles: &[String], threshold: f32) -> Option<Vec<f32>> {
    let mut best: Option<Vec<f32>> = None;
    for cuts in cut_points(words.len(), titles.len()) {
        let scores: Vec<f32> = pieces(words, &cuts)
            .iter()
            .zip(titles)
            .map(|(piece, title)| similarity(piece, title))
            .collect();
        if scores.iter().any(|s| *s < threshold) {
            continue;
        }
        let total: f32 = scores.iter().sum();
        if best.as_ref().map_or(true, |b| total > b.iter().sum::<f32>()) {
            best = Some(scores);
        }
    }
    best
}

/// Search all windows of `size` consecutive titles.
///
/// `titles` are the normalized titles of a season in episode order and
/// `numbers` their episode numbers; windows crossing a gap in numbering
/// are skipped.
pub fn best_window(
    normalized: &str,
    titles: &[String],
    numbers: &[u32],
    size: usize,
    threshold: f32,
    tie_window: f32,
) -> Option<PairingOutcome> {
    let words = tokens(normalized);
    if size < 2 || words.len() < size || titles.len() < size {
        return None;
    }

    let mut candidates: Vec<WindowMatch> = Vec::new();
    for start in 0..=titles.len() - size {
        let consecutive = numbers[start..start + size]
            .windows(2)
            .all(|w| w[1] == w[0] + 1);
        if !consecutive {
            continue;
        }
        if let Some(scores) = best_cut(&words, &titles[start..start + size], threshold) {
            candidates.push(WindowMatch { start, scores });
        }
    }

    let best_index = candidates
        .iter()
        .enumerate()
        .fold(None::<usize>, |acc, (i, c)| match acc {
            Some(j) if candidates[j].total() >= c.total() => Some(j),
            _ => Some(i),
        })?;
    let best = candidates[best_index].clone();
    let per_piece = best.total() / size as f32;
    let ambiguous = candidates.iter().enumerate().any(|(i, c)| {
        i != best_index && (per_piece - c.total() / size as f32) <= tie_window
    });

    Some(PairingOutcome { best, ambiguous })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::text::normalize;

    fn season(titles: &[&str]) -> (Vec<String>, Vec<u32>) {
        (
            titles.iter().map(|t| normalize(t)).collect(),
            (1..=titles.len() as u32).collect(),
        )
    }

    #[test]
    fn test_cut_points() {
        assert_eq!(cut_points(3, 2), vec![vec![1], vec![2]]);
        assert_eq!(cut_points(3, 3), vec![vec![1, 2]]);
        assert!(cut_points(1, 2).is_empty());
    }

    #[test]
    fn test_pair_found() {
        let (titles, numbers) = season(&[
            "Pups And The Kitty Tastrophe",
            "Pups Save A Train",
            "Pup Pup Boogie",
        ]);
        let stem = normalize("Pups And The Kitty Tastrophe Pups Save A Train");
        let outcome = best_window(&stem, &titles, &numbers, 2, 0.7, 0.05).unwrap();
        assert_eq!(outcome.best.indices(), 0..2);
        assert_eq!(outcome.best.scores, vec![1.0, 1.0]);
        assert!(!outcome.ambiguous);
    }

    #[test]
    fn test_pair_tolerates_punctuation_drift() {
        let (titles, numbers) = season(&["Pup's Big Day", "Pups Save The Bunnies"]);
        let stem = normalize("Pups Big Day - Pups Save the Bunnys");
        let outcome = best_window(&stem, &titles, &numbers, 2, 0.7, 0.05).unwrap();
        assert_eq!(outcome.best.start, 0);
        assert!(outcome.best.min() >= 0.7);
    }

    #[test]
    fn test_gap_in_numbering_is_not_a_window() {
        let titles = vec![normalize("Alpha Story"), normalize("Beta Story")];
        let stem = normalize("Alpha Story Beta Story");
        assert!(best_window(&stem, &titles, &[1, 3], 2, 0.7, 0.05).is_none());
    }

    #[test]
    fn test_triple_window() {
        let (titles, numbers) = season(&["Red Rocket", "Blue Lagoon", "Green Garden", "Gold Mine"]);
        let stem = normalize("Red Rocket Blue Lagoon Green Garden");
        let outcome = best_window(&stem, &titles, &numbers, 3, 0.7, 0.05).unwrap();
        assert_eq!(outcome.best.indices(), 0..3);
        assert!(!outcome.ambiguous);
    }

    #[test]
    fn test_no_window_below_threshold() {
        let (titles, numbers) = season(&["Red Rocket", "Blue Lagoon"]);
        assert!(best_window("something else entirely", &titles, &numbers, 2, 0.7, 0.05).is_none());
    }
}
